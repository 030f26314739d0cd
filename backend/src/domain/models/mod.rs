pub mod contract;

pub use contract::{default_end_date, Contract, Participant, Task, WeekSnapshot, MAX_TIMES_PER_WEEK};
