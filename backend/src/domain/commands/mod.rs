//! Command and result structs for every domain operation, grouped the
//! same way as the services that execute them.

pub mod contract;
pub mod tasks;
