//! Domain layer: contract lifecycle, task ledger, and progress logic.

pub mod commands;
pub mod directory_service;
pub mod errors;
pub mod membership_service;
pub mod models;
pub mod notifications;
pub mod progress;
pub mod rollover_service;
pub mod signature_service;
pub mod task_service;
pub mod view_model;
pub mod watch_service;

pub use directory_service::ContractDirectoryService;
pub use errors::{DomainError, DomainResult};
pub use membership_service::MembershipService;
pub use notifications::{LogOnlyNotifier, SignedNotifier};
pub use rollover_service::RolloverService;
pub use signature_service::SignatureService;
pub use task_service::TaskService;
pub use watch_service::{ContractEvent, ContractWatchService};
