//! # Storage Layer
//!
//! This module defines the persistence abstraction for the habit contract
//! backend. The external realtime store is modeled as a path-addressed
//! key/value tree ([`RealtimeStore`]); on top of it sits a typed
//! [`ContractRepository`] that the domain services use, so no service ever
//! touches raw paths or JSON values directly.
//!
//! An in-memory implementation ([`MemoryStore`]) is provided for tests and
//! for embedders that do not have a live backend wired up yet.

pub mod contract_repository;
pub mod memory;
pub mod traits;

pub use contract_repository::ContractRepository;
pub use memory::MemoryStore;
pub use traits::{RealtimeStore, StoreError, Subscription, WatchCallback};
