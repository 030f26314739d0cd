//! # Storage Traits
//!
//! This module defines the storage abstraction trait that allows different
//! realtime store backends to be used interchangeably in the domain layer.

use serde_json::Value;
use thiserror::Error;

/// Errors surfaced by the persistence collaborator.
///
/// Domain services propagate these to the caller unchanged; there is no
/// automatic retry or backoff anywhere in the core.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The underlying store rejected or failed a read/write.
    #[error("store operation failed at '{path}': {message}")]
    Backend { path: String, message: String },

    /// A value read from the store could not be decoded into its domain type.
    #[error("failed to decode value at '{path}'")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

impl StoreError {
    pub fn backend(path: impl Into<String>, message: impl Into<String>) -> Self {
        StoreError::Backend {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Callback invoked with the current value at a subscribed path.
///
/// `None` means the path currently holds no value.
pub type WatchCallback = Box<dyn Fn(Option<Value>) + Send + Sync>;

/// Handle to one active change subscription.
///
/// Each subscription is independent: cancelling one never affects any
/// other. Cancellation is explicit via [`Subscription::unsubscribe`];
/// dropping the handle leaves the subscription active, mirroring the
/// original store client's unsubscribe-handle contract.
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Stop receiving change notifications for this path.
    pub fn unsubscribe(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

/// Trait defining the interface to the external realtime data store.
///
/// The store is a tree of JSON values addressed by slash-separated paths
/// (`contracts/{id}/users/{uid}/todos/{taskId}`). All operations are
/// synchronous request/response: each logical action is one read and/or
/// one write, with correctness for concurrent writers delegated entirely
/// to the store's native single-key atomicity.
pub trait RealtimeStore: Send + Sync {
    /// Read the value at `path`, or `None` if nothing is stored there.
    fn read(&self, path: &str) -> Result<Option<Value>, StoreError>;

    /// Write `value` at `path`; `None` deletes the subtree at `path`.
    fn write(&self, path: &str, value: Option<Value>) -> Result<(), StoreError>;

    /// Register a change listener for `path`.
    ///
    /// The callback fires once immediately with the current value, then
    /// again whenever the value at `path` changes, including changes to
    /// any descendant of `path` and deletions of any ancestor.
    fn subscribe(&self, path: &str, callback: WatchCallback) -> Result<Subscription, StoreError>;

    /// Allocate a fresh unique child key under `parent_path`.
    fn generate_child_key(&self, parent_path: &str) -> String;
}
