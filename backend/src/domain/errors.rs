//! Error taxonomy for the contract domain.
//!
//! Validation and not-found failures surface to the caller synchronously
//! so a UI shell can react to them; store failures propagate unchanged
//! with no retry. Notification failures never appear here: they are
//! logged and swallowed inside the signature service.

use thiserror::Error;

use crate::storage::StoreError;

/// Message shown when signing is attempted below the two-participant
/// minimum. Kept verbatim so callers can present it as-is.
pub const TWO_PARTICIPANTS_REQUIRED: &str =
    "You need at least two people in the contract to sign it.";

#[derive(Debug, Error)]
pub enum DomainError {
    /// A precondition was violated: signed contract edited, quorum not
    /// met, invalid frequency, empty task text, ...
    #[error("{0}")]
    Validation(String),

    /// A referenced contract, participant or task does not exist.
    #[error("{0}")]
    NotFound(String),

    /// The persistence collaborator failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl DomainError {
    pub fn validation(message: impl Into<String>) -> Self {
        DomainError::Validation(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        DomainError::NotFound(message.into())
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, DomainError::Validation(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, DomainError::NotFound(_))
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
