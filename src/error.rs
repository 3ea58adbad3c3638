//! Error types for the ledger and its stores.

use thiserror::Error;

/// Errors reported by a [`Store`](crate::store::Store) implementation.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Errors surfaced by [`Ledger`](crate::ledger::Ledger) operations.
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Missing parameter \"{field}\"")]
    MissingArgument { field: &'static str },

    #[error("Invalid parameter \"{field}\": {reason}")]
    InvalidArgument { field: &'static str, reason: String },

    #[error("{0} already exists")]
    AlreadyExists(String),

    #[error("{0} does not exist")]
    NotFound(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl LedgerError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        LedgerError::InvalidArgument {
            field,
            reason: reason.into(),
        }
    }

    /// Whether the caller can fix this error by changing the arguments.
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            LedgerError::MissingArgument { .. } | LedgerError::InvalidArgument { .. }
        )
    }
}

pub type Result<T, E = LedgerError> = std::result::Result<T, E>;
