//! Error types for the material properties store.
//!
//! Every failure mode of the schema manager and the repositories is a
//! variant here; nothing is recovered from silently. The CLI layer maps
//! each variant to a user-facing message and a stable exit code.

use thiserror::Error;

/// Result type used throughout the store core.
pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("A store already exists at that path")]
    AlreadyExists,

    #[error("No store exists at that path")]
    NotFound,

    #[error("The file is not a material properties store: {0}")]
    CorruptSchema(String),

    #[error("'{0}' already exists")]
    Duplicate(String),

    #[error("Unknown category: '{0}'")]
    UnknownCategory(String),

    #[error("Unknown material: '{0}'")]
    UnknownMaterial(String),

    #[error("Invalid value: {0}")]
    Validation(String),

    #[error("The store is locked by another process")]
    Busy,

    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Internal(rusqlite::Error),
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        use rusqlite::ErrorCode;

        match &err {
            rusqlite::Error::SqliteFailure(e, _) => match e.code {
                ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked => StoreError::Busy,
                _ => StoreError::Internal(err),
            },
            _ => StoreError::Internal(err),
        }
    }
}
