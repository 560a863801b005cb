//! Backend-level errors and their conversion into shell errors.

use bqlsh_foundation::{Error, ErrorKind};
use thiserror::Error;

/// Errors raised inside the storage layer before they cross into the shell.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The SQLite driver reported an error.
    #[error("{0}")]
    Sql(#[from] sqlx::Error),

    /// A CSV file could not be parsed.
    #[error("{0}")]
    Csv(#[from] csv::Error),

    /// A codebook value map was not valid JSON.
    #[error("invalid value map: {0}")]
    Json(#[from] serde_json::Error),

    /// File or runtime I/O failed.
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// Input data that parsed but cannot be stored.
    #[error("{0}")]
    Invalid(String),
}

impl StorageError {
    /// Creates an invalid-data error.
    #[must_use]
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid(message.into())
    }
}

impl From<StorageError> for Error {
    fn from(err: StorageError) -> Self {
        let message = err.to_string();
        match err {
            StorageError::Sql(e) => Self::new(ErrorKind::Query(message)).with_cause(e),
            StorageError::Csv(e) => Self::new(ErrorKind::Load(message)).with_cause(e),
            StorageError::Json(e) => Self::new(ErrorKind::Load(message)).with_cause(e),
            StorageError::Io(e) => Self::from(e),
            StorageError::Invalid(_) => Self::new(ErrorKind::Load(message)),
        }
    }
}

/// Result type for storage internals.
pub type StorageResult<T> = std::result::Result<T, StorageError>;
