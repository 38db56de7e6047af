/// Storage-specific errors
use thiserror::Error;

/// Result type alias using `StorageError`
pub type Result<T> = std::result::Result<T, StorageError>;

/// Storage error types
#[derive(Error, Debug)]
pub enum StorageError {
    /// Stored value has an unexpected shape
    #[error("Invalid value for setting {key}: {reason}")]
    InvalidValue { key: String, reason: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Migration error
    #[error(transparent)]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Database error from `SQLx`
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl StorageError {
    /// Create an invalid value error
    pub fn invalid_value(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            key: key.into(),
            reason: reason.into(),
        }
    }
}

impl From<StorageError> for cadenza_core::CoreError {
    fn from(err: StorageError) -> Self {
        cadenza_core::CoreError::settings(err.to_string())
    }
}
