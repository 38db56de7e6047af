/// Core error types for Cadenza
use thiserror::Error;

/// Result type alias using `CoreError`
pub type Result<T> = std::result::Result<T, CoreError>;

/// Core error type shared by collaborators
#[derive(Error, Debug)]
pub enum CoreError {
    /// A track's declared duration string could not be parsed
    #[error("Invalid duration string: {0:?}")]
    InvalidDuration(String),

    /// Output device errors
    #[error("Device error: {0}")]
    Device(String),

    /// Persistent settings errors
    #[error("Settings error: {0}")]
    Settings(String),
}

impl CoreError {
    /// Create a device error
    pub fn device(msg: impl Into<String>) -> Self {
        Self::Device(msg.into())
    }

    /// Create a settings error
    pub fn settings(msg: impl Into<String>) -> Self {
        Self::Settings(msg.into())
    }
}
