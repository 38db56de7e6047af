//! Error types for playback management

use cadenza_core::CoreError;
use thiserror::Error;

/// Playback errors
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// Collaborator failure (device, settings, duration parsing)
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Invalid or unreadable configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// The playback service task has exited
    #[error("Playback service is not running")]
    ServiceStopped,
}

impl From<config::ConfigError> for PlaybackError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
