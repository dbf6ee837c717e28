//! Error types for the chat subsystem.

use thiserror::Error;

/// Chat subsystem error type.
#[derive(Debug, Error)]
pub enum ChatError {
    /// Invalid configuration or unsupported values.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// The completion executable could not be started.
    #[error("failed to launch `{command}`: {source}")]
    Launch {
        /// Program that failed to start.
        command: String,
        /// Underlying OS error.
        #[source]
        source: std::io::Error,
    },
    /// The completion process did not exit within the configured bound.
    #[error("completion timed out after {0} seconds")]
    Timeout(u64),
    /// I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result alias for chat operations.
pub type ChatResult<T> = Result<T, ChatError>;
