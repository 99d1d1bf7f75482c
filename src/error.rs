//! Top-level application error.

use crate::config::ConfigError;
use crate::link::LinkError;
use thiserror::Error;

/// Errors that end the program. Link failures are normally shown as alerts
/// and only appear here when they happen outside the interactive loop.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to set up logging: {0}")]
    Logging(String),

    #[error(transparent)]
    Link(#[from] LinkError),

    #[error("Terminal I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for application-level operations.
pub type AppResult<T> = Result<T, AppError>;
