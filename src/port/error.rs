//! Port-specific error types.
//!
//! Kept separate from link and application errors so the serial layer can be
//! swapped for a mock without touching the callers.

use thiserror::Error;

/// Errors that can occur while opening or reading a serial port.
#[derive(Debug, Error)]
pub enum PortError {
    /// The specified serial port was not found on the system.
    #[error("Serial port not found: {0}")]
    NotFound(String),

    /// The port exists but another process holds it.
    #[error("Serial port {0} is busy (is another program using it?)")]
    Busy(String),

    /// An I/O error occurred during port operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Port configuration was rejected by the driver.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A serialport-specific error occurred.
    #[error("Serial port error: {0}")]
    Serial(#[from] serialport::Error),
}

impl PortError {
    /// Create a NotFound error from a port name.
    pub fn not_found(port_name: impl Into<String>) -> Self {
        Self::NotFound(port_name.into())
    }

    /// Create a Busy error from a port name.
    pub fn busy(port_name: impl Into<String>) -> Self {
        Self::Busy(port_name.into())
    }

    /// Create a Config error from a message.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Classify a driver error raised while opening `port_name`.
    ///
    /// On POSIX hosts serialport reports `EBUSY` (port held exclusively by
    /// another process) as `Unknown`, so it is recognized by its errno text.
    pub fn from_open_error(port_name: &str, err: serialport::Error) -> Self {
        match err.kind() {
            serialport::ErrorKind::NoDevice
            | serialport::ErrorKind::Io(std::io::ErrorKind::NotFound) => {
                Self::not_found(port_name)
            }
            serialport::ErrorKind::InvalidInput => Self::config(err.to_string()),
            serialport::ErrorKind::Io(std::io::ErrorKind::PermissionDenied) => {
                Self::busy(port_name)
            }
            serialport::ErrorKind::Unknown if is_busy_text(&err.description) => {
                Self::busy(port_name)
            }
            _ => Self::Serial(err),
        }
    }
}

fn is_busy_text(description: &str) -> bool {
    description.to_ascii_lowercase().contains("busy")
}
