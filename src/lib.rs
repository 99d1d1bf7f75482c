//! Keypad Lock Monitor Library
//!
//! Mirrors a serial-attached keypad lock in the terminal. The device sends
//! `KEY:<c>` and `STATE:<name>` lines; this crate reads them, keeps a model
//! of the lock and draws it.
//!
//! # Modules
//!
//! - `lock`: lock state, PIN buffer, keypad layout and the line interpreter
//! - `port`: serial port abstraction (tokio-serial backend and mocks)
//! - `link`: port request, connection lifecycle and the line read loop
//! - `config`: configuration with TOML support
//! - `logging`: tracing subscriber setup
//! - `error`: top-level error type
//! - `tui`: terminal renderer and application loop (when `tui` feature is enabled)

pub mod config;
pub mod error;
pub mod link;
pub mod lock;
pub mod logging;
pub mod port;

#[cfg(feature = "tui")]
pub mod tui;

// Re-export commonly used types for convenience
pub use config::{Config, ConfigError, ConfigLoader, ConfigResult};
pub use error::{AppError, AppResult};
pub use link::{ConnectionPhase, LinkError, LinkEvent, SerialLink};
pub use lock::{interpret_line, EnteredDigits, Interpretation, LockMirror, LockState};
pub use port::{
    AsyncSerialPortAdapter, MockSerialBackend, MockSerialPort, PortConfiguration, PortError,
    SerialBackend, SystemSerialBackend,
};
