//! Port abstraction layer for serial communication.
//!
//! Provides the async read trait used by the link, the real tokio-serial
//! backend and a mock backend for tests.

pub mod async_port;
pub mod error;
pub mod mock;
pub mod traits;

pub use async_port::{SystemSerialBackend, TokioSerialPort};
pub use error::PortError;
pub use mock::{MockSerialBackend, MockSerialPort};
pub use traits::*;
