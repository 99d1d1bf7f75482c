//! Serial link handler.
//!
//! Requests a port, opens it at the device baud rate and turns the byte
//! stream into lines for the application loop. The link exclusively owns
//! the port; everything else only sees [`LinkEvent`]s and the
//! [`ConnectionPhase`].

mod cancel;
mod handler;
mod lines;

pub use cancel::CancelToken;
pub use handler::{ConnectionId, ConnectionPhase, LinkError, LinkEvent, SerialLink};
pub use lines::{lines, LineBuffer, StreamEnd};
