//! Mirrored lock state and the device line protocol.
//!
//! The device reports two kinds of newline-terminated ASCII lines:
//!
//! - `KEY:<c>` for every physical keypress
//! - `STATE:<name>` when the lock changes condition
//!
//! [`interpret_line`] applies one such line to a [`LockMirror`], which is the
//! only application state the renderer reads.

pub mod keypad;
mod protocol;
mod state;

pub use keypad::{KEYPAD_COLUMNS, KEYPAD_LAYOUT, KEYPAD_ROWS};
pub use protocol::{interpret_line, DeviceMessage, Interpretation, StateCommand, DELETE_KEY};
pub use state::{EnteredDigits, LockMirror, LockState, MAX_DIGITS};
