//! TUI widget components.
//!
//! Each widget draws one part of the device mirror and only reads the state
//! it is constructed with.

pub mod keypad;
pub mod lock_icon;
pub mod pin_dots;

pub use keypad::{keypad_cell_rect, Keypad};
pub use lock_icon::LockIcon;
pub use pin_dots::PinDots;
