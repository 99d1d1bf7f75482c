//! Lock state and the bounded PIN buffer.

use std::fmt;

/// Maximum number of digits the device accepts before it evaluates the PIN.
pub const MAX_DIGITS: usize = 4;

/// Condition of the physical lock, as last reported by the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LockState {
    /// Locked and waiting for a PIN
    #[default]
    Locked,
    /// Correct PIN entered
    Unlocked,
    /// Wrong PIN entered
    Wrong,
}

impl LockState {
    /// Short label used in the status line and logs.
    pub fn label(self) -> &'static str {
        match self {
            Self::Locked => "LOCKED",
            Self::Unlocked => "UNLOCKED",
            Self::Wrong => "WRONG",
        }
    }
}

impl fmt::Display for LockState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// PIN digits typed on the device keypad so far.
///
/// Holds at most [`MAX_DIGITS`] ASCII digits. Pushing past the limit or
/// pushing a non-digit is rejected, so the invariant cannot be broken from
/// outside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EnteredDigits {
    // Slots at and past `len` stay zeroed so derived equality holds.
    digits: [u8; MAX_DIGITS],
    len: usize,
}

impl EnteredDigits {
    /// Create an empty buffer.
    pub const fn new() -> Self {
        Self {
            digits: [0; MAX_DIGITS],
            len: 0,
        }
    }

    /// Append a decimal digit. Returns `false` if `c` is not a digit or the
    /// buffer is already full.
    pub fn push(&mut self, c: char) -> bool {
        if !c.is_ascii_digit() || self.is_full() {
            return false;
        }
        self.digits[self.len] = c as u8;
        self.len += 1;
        true
    }

    /// Remove the most recent digit, if any.
    pub fn pop(&mut self) -> Option<char> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        let removed = self.digits[self.len] as char;
        self.digits[self.len] = 0;
        Some(removed)
    }

    pub fn clear(&mut self) {
        *self = Self::new();
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_full(&self) -> bool {
        self.len == MAX_DIGITS
    }

    /// The entered digits as a string slice.
    pub fn as_str(&self) -> &str {
        // Only ASCII digits are ever stored.
        std::str::from_utf8(&self.digits[..self.len]).unwrap_or_default()
    }

    /// The last entered digit.
    pub fn last(&self) -> Option<char> {
        self.len.checked_sub(1).map(|i| self.digits[i] as char)
    }
}

impl fmt::Display for EnteredDigits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything the renderer shows about the device.
///
/// Owned by the application loop; the line interpreter gets `&mut` access,
/// the renderer only `&`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LockMirror {
    pub lock_state: LockState,
    pub entered: EnteredDigits,
}

impl LockMirror {
    pub fn new() -> Self {
        Self::default()
    }
}
