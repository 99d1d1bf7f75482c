//! Device line protocol and the line interpreter.

use super::state::{LockMirror, LockState};
use tracing::{debug, trace};

const KEY_PREFIX: &str = "KEY:";
const STATE_PREFIX: &str = "STATE:";

/// Keypad symbol that deletes the last entered digit.
pub const DELETE_KEY: char = '*';

/// State names the device can report after `STATE:`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateCommand {
    Unlocked,
    Wrong,
    Idle,
}

impl StateCommand {
    /// Parse a state name, ignoring ASCII case.
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_uppercase().as_str() {
            "UNLOCKED" => Some(Self::Unlocked),
            "WRONG" => Some(Self::Wrong),
            "IDLE" => Some(Self::Idle),
            _ => None,
        }
    }

    /// Lock state this command moves to.
    pub fn target(self) -> LockState {
        match self {
            Self::Unlocked => LockState::Unlocked,
            Self::Wrong => LockState::Wrong,
            Self::Idle => LockState::Locked,
        }
    }

    /// Whether entering the target state discards the PIN buffer.
    pub fn clears_digits(self) -> bool {
        matches!(self, Self::Unlocked | Self::Wrong)
    }
}

/// A recognized line from the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceMessage {
    /// `KEY:<c>` with exactly one payload character
    Key(char),
    /// `STATE:<name>` with a known name
    State(StateCommand),
}

impl DeviceMessage {
    /// Parse one trimmed line. Returns `None` for anything the protocol does
    /// not define.
    pub fn parse(line: &str) -> Option<Self> {
        if let Some(payload) = line.strip_prefix(KEY_PREFIX) {
            let mut chars = payload.chars();
            return match (chars.next(), chars.next()) {
                (Some(c), None) => Some(Self::Key(c)),
                _ => None,
            };
        }

        if let Some(payload) = line.strip_prefix(STATE_PREFIX) {
            return StateCommand::parse(payload).map(Self::State);
        }

        None
    }
}

/// What applying a line did to the mirror.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interpretation {
    /// A digit was appended to the PIN buffer
    Appended(char),
    /// The last digit was removed
    Deleted(char),
    /// A state command was applied
    Transition {
        from: LockState,
        to: LockState,
        cleared: bool,
    },
    /// Nothing changed
    Ignored,
}

/// Apply one line from the device to `mirror`.
///
/// Lines that are not part of the protocol, keys without a defined effect
/// (`A`-`D`, `#`), digits past the fourth and deletes on an empty buffer are
/// all ignored without error.
pub fn interpret_line(mirror: &mut LockMirror, line: &str) -> Interpretation {
    let outcome = match DeviceMessage::parse(line) {
        Some(DeviceMessage::Key(c)) => apply_key(mirror, c),
        Some(DeviceMessage::State(cmd)) => apply_state(mirror, cmd),
        None => Interpretation::Ignored,
    };

    match outcome {
        Interpretation::Ignored => trace!(line, "ignored device line"),
        applied => debug!(line, ?applied, "applied device line"),
    }

    outcome
}

fn apply_key(mirror: &mut LockMirror, key: char) -> Interpretation {
    if key.is_ascii_digit() {
        if mirror.entered.push(key) {
            return Interpretation::Appended(key);
        }
    } else if key == DELETE_KEY {
        if let Some(removed) = mirror.entered.pop() {
            return Interpretation::Deleted(removed);
        }
    }
    Interpretation::Ignored
}

fn apply_state(mirror: &mut LockMirror, cmd: StateCommand) -> Interpretation {
    let from = mirror.lock_state;
    let to = cmd.target();
    let cleared = cmd.clears_digits();

    mirror.lock_state = to;
    if cleared {
        mirror.entered.clear();
    }

    Interpretation::Transition { from, to, cleared }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(mirror: &mut LockMirror, lines: &[&str]) {
        for line in lines {
            interpret_line(mirror, line);
        }
    }

    #[test]
    fn test_parse_key_messages() {
        assert_eq!(DeviceMessage::parse("KEY:7"), Some(DeviceMessage::Key('7')));
        assert_eq!(DeviceMessage::parse("KEY:*"), Some(DeviceMessage::Key('*')));
        assert_eq!(DeviceMessage::parse("KEY:D"), Some(DeviceMessage::Key('D')));
        assert_eq!(DeviceMessage::parse("KEY:"), None);
        assert_eq!(DeviceMessage::parse("KEY:12"), None);
        assert_eq!(DeviceMessage::parse("key:1"), None);
    }

    #[test]
    fn test_parse_state_is_case_insensitive() {
        assert_eq!(
            DeviceMessage::parse("STATE:unlocked"),
            Some(DeviceMessage::State(StateCommand::Unlocked))
        );
        assert_eq!(
            DeviceMessage::parse("STATE:Wrong"),
            Some(DeviceMessage::State(StateCommand::Wrong))
        );
        assert_eq!(
            DeviceMessage::parse("STATE:IDLE"),
            Some(DeviceMessage::State(StateCommand::Idle))
        );
        assert_eq!(DeviceMessage::parse("STATE:OPEN"), None);
        assert_eq!(DeviceMessage::parse("STATE:"), None);
    }

    #[test]
    fn test_fifth_digit_dropped() {
        let mut mirror = LockMirror::new();
        feed(&mut mirror, &["KEY:1", "KEY:2", "KEY:3", "KEY:4", "KEY:5"]);
        assert_eq!(mirror.entered.as_str(), "1234");
    }

    #[test]
    fn test_delete_on_empty_is_noop() {
        let mut mirror = LockMirror::new();
        feed(&mut mirror, &["KEY:7", "KEY:*"]);
        assert_eq!(mirror.entered.as_str(), "");
        assert_eq!(interpret_line(&mut mirror, "KEY:*"), Interpretation::Ignored);
        assert_eq!(mirror.entered.as_str(), "");
    }

    #[test]
    fn test_unlock_and_wrong_clear_digits() {
        let mut mirror = LockMirror::new();
        feed(&mut mirror, &["KEY:1", "KEY:2", "STATE:UNLOCKED"]);
        assert_eq!(mirror.lock_state, LockState::Unlocked);
        assert!(mirror.entered.is_empty());

        feed(&mut mirror, &["KEY:3", "STATE:wrong"]);
        assert_eq!(mirror.lock_state, LockState::Wrong);
        assert!(mirror.entered.is_empty());
    }

    #[test]
    fn test_idle_keeps_digits() {
        let mut mirror = LockMirror::new();
        feed(&mut mirror, &["STATE:WRONG", "KEY:4", "KEY:2"]);
        let outcome = interpret_line(&mut mirror, "STATE:IDLE");
        assert_eq!(
            outcome,
            Interpretation::Transition {
                from: LockState::Wrong,
                to: LockState::Locked,
                cleared: false,
            }
        );
        assert_eq!(mirror.lock_state, LockState::Locked);
        assert_eq!(mirror.entered.as_str(), "42");
    }

    #[test]
    fn test_letter_and_hash_keys_have_no_effect() {
        let mut mirror = LockMirror::new();
        feed(&mut mirror, &["KEY:1"]);
        let before = mirror;
        for line in ["KEY:A", "KEY:B", "KEY:C", "KEY:D", "KEY:#"] {
            assert_eq!(interpret_line(&mut mirror, line), Interpretation::Ignored);
        }
        assert_eq!(mirror, before);
    }

    #[test]
    fn test_unknown_lines_ignored() {
        let mut mirror = LockMirror::new();
        feed(&mut mirror, &["KEY:5"]);
        let before = mirror;
        for line in ["HELLO", "STATE:OPEN", "KEYS:1", "", "Arduino ready"] {
            assert_eq!(interpret_line(&mut mirror, line), Interpretation::Ignored);
        }
        assert_eq!(mirror, before);
    }
}
