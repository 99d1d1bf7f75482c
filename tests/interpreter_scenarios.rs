//! Scenario tests for the device line interpreter.
//!
//! Each test feeds a short sequence of device lines into a fresh mirror and
//! checks the resulting lock state and PIN buffer.

mod common;

use common::{feed, mirror_after};
use keypad_lock_monitor::lock::{interpret_line, Interpretation, LockMirror, LockState};
use pretty_assertions::assert_eq;

// ============================================================================
// Key messages
// ============================================================================

#[test]
fn test_fifth_digit_is_dropped() {
    let mirror = mirror_after(&["KEY:1", "KEY:2", "KEY:3", "KEY:4", "KEY:5"]);

    assert_eq!(mirror.entered.as_str(), "1234");
    assert_eq!(mirror.lock_state, LockState::Locked);
}

#[test]
fn test_delete_on_empty_is_a_no_op() {
    let mirror = mirror_after(&["KEY:7", "KEY:*", "KEY:*"]);

    assert_eq!(mirror.entered.as_str(), "");
}

#[test]
fn test_delete_removes_only_the_last_digit() {
    let mut mirror = mirror_after(&["KEY:4", "KEY:2", "KEY:9"]);

    let outcome = interpret_line(&mut mirror, "KEY:*");

    assert_eq!(outcome, Interpretation::Deleted('9'));
    assert_eq!(mirror.entered.as_str(), "42");
}

#[test]
fn test_letter_and_hash_keys_have_no_effect() {
    let mut mirror = mirror_after(&["KEY:1"]);
    let before = mirror;

    for line in ["KEY:A", "KEY:B", "KEY:C", "KEY:D", "KEY:#"] {
        assert_eq!(interpret_line(&mut mirror, line), Interpretation::Ignored);
    }

    assert_eq!(mirror, before);
}

// ============================================================================
// State messages
// ============================================================================

#[test]
fn test_lowercase_state_name_is_accepted() {
    let mirror = mirror_after(&["STATE:wrong"]);

    assert_eq!(mirror.lock_state, LockState::Wrong);
}

#[test]
fn test_unlock_clears_the_pin() {
    let mirror = mirror_after(&["KEY:1", "KEY:2", "KEY:3", "KEY:4", "STATE:UNLOCKED"]);

    assert_eq!(mirror.lock_state, LockState::Unlocked);
    assert!(mirror.entered.is_empty());
}

#[test]
fn test_idle_keeps_the_pin() {
    let mirror = mirror_after(&["STATE:WRONG", "KEY:5", "KEY:6", "STATE:IDLE"]);

    assert_eq!(mirror.lock_state, LockState::Locked);
    assert_eq!(mirror.entered.as_str(), "56");
}

#[test]
fn test_full_unlock_cycle() {
    let mut mirror = LockMirror::new();

    feed(&mut mirror, &["KEY:9", "KEY:9", "KEY:9", "KEY:9", "STATE:WRONG"]);
    assert_eq!(mirror.lock_state, LockState::Wrong);
    assert!(mirror.entered.is_empty());

    feed(&mut mirror, &["STATE:IDLE", "KEY:1", "KEY:2", "KEY:3", "KEY:4"]);
    assert_eq!(mirror.lock_state, LockState::Locked);
    assert_eq!(mirror.entered.as_str(), "1234");

    feed(&mut mirror, &["STATE:UNLOCKED"]);
    assert_eq!(mirror.lock_state, LockState::Unlocked);
    assert!(mirror.entered.is_empty());

    feed(&mut mirror, &["STATE:IDLE"]);
    assert_eq!(mirror, LockMirror::new());
}

// ============================================================================
// Unrecognized input
// ============================================================================

#[test]
fn test_noise_lines_are_ignored() {
    let mut mirror = mirror_after(&["KEY:3", "STATE:WRONG", "KEY:8"]);
    let before = mirror;

    let noise = [
        "",
        "hello",
        "KEY:",
        "KEY:12",
        "key:1",
        "STATE:",
        "STATE:OPEN",
        "state:UNLOCKED",
        "BOOT OK",
        "KEY 1",
    ];
    for line in noise {
        assert_eq!(
            interpret_line(&mut mirror, line),
            Interpretation::Ignored,
            "line {:?} should be ignored",
            line
        );
    }

    assert_eq!(mirror, before);
}
