//! Hardware smoke test against a real keypad lock.
//!
//! Requires the `hardware-tests` feature and a device on the port named by
//! `KEYPAD_LOCK_TEST_PORT`. Ignored by default.
//! Run with: cargo test --features hardware-tests -- --ignored

#![cfg(feature = "hardware-tests")]

use keypad_lock_monitor::link::{LinkEvent, SerialLink};
use keypad_lock_monitor::lock::{interpret_line, LockMirror};
use keypad_lock_monitor::port::{PortConfiguration, SystemSerialBackend};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

fn test_port() -> Option<String> {
    std::env::var("KEYPAD_LOCK_TEST_PORT").ok()
}

#[tokio::test]
#[ignore = "requires a keypad lock on KEYPAD_LOCK_TEST_PORT"]
async fn test_real_device_sends_protocol_lines() {
    let Some(port) = test_port() else {
        eprintln!("KEYPAD_LOCK_TEST_PORT not set, skipping");
        return;
    };

    let mut link = SerialLink::new(Arc::new(SystemSerialBackend), PortConfiguration::default());
    let (tx, mut rx) = mpsc::unbounded_channel::<LinkEvent>();
    link.connect(&port, tx).await.expect("open device port");

    println!("Press a few keys on the device within 15 seconds...");
    let mut mirror = LockMirror::new();
    let deadline = tokio::time::sleep(Duration::from_secs(15));
    tokio::pin!(deadline);

    loop {
        tokio::select! {
            _ = &mut deadline => break,
            event = rx.recv() => match event {
                Some(LinkEvent::Line { line, .. }) => {
                    let outcome = interpret_line(&mut mirror, &line);
                    println!("{:<16} -> {:?}", line, outcome);
                }
                Some(LinkEvent::Closed { .. }) | None => break,
            },
        }
    }

    println!("Final state: {} pin={:?}", mirror.lock_state, mirror.entered.as_str());
    link.close().await;
}
