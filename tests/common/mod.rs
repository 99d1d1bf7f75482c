//! Shared test utilities for keypad lock monitor tests.
//!
//! This module provides common test infrastructure including:
//! - Feeding device lines into a mirror
//! - Mock backends with a registered device port
//! - Receiving link events with a timeout

#![allow(dead_code)]

use keypad_lock_monitor::link::{LinkEvent, SerialLink};
use keypad_lock_monitor::lock::{interpret_line, LockMirror};
use keypad_lock_monitor::port::{MockSerialBackend, MockSerialPort, PortConfiguration};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;

/// Port name used by tests that only need one device.
pub const DEVICE_PORT: &str = "/dev/ttyMOCK0";

/// Apply `lines` to a fresh mirror and return it.
pub fn mirror_after(lines: &[&str]) -> LockMirror {
    let mut mirror = LockMirror::new();
    feed(&mut mirror, lines);
    mirror
}

/// Apply `lines` to `mirror` in order.
pub fn feed(mirror: &mut LockMirror, lines: &[&str]) {
    for line in lines {
        interpret_line(mirror, line);
    }
}

/// Create a backend with a single device port and a link over it.
///
/// # Example
/// ```ignore
/// let (backend, device, mut link) = link_with_device();
/// device.enqueue_read(b"KEY:1\n");
/// ```
pub fn link_with_device() -> (Arc<MockSerialBackend>, MockSerialPort, SerialLink) {
    let backend = Arc::new(MockSerialBackend::new());
    let device = backend.add_port(DEVICE_PORT);
    let link = SerialLink::new(backend.clone(), PortConfiguration::default());
    (backend, device, link)
}

/// Wait for the next link event, failing the test after one second.
pub async fn next_event(rx: &mut UnboundedReceiver<LinkEvent>) -> LinkEvent {
    tokio::time::timeout(Duration::from_secs(1), rx.recv())
        .await
        .expect("timed out waiting for link event")
        .expect("link event channel closed")
}

/// Collect line events until the connection reports closed.
pub async fn lines_until_closed(rx: &mut UnboundedReceiver<LinkEvent>) -> Vec<String> {
    let mut lines = Vec::new();
    loop {
        match next_event(rx).await {
            LinkEvent::Line { line, .. } => lines.push(line),
            LinkEvent::Closed { .. } => return lines,
        }
    }
}
