//! Newline splitting of the serial byte stream.

use super::cancel::CancelToken;
use crate::port::{AsyncSerialPortAdapter, PortError};
use futures::stream::{self, Stream};
use tracing::debug;

/// Buffers raw bytes and hands out complete, trimmed, non-empty lines.
///
/// Bytes are only decoded once a full line is present, so a multi-byte
/// character split across two reads is decoded intact. Invalid UTF-8 is
/// replaced rather than rejected.
#[derive(Debug, Default)]
pub struct LineBuffer {
    pending: Vec<u8>,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self {
            pending: Vec::with_capacity(64),
        }
    }

    /// Append a chunk read from the port.
    pub fn push(&mut self, chunk: &[u8]) {
        self.pending.extend_from_slice(chunk);
    }

    /// Take the next complete line, skipping lines that are blank after trimming.
    pub fn next_line(&mut self) -> Option<String> {
        while let Some(pos) = memchr::memchr(b'\n', &self.pending) {
            let raw: Vec<u8> = self.pending.drain(..=pos).collect();
            let line = String::from_utf8_lossy(&raw[..pos]);
            let trimmed = line.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
        None
    }

    /// Bytes received after the last newline.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }
}

/// Why a line stream stopped producing.
#[derive(Debug)]
pub enum StreamEnd {
    /// The port reported end-of-stream
    Eof,
    /// The connection's token was cancelled
    Cancelled,
    /// A read failed, typically because the device went away
    ReadError(PortError),
}

enum Step {
    Cancelled,
    Read(Result<usize, PortError>),
}

struct LineState {
    port: Box<dyn AsyncSerialPortAdapter>,
    cancel: CancelToken,
    buffer: LineBuffer,
    chunk: Vec<u8>,
    end: Option<StreamEnd>,
}

/// Lazy sequence of lines read from `port` until it ends or `cancel` fires.
///
/// Nothing is read until the stream is polled. Each connection gets its own
/// stream; a closed stream is never resumed.
pub fn lines(
    port: Box<dyn AsyncSerialPortAdapter>,
    cancel: CancelToken,
    read_buffer_size: usize,
) -> impl Stream<Item = String> + Send {
    let state = LineState {
        port,
        cancel,
        buffer: LineBuffer::new(),
        chunk: vec![0u8; read_buffer_size.max(1)],
        end: None,
    };

    stream::unfold(state, |mut st| async move {
        loop {
            // Cancellation discards whatever is still buffered.
            if st.cancel.is_cancelled() {
                debug!(
                    port = st.port.name(),
                    dropped_bytes = st.buffer.pending_len(),
                    "line stream cancelled"
                );
                return None;
            }
            if let Some(line) = st.buffer.next_line() {
                return Some((line, st));
            }
            if st.end.is_some() {
                return None;
            }

            let step = tokio::select! {
                biased;
                _ = st.cancel.cancelled() => Step::Cancelled,
                read = st.port.read_bytes(&mut st.chunk) => Step::Read(read),
            };

            let end = match step {
                Step::Cancelled => StreamEnd::Cancelled,
                Step::Read(Ok(0)) => StreamEnd::Eof,
                Step::Read(Ok(n)) => {
                    st.buffer.push(&st.chunk[..n]);
                    continue;
                }
                Step::Read(Err(e)) => StreamEnd::ReadError(e),
            };

            debug!(
                port = st.port.name(),
                ?end,
                pending_bytes = st.buffer.pending_len(),
                "line stream ended"
            );
            if matches!(end, StreamEnd::Cancelled) {
                return None;
            }
            st.end = Some(end);
        }
    })
}
