//! Mock serial port and backend for testing.
//!
//! `MockSerialPort` replays queued chunks to the read loop. Reads block while
//! the queue is empty until more data is queued or the port is closed, which
//! mirrors how a real device stream behaves between keypresses.
//!
//! `MockSerialBackend` hands out exclusive handles: a port opened through it
//! reads as busy until the handle is dropped, like a tty opened with
//! `TIOCEXCL`.

use super::error::PortError;
use super::traits::{AsyncSerialPortAdapter, PortConfiguration, PortInfo, SerialBackend};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tokio::sync::Notify;

#[derive(Debug)]
enum MockRead {
    Data(Vec<u8>),
    Error(std::io::ErrorKind),
}

/// Inner state shared between clones of a mock port.
#[derive(Debug, Default)]
struct MockPortState {
    reads: VecDeque<MockRead>,
    /// Once set, an empty queue reads as end-of-stream.
    closed: bool,
    /// Number of `read_bytes` calls that returned.
    reads_served: usize,
    /// A backend handle to this port is alive.
    held: bool,
}

/// Mock serial port implementation for testing.
///
/// # Example
/// ```
/// use keypad_lock_monitor::port::{AsyncSerialPortAdapter, MockSerialPort};
///
/// # tokio_test::block_on(async {
/// let port = MockSerialPort::new("MOCK0");
/// port.enqueue_read(b"KEY:1\n");
/// port.close();
///
/// let mut reader = port.clone();
/// let mut buffer = [0u8; 16];
/// let n = reader.read_bytes(&mut buffer).await.unwrap();
/// assert_eq!(&buffer[..n], b"KEY:1\n");
/// assert_eq!(reader.read_bytes(&mut buffer).await.unwrap(), 0);
/// # });
/// ```
#[derive(Clone)]
pub struct MockSerialPort {
    name: String,
    state: Arc<Mutex<MockPortState>>,
    notify: Arc<Notify>,
}

impl MockSerialPort {
    /// Create a new mock serial port with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: Arc::new(Mutex::new(MockPortState::default())),
            notify: Arc::new(Notify::new()),
        }
    }

    /// Queue one chunk to be returned by a later read.
    pub fn enqueue_read(&self, data: &[u8]) {
        self.state.lock().reads.push_back(MockRead::Data(data.to_vec()));
        self.notify.notify_one();
    }

    /// Queue a read failure, as when the device is unplugged mid-read.
    pub fn enqueue_error(&self, kind: std::io::ErrorKind) {
        self.state.lock().reads.push_back(MockRead::Error(kind));
        self.notify.notify_one();
    }

    /// Signal end-of-stream once the queue is drained.
    pub fn close(&self) {
        self.state.lock().closed = true;
        self.notify.notify_one();
    }

    /// Chunks still waiting to be read.
    pub fn pending_reads(&self) -> usize {
        self.state.lock().reads.len()
    }

    /// Number of reads that have completed.
    pub fn reads_served(&self) -> usize {
        self.state.lock().reads_served
    }

    /// Whether a handle opened through [`MockSerialBackend`] is still alive.
    pub fn is_held(&self) -> bool {
        self.state.lock().held
    }
}

#[async_trait]
impl AsyncSerialPortAdapter for MockSerialPort {
    async fn read_bytes(&mut self, buffer: &mut [u8]) -> Result<usize, PortError> {
        loop {
            {
                let mut state = self.state.lock();
                match state.reads.pop_front() {
                    Some(MockRead::Data(mut data)) => {
                        let n = data.len().min(buffer.len());
                        buffer[..n].copy_from_slice(&data[..n]);
                        if n < data.len() {
                            state.reads.push_front(MockRead::Data(data.split_off(n)));
                        }
                        state.reads_served += 1;
                        return Ok(n);
                    }
                    Some(MockRead::Error(kind)) => {
                        state.reads_served += 1;
                        return Err(PortError::Io(std::io::Error::new(kind, "mock read failure")));
                    }
                    None if state.closed => {
                        state.reads_served += 1;
                        return Ok(0);
                    }
                    None => {}
                }
            }
            self.notify.notified().await;
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Debug for MockSerialPort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockSerialPort")
            .field("name", &self.name)
            .field("pending_reads", &self.pending_reads())
            .finish()
    }
}

/// Exclusive handle returned by [`MockSerialBackend::open`].
struct HeldMockPort {
    port: MockSerialPort,
}

#[async_trait]
impl AsyncSerialPortAdapter for HeldMockPort {
    async fn read_bytes(&mut self, buffer: &mut [u8]) -> Result<usize, PortError> {
        self.port.read_bytes(buffer).await
    }

    fn name(&self) -> &str {
        self.port.name()
    }
}

impl Drop for HeldMockPort {
    fn drop(&mut self) {
        self.port.state.lock().held = false;
    }
}

#[derive(Debug, Default)]
struct MockBackendState {
    ports: HashMap<String, MockSerialPort>,
    busy: Vec<String>,
    unsupported: bool,
    open_log: Vec<String>,
}

/// Serial backend serving [`MockSerialPort`]s.
#[derive(Debug, Clone, Default)]
pub struct MockSerialBackend {
    state: Arc<Mutex<MockBackendState>>,
}

impl MockSerialBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a port and return a handle for feeding it.
    pub fn add_port(&self, name: &str) -> MockSerialPort {
        let port = MockSerialPort::new(name);
        self.state.lock().ports.insert(name.to_string(), port.clone());
        port
    }

    /// Make opening `name` fail as if another process held it.
    pub fn mark_busy(&self, name: &str) {
        self.state.lock().busy.push(name.to_string());
    }

    /// Make enumeration fail as on a host without serial support.
    pub fn set_unsupported(&self, unsupported: bool) {
        self.state.lock().unsupported = unsupported;
    }

    /// Names passed to `open`, in call order.
    pub fn open_log(&self) -> Vec<String> {
        self.state.lock().open_log.clone()
    }
}

impl SerialBackend for MockSerialBackend {
    fn available_ports(&self) -> Result<Vec<PortInfo>, serialport::Error> {
        let state = self.state.lock();
        if state.unsupported {
            return Err(serialport::Error::new(
                serialport::ErrorKind::Unknown,
                "serial ports are not supported on this platform",
            ));
        }
        let mut ports: Vec<PortInfo> = state.ports.keys().map(PortInfo::new).collect();
        ports.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(ports)
    }

    fn open(
        &self,
        port_name: &str,
        _config: &PortConfiguration,
    ) -> Result<Box<dyn AsyncSerialPortAdapter>, PortError> {
        let mut state = self.state.lock();
        state.open_log.push(port_name.to_string());
        if state.busy.iter().any(|b| b == port_name) {
            return Err(PortError::busy(port_name));
        }
        let port = state
            .ports
            .get(port_name)
            .ok_or_else(|| PortError::not_found(port_name))?;

        let mut port_state = port.state.lock();
        if port_state.held {
            return Err(PortError::busy(port_name));
        }
        port_state.held = true;
        drop(port_state);

        Ok(Box::new(HeldMockPort { port: port.clone() }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_enqueue_and_read() {
        let mut port = MockSerialPort::new("MOCK0");
        port.enqueue_read(b"KEY:1\n");

        let mut buffer = [0u8; 32];
        let n = port.read_bytes(&mut buffer).await.unwrap();
        assert_eq!(&buffer[..n], b"KEY:1\n");
        assert_eq!(port.reads_served(), 1);
    }

    #[tokio::test]
    async fn test_partial_read_keeps_remainder() {
        let mut port = MockSerialPort::new("MOCK0");
        port.enqueue_read(b"STATE:IDLE\n");

        let mut buffer = [0u8; 5];
        let n = port.read_bytes(&mut buffer).await.unwrap();
        assert_eq!(&buffer[..n], b"STATE");
        assert_eq!(port.pending_reads(), 1);

        let mut rest = [0u8; 32];
        let n = port.read_bytes(&mut rest).await.unwrap();
        assert_eq!(&rest[..n], b":IDLE\n");
    }

    #[tokio::test]
    async fn test_close_reads_as_eof() {
        let mut port = MockSerialPort::new("MOCK0");
        port.close();
        let mut buffer = [0u8; 8];
        assert_eq!(port.read_bytes(&mut buffer).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_read_waits_for_data() {
        let port = MockSerialPort::new("MOCK0");
        let mut reader = port.clone();
        let handle = tokio::spawn(async move {
            let mut buffer = [0u8; 8];
            reader.read_bytes(&mut buffer).await.map(|n| buffer[..n].to_vec())
        });

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!handle.is_finished());

        port.enqueue_read(b"KEY:2\n");
        let data = handle.await.unwrap().unwrap();
        assert_eq!(data, b"KEY:2\n");
    }

    #[tokio::test]
    async fn test_enqueued_error() {
        let mut port = MockSerialPort::new("MOCK0");
        port.enqueue_error(std::io::ErrorKind::BrokenPipe);
        let mut buffer = [0u8; 8];
        let result = port.read_bytes(&mut buffer).await;
        assert!(matches!(result, Err(PortError::Io(e)) if e.kind() == std::io::ErrorKind::BrokenPipe));
    }

    #[test]
    fn test_backend_busy_and_missing() {
        let backend = MockSerialBackend::new();
        backend.add_port("COM3");
        backend.mark_busy("COM3");

        let config = PortConfiguration::default();
        assert!(matches!(backend.open("COM3", &config), Err(PortError::Busy(_))));
        assert!(matches!(backend.open("COM9", &config), Err(PortError::NotFound(_))));
        assert_eq!(backend.open_log(), vec!["COM3", "COM9"]);
    }

    #[test]
    fn test_backend_handles_are_exclusive() {
        let backend = MockSerialBackend::new();
        let port = backend.add_port("COM1");
        let config = PortConfiguration::default();

        let handle = backend.open("COM1", &config).unwrap();
        assert!(port.is_held());
        assert!(matches!(backend.open("COM1", &config), Err(PortError::Busy(_))));

        drop(handle);
        assert!(!port.is_held());
        assert!(backend.open("COM1", &config).is_ok());
    }

    #[test]
    fn test_backend_unsupported() {
        let backend = MockSerialBackend::new();
        backend.set_unsupported(true);
        assert!(backend.available_ports().is_err());
    }
}
