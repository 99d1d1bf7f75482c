//! Serial link lifecycle: port request, open, read task, teardown.

use super::cancel::CancelToken;
use super::lines::lines;
use crate::port::{PortConfiguration, PortError, PortInfo, SerialBackend};
use futures::StreamExt;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Failures the user is told about.
#[derive(Debug, Error)]
pub enum LinkError {
    /// Port enumeration is not available on this host.
    #[error("Serial ports are not supported on this system: {0}")]
    Unsupported(#[source] serialport::Error),

    /// Enumeration worked but found nothing to connect to.
    #[error("No serial ports found. Is the device plugged in?")]
    NoPorts,

    /// The chosen port could not be opened.
    #[error("Could not open {port}: {source}")]
    Open {
        port: String,
        #[source]
        source: PortError,
    },
}

/// Where the link is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionPhase {
    /// No port held
    #[default]
    Closed,
    /// Waiting for the user to pick a port
    Requested,
    /// Port open and read task running
    Open,
}

/// Identifies one opened connection, so events from a torn-down read task
/// can be told apart from the current one.
pub type ConnectionId = u64;

/// Messages the read task sends to the application loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkEvent {
    /// One trimmed, non-empty line from the device
    Line { id: ConnectionId, line: String },
    /// The read task finished
    Closed { id: ConnectionId, port: String },
}

/// Owns the serial connection and its read task.
pub struct SerialLink {
    backend: Arc<dyn SerialBackend>,
    config: PortConfiguration,
    phase: ConnectionPhase,
    port_name: Option<String>,
    next_id: ConnectionId,
    current: Option<ActiveConnection>,
    /// Aborted read tasks that may still hold their port
    retiring: Vec<JoinHandle<()>>,
}

struct ActiveConnection {
    id: ConnectionId,
    cancel: CancelToken,
    task: JoinHandle<()>,
}

impl SerialLink {
    pub fn new(backend: Arc<dyn SerialBackend>, config: PortConfiguration) -> Self {
        Self {
            backend,
            config,
            phase: ConnectionPhase::Closed,
            port_name: None,
            next_id: 0,
            current: None,
            retiring: Vec::new(),
        }
    }

    pub fn phase(&self) -> ConnectionPhase {
        self.phase
    }

    /// Name of the open port, if any.
    pub fn port_name(&self) -> Option<&str> {
        match self.phase {
            ConnectionPhase::Open => self.port_name.as_deref(),
            _ => None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.phase == ConnectionPhase::Open
    }

    /// Id of the running connection.
    pub fn connection_id(&self) -> Option<ConnectionId> {
        self.current.as_ref().map(|c| c.id)
    }

    /// Tear down any existing connection and list the ports the user may pick.
    ///
    /// On success the link is `Requested` until [`connect`](Self::connect)
    /// or [`cancel_request`](Self::cancel_request) is called.
    pub fn request_port(&mut self) -> Result<Vec<PortInfo>, LinkError> {
        self.disconnect();

        let ports = match self.backend.available_ports() {
            Ok(ports) => ports,
            Err(e) => {
                error!(error = %e, "serial port enumeration failed");
                return Err(LinkError::Unsupported(e));
            }
        };
        if ports.is_empty() {
            info!("no serial ports available");
            return Err(LinkError::NoPorts);
        }

        debug!(count = ports.len(), "port request opened");
        self.phase = ConnectionPhase::Requested;
        Ok(ports)
    }

    /// The user dismissed the port request without choosing.
    pub fn cancel_request(&mut self) {
        if self.phase == ConnectionPhase::Requested {
            info!("port request cancelled by user");
            self.phase = ConnectionPhase::Closed;
        }
    }

    /// Open `port_name` and start reading lines into `events`.
    ///
    /// Any previous connection is torn down first, and its port handle is
    /// released before the new open so an exclusive port can be reopened.
    /// On failure the link is left closed; nothing is retried.
    pub async fn connect<E>(
        &mut self,
        port_name: &str,
        events: UnboundedSender<E>,
    ) -> Result<ConnectionId, LinkError>
    where
        E: From<LinkEvent> + Send + 'static,
    {
        self.close().await;

        let port = match self.backend.open(port_name, &self.config) {
            Ok(port) => port,
            Err(source) => {
                error!(port = port_name, error = %source, "failed to open serial port");
                return Err(LinkError::Open {
                    port: port_name.to_string(),
                    source,
                });
            }
        };

        self.next_id += 1;
        let id = self.next_id;
        let cancel = CancelToken::new();
        let name = port.name().to_string();
        let stream = lines(port, cancel.clone(), self.config.read_buffer_size);

        let task = tokio::spawn(async move {
            let mut stream = Box::pin(stream);
            while let Some(line) = stream.next().await {
                if events.send(E::from(LinkEvent::Line { id, line })).is_err() {
                    // Receiver gone: the application is shutting down.
                    return;
                }
            }
            // Release the port before announcing the close.
            drop(stream);
            let _ = events.send(E::from(LinkEvent::Closed { id, port: name }));
        });

        info!(
            port = port_name,
            baud = self.config.baud_rate,
            id,
            "serial port opened"
        );
        self.current = Some(ActiveConnection { id, cancel, task });
        self.port_name = Some(port_name.to_string());
        self.phase = ConnectionPhase::Open;
        Ok(id)
    }

    /// Stop the read task. Best effort; never fails.
    ///
    /// The port is released once the runtime drops the aborted task; use
    /// [`close`](Self::close) to wait for that.
    pub fn disconnect(&mut self) {
        if let Some(active) = self.current.take() {
            active.cancel.cancel();
            active.task.abort();
            debug!(id = active.id, "previous connection torn down");
            self.retiring.retain(|task| !task.is_finished());
            self.retiring.push(active.task);
        }
        if self.phase == ConnectionPhase::Open {
            if let Some(port) = &self.port_name {
                info!(port = port.as_str(), "serial port closed");
            }
        }
        self.phase = ConnectionPhase::Closed;
        self.port_name = None;
    }

    /// Stop the read task and wait until every torn-down task, and with it
    /// its port handle, has been dropped.
    pub async fn close(&mut self) {
        self.disconnect();
        for task in self.retiring.drain(..) {
            // Aborted tasks resolve to a cancellation error; either outcome
            // means the port is gone.
            let _ = task.await;
        }
    }

    /// Record that the read task of connection `id` has ended.
    ///
    /// Returns `true` if that was the current connection, in which case the
    /// link is now closed. Notifications from older connections are ignored.
    pub fn handle_closed(&mut self, id: ConnectionId) -> bool {
        match &self.current {
            Some(active) if active.id == id => {
                info!(id, port = ?self.port_name, "serial stream ended");
                self.current = None;
                self.phase = ConnectionPhase::Closed;
                self.port_name = None;
                true
            }
            _ => {
                if self.current.is_some() {
                    warn!(id, "ignoring close of a stale connection");
                }
                false
            }
        }
    }

    /// Whether a line from connection `id` belongs to the current connection.
    pub fn is_current(&self, id: ConnectionId) -> bool {
        self.connection_id() == Some(id)
    }
}

impl Drop for SerialLink {
    fn drop(&mut self) {
        self.disconnect();
    }
}

impl std::fmt::Debug for SerialLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerialLink")
            .field("phase", &self.phase)
            .field("port_name", &self.port_name)
            .field("connection_id", &self.connection_id())
            .finish()
    }
}
