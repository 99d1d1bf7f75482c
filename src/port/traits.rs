//! Core traits for serial port abstraction.
//!
//! [`AsyncSerialPortAdapter`] is what the read loop consumes, and
//! [`SerialBackend`] is how the link enumerates and opens ports. Both have a
//! real implementation and a mock, so the whole link can run in tests
//! without hardware.

use super::error::PortError;
use async_trait::async_trait;

/// Baud rate the keypad firmware talks at.
pub const DEVICE_BAUD_RATE: u32 = 115_200;

/// Parameters used when opening the device port.
///
/// Framing is always 8N1 without flow control; only the read chunk size is
/// tunable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortConfiguration {
    /// Baud rate (bits per second).
    pub baud_rate: u32,
    /// Size of the buffer handed to each read.
    pub read_buffer_size: usize,
}

impl Default for PortConfiguration {
    fn default() -> Self {
        Self {
            baud_rate: DEVICE_BAUD_RATE,
            read_buffer_size: 256,
        }
    }
}

impl PortConfiguration {
    pub fn with_read_buffer_size(read_buffer_size: usize) -> Self {
        Self {
            read_buffer_size: read_buffer_size.max(1),
            ..Self::default()
        }
    }
}

/// A serial port visible to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortInfo {
    /// System path or name (`/dev/ttyACM0`, `COM3`).
    pub name: String,
    /// Human readable description, when the driver reports one.
    pub description: Option<String>,
}

impl PortInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
        }
    }
}

impl From<serialport::SerialPortInfo> for PortInfo {
    fn from(info: serialport::SerialPortInfo) -> Self {
        let description = match info.port_type {
            serialport::SerialPortType::UsbPort(usb) => usb
                .product
                .or(usb.manufacturer)
                .or_else(|| Some(format!("USB {:04x}:{:04x}", usb.vid, usb.pid))),
            serialport::SerialPortType::BluetoothPort => Some("Bluetooth".to_string()),
            serialport::SerialPortType::PciPort => Some("PCI".to_string()),
            serialport::SerialPortType::Unknown => None,
        };
        Self {
            name: info.port_name,
            description,
        }
    }
}

/// Async read side of an open serial port.
///
/// Note: only `Send` is required; the port is moved into the read task and
/// used exclusively from there.
#[async_trait]
pub trait AsyncSerialPortAdapter: Send {
    /// Read bytes into `buffer`, waiting until at least one is available.
    ///
    /// `Ok(0)` means the stream has ended (port closed or device gone).
    async fn read_bytes(&mut self, buffer: &mut [u8]) -> Result<usize, PortError>;

    /// Get the name/path of this serial port.
    fn name(&self) -> &str;
}

/// Host serial subsystem: port enumeration and opening.
pub trait SerialBackend: Send + Sync {
    /// List the ports the user may choose from.
    ///
    /// An error here means the platform has no usable serial support.
    fn available_ports(&self) -> Result<Vec<PortInfo>, serialport::Error>;

    /// Open `port_name` for reading.
    fn open(
        &self,
        port_name: &str,
        config: &PortConfiguration,
    ) -> Result<Box<dyn AsyncSerialPortAdapter>, PortError>;
}
