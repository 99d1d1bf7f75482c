//! Async serial port implementation using tokio-serial.

use super::error::PortError;
use super::traits::{AsyncSerialPortAdapter, PortConfiguration, PortInfo, SerialBackend};
use async_trait::async_trait;
use tokio::io::AsyncReadExt;

/// Native async serial port backed by `tokio_serial::SerialStream`.
pub struct TokioSerialPort {
    /// The underlying tokio-serial stream.
    inner: tokio_serial::SerialStream,
    /// Port name/path for identification.
    name: String,
}

impl TokioSerialPort {
    /// Open a serial port at the device baud rate, 8N1, no flow control.
    ///
    /// # Example
    /// ```no_run
    /// use keypad_lock_monitor::port::{PortConfiguration, TokioSerialPort};
    ///
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let port = TokioSerialPort::open("/dev/ttyACM0", &PortConfiguration::default())?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn open(port_name: &str, config: &PortConfiguration) -> Result<Self, PortError> {
        let builder = tokio_serial::new(port_name, config.baud_rate)
            .data_bits(tokio_serial::DataBits::Eight)
            .flow_control(tokio_serial::FlowControl::None)
            .parity(tokio_serial::Parity::None)
            .stop_bits(tokio_serial::StopBits::One);

        let inner = tokio_serial::SerialStream::open(&builder)
            .map_err(|e| PortError::from_open_error(port_name, e))?;

        Ok(Self {
            inner,
            name: port_name.to_string(),
        })
    }
}

#[async_trait]
impl AsyncSerialPortAdapter for TokioSerialPort {
    async fn read_bytes(&mut self, buffer: &mut [u8]) -> Result<usize, PortError> {
        self.inner.read(buffer).await.map_err(PortError::Io)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Debug for TokioSerialPort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokioSerialPort")
            .field("name", &self.name)
            .finish()
    }
}

/// The host's real serial subsystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemSerialBackend;

impl SerialBackend for SystemSerialBackend {
    fn available_ports(&self) -> Result<Vec<PortInfo>, serialport::Error> {
        let mut ports: Vec<PortInfo> = serialport::available_ports()?
            .into_iter()
            .map(PortInfo::from)
            .collect();
        ports.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(ports)
    }

    fn open(
        &self,
        port_name: &str,
        config: &PortConfiguration,
    ) -> Result<Box<dyn AsyncSerialPortAdapter>, PortError> {
        Ok(Box::new(TokioSerialPort::open(port_name, config)?))
    }
}
