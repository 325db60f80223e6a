//! # Mercury Serial Communication
//!
//! [`SerialTransport`] implements [`Transport`] on top of `tokio_serial`. The
//! port is opened lazily by the session on the first exchange and configured
//! for raw 8N1 at the configured baud rate.

use crate::mercury::transport::{Transport, TransportError};
use log::debug;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::time::{timeout, timeout_at, Instant};
use tokio_serial::{SerialPortBuilderExt, SerialStream};

/// Configuration for serial connection.
#[derive(Debug, Clone)]
pub struct SerialConfig {
    pub baudrate: u32,
    /// Applies to each read and each write separately.
    pub timeout: Duration,
}

impl Default for SerialConfig {
    fn default() -> Self {
        SerialConfig {
            baudrate: 38400,
            timeout: Duration::from_secs(8),
        }
    }
}

/// Serial line to a Mercury bus segment.
pub struct SerialTransport {
    device: String,
    config: SerialConfig,
    port: Option<SerialStream>,
}

impl SerialTransport {
    pub fn new(device: &str) -> Self {
        Self::with_config(device, SerialConfig::default())
    }

    pub fn with_config(device: &str, config: SerialConfig) -> Self {
        SerialTransport {
            device: device.to_string(),
            config,
            port: None,
        }
    }

    pub fn device(&self) -> &str {
        &self.device
    }

    pub fn config(&self) -> &SerialConfig {
        &self.config
    }

    fn port(&mut self) -> Result<&mut SerialStream, TransportError> {
        self.port.as_mut().ok_or(TransportError::NotOpen)
    }
}

#[async_trait::async_trait]
impl Transport for SerialTransport {
    async fn open(&mut self) -> Result<(), TransportError> {
        if self.port.is_some() {
            return Ok(());
        }
        let port = tokio_serial::new(&self.device, self.config.baudrate)
            .timeout(self.config.timeout)
            .open_native_async()
            .map_err(|e| TransportError::Open(e.to_string()))?;
        self.port = Some(port);
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.port.is_some()
    }

    async fn configure(&mut self) -> Result<(), TransportError> {
        debug!("Configure serial port {}", self.device);
        let baudrate = self.config.baudrate;
        let port = self.port()?;
        let configure = |e: tokio_serial::Error| TransportError::Configure(e.to_string());

        tokio_serial::SerialPort::set_baud_rate(&mut *port, baudrate).map_err(configure)?;
        tokio_serial::SerialPort::set_data_bits(&mut *port, tokio_serial::DataBits::Eight)
            .map_err(configure)?;
        tokio_serial::SerialPort::set_stop_bits(&mut *port, tokio_serial::StopBits::One)
            .map_err(configure)?;
        tokio_serial::SerialPort::set_parity(&mut *port, tokio_serial::Parity::None)
            .map_err(configure)?;
        tokio_serial::SerialPort::set_flow_control(&mut *port, tokio_serial::FlowControl::None)
            .map_err(configure)?;
        Ok(())
    }

    async fn write(&mut self, data: &[u8]) -> Result<usize, TransportError> {
        let to = self.config.timeout;
        let port = self.port()?;
        timeout(to, AsyncWriteExt::write_all(&mut *port, data))
            .await
            .map_err(|_| TransportError::Timeout("write"))??;
        timeout(to, AsyncWriteExt::flush(&mut *port))
            .await
            .map_err(|_| TransportError::Timeout("write"))??;
        Ok(data.len())
    }

    async fn read(&mut self, size: usize) -> Result<Vec<u8>, TransportError> {
        let deadline = Instant::now() + self.config.timeout;
        let port = self.port()?;
        let mut received = vec![0u8; size];
        let mut filled = 0;

        while filled < size {
            let n = match timeout_at(
                deadline,
                AsyncReadExt::read(&mut *port, &mut received[filled..]),
            )
            .await
            {
                Ok(result) => result?,
                Err(_) => break,
            };
            if n == 0 {
                return Err(TransportError::Io(std::io::Error::new(
                    std::io::ErrorKind::UnexpectedEof,
                    "no data from port",
                )));
            }
            filled += n;
        }

        received.truncate(filled);
        Ok(received)
    }

    async fn flush(&mut self) -> Result<(), TransportError> {
        let port = self.port.as_ref().ok_or(TransportError::NotOpen)?;
        tokio_serial::SerialPort::clear(port, tokio_serial::ClearBuffer::All)
            .map_err(|e| TransportError::Io(e.into()))
    }

    async fn close(&mut self) {
        // Dropping the stream closes the descriptor.
        self.port = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SerialConfig::default();
        assert_eq!(config.baudrate, 38400);
        assert_eq!(config.timeout, Duration::from_secs(8));
    }

    #[tokio::test]
    async fn test_unopened_port() {
        let mut transport = SerialTransport::new("/dev/null-mercury");
        assert!(!transport.is_open());
        assert!(matches!(transport.read(8).await, Err(TransportError::NotOpen)));
        assert!(matches!(transport.flush().await, Err(TransportError::NotOpen)));
        transport.close().await;
    }
}
