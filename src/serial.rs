//! Serial port transport for desktop using serialport crate

use crate::controller::Sabertooth;
use crate::transport::{SabertoothTransport, TransportOpener};
use crate::types::{SabertoothError, SerialConfig};

pub struct SerialTransport {
    port: Box<dyn serialport::SerialPort>,
}

impl SerialTransport {
    pub fn new(port_name: &str, config: &SerialConfig) -> Result<Self, serialport::Error> {
        let port = serialport::new(port_name, config.baud_rate)
            .timeout(config.timeout)
            .open()?;
        std::thread::sleep(config.settle_delay);
        port.clear(serialport::ClearBuffer::Input)?;

        Ok(Self { port })
    }
}

impl SabertoothTransport for SerialTransport {
    type Error = std::io::Error;

    fn write(&mut self, data: &[u8]) -> Result<usize, Self::Error> {
        std::io::Write::write(&mut self.port, data)
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        std::io::Read::read(&mut self.port, buf)
    }
}

/// Opens serial ports with a fixed [`SerialConfig`]
#[derive(Debug, Clone, Default)]
pub struct SerialOpener {
    pub config: SerialConfig,
}

impl TransportOpener for SerialOpener {
    type Transport = SerialTransport;

    fn open(&mut self, port_name: &str) -> Result<SerialTransport, SabertoothError> {
        SerialTransport::new(port_name, &self.config)
            .map_err(|e| SabertoothError::Transport(format!("{}: {}", port_name, e)))
    }
}

impl Sabertooth<SerialOpener> {
    /// Session on a serial port at 115200 baud
    pub fn serial(address: u8, port_name: impl Into<String>) -> Self {
        Self::serial_with_config(address, port_name, SerialConfig::default())
    }

    pub fn serial_with_config(
        address: u8,
        port_name: impl Into<String>,
        config: SerialConfig,
    ) -> Self {
        Sabertooth::new(address, port_name, SerialOpener { config })
    }
}
