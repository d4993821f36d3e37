use crate::types::SabertoothError;

/// Trait for Sabertooth communication backends.
/// Implement this trait for different byte channels (serial port, UART, test doubles).
pub trait SabertoothTransport {
    /// Error type for transport operations
    type Error: std::fmt::Debug;

    /// Write data to the transport, returning the number of bytes accepted
    fn write(&mut self, data: &[u8]) -> Result<usize, Self::Error>;

    /// Read into `buf` with the channel's own blocking/deadline semantics
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;
}

/// Opens a transport for a port identifier.
///
/// The session calls this at most once per open channel, the first time an
/// operation needs it.
pub trait TransportOpener {
    type Transport: SabertoothTransport;

    fn open(&mut self, port_name: &str) -> Result<Self::Transport, SabertoothError>;
}
