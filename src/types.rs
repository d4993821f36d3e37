//! Types for Sabertooth packet serial operations

use std::time::Duration;

use thiserror::Error;

/// Address used by controllers straight from the factory
pub const DEFAULT_ADDRESS: u8 = 128;

/// Top-level SET command.
pub const CMD_SET: u8 = 40;
/// Top-level GET command.
pub const CMD_GET: u8 = 41;
/// Command byte carried by every reply frame.
pub const CMD_REPLY: u8 = 73;

/// Replies are always exactly this many bytes.
pub const REPLY_LEN: usize = 9;

/// Largest magnitude that fits in the two 7-bit value bytes.
pub const MAX_MAGNITUDE: u16 = 0x3FFF;

/// Protocol units corresponding to a normalized value of 1.0.
pub const FULL_SCALE: f64 = 2047.0;

/// Sub-opcodes of the SET command.
///
/// A negative value is sent as `opcode + 1`, so every variant is even.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SetType {
    Value = 0,
    KeepAlive = 16,
    Shutdown = 32,
    Timeout = 64,
}

/// Sub-opcodes of the GET command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum GetType {
    Value = 0,
    Battery = 16,
    Current = 32,
    Temperature = 64,
}

/// A decoded reply frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Packet {
    pub address: u8,
    /// Reply sub-opcode with the sign bit already stripped
    pub target: u8,
    pub value: i16,
    pub target_type: u8,
    pub number: u8,
}

/// How much of a reply frame is verified before decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReplyCheck {
    /// Only the frame length and reply marker are checked.
    #[default]
    Lenient,
    /// Also verify the header and payload checksums.
    Strict,
}

/// Serial line settings used when opening a port
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerialConfig {
    pub baud_rate: u32,
    /// Read/write deadline of the underlying port
    pub timeout: Duration,
    /// Delay between opening the port and flushing its input buffer
    pub settle_delay: Duration,
}

impl SerialConfig {
    pub const DEFAULT_BAUD_RATE: u32 = 115_200;

    pub fn baud_rate(mut self, baud_rate: u32) -> Self {
        self.baud_rate = baud_rate;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn settle_delay(mut self, settle_delay: Duration) -> Self {
        self.settle_delay = settle_delay;
        self
    }
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            baud_rate: Self::DEFAULT_BAUD_RATE,
            timeout: Duration::from_secs(1),
            settle_delay: Duration::from_millis(500),
        }
    }
}

/// Errors that can occur while talking to a Sabertooth
#[derive(Debug, Error)]
pub enum SabertoothError {
    /// Opening, writing to or reading from the channel failed
    #[error("transport error: {0}")]
    Transport(String),
    /// Data on the wire did not have the expected frame shape
    #[error("protocol error: {0}")]
    Protocol(String),
    /// A caller supplied value is outside its allowed domain
    #[error("value out of range: {0}")]
    Range(String),
    /// No attached serial port matched the device signature
    #[error("device not found: {0}")]
    DeviceNotFound(String),
}

pub type Result<T> = std::result::Result<T, SabertoothError>;

/// Convert a transport error into a [`SabertoothError::Transport`]
pub(crate) fn transport_err<E: std::fmt::Debug>(e: E) -> SabertoothError {
    SabertoothError::Transport(format!("{:?}", e))
}
