//! Packet serial driver for Sabertooth motor controllers.
//!
//! The [`packet`] module is a pure codec for the 7-bit framed protocol. A
//! [`Sabertooth`] session layers one-request-one-reply transactions on top of
//! any [`SabertoothTransport`], opening it lazily through a
//! [`TransportOpener`].
//!
//! # Features
//!
//! - `serial` - Serial port transport and USB discovery using the serialport crate
//!
//! # Example
//!
//! ```ignore
//! use sabertooth::{DEFAULT_ADDRESS, Sabertooth, find_port};
//!
//! let port = find_port()?;
//! let mut st = Sabertooth::serial(DEFAULT_ADDRESS, port);
//!
//! st.motor(1, 0.5)?;
//! println!("Battery: {} V", st.battery()?);
//! ```

mod controller;
mod discovery;
pub mod packet;
mod transport;
mod types;

#[cfg(feature = "serial")]
mod serial;

// Re-exports
pub use controller::Sabertooth;
pub use discovery::{SABERTOOTH_PID, SABERTOOTH_VID, UsbDevice, select_port};
pub use packet::{decode_reply, decode_reply_checked, get_frame, set_frame};
pub use transport::{SabertoothTransport, TransportOpener};
pub use types::{
    CMD_GET, CMD_REPLY, CMD_SET, DEFAULT_ADDRESS, FULL_SCALE, GetType, MAX_MAGNITUDE, Packet,
    REPLY_LEN, ReplyCheck, Result, SabertoothError, SerialConfig, SetType,
};

#[cfg(feature = "serial")]
pub use discovery::find_port;
#[cfg(feature = "serial")]
pub use serial::{SerialOpener, SerialTransport};
