use std::time::Duration;

use log::{debug, info, warn};

use crate::packet;
use crate::transport::{SabertoothTransport, TransportOpener};
use crate::types::{
    FULL_SCALE, GetType, MAX_MAGNITUDE, REPLY_LEN, ReplyCheck, Result, SabertoothError, SetType,
    transport_err,
};

/// A Sabertooth motor controller reachable through a single byte channel.
///
/// Every operation is one transaction: a write followed, for queries, by a
/// read of exactly one reply frame. The protocol carries no request id, so a
/// session must not be shared between threads without external locking.
pub struct Sabertooth<O: TransportOpener> {
    address: u8,
    port_name: String,
    opener: O,
    transport: Option<O::Transport>,
    reply_check: ReplyCheck,
}

impl<O: TransportOpener> Sabertooth<O> {
    // Targets for commands addressed to the whole controller
    const TARGET_MOTOR: u8 = b'M';
    const TARGET_ALL: u8 = b'*';

    const SHUTDOWN_ON: i16 = 2048;
    const TIMEOUT_DISABLED: i16 = -1;

    /// Create a session. The port is not opened until it is first needed.
    pub fn new(address: u8, port_name: impl Into<String>, opener: O) -> Self {
        Self {
            address,
            port_name: port_name.into(),
            opener,
            transport: None,
            reply_check: ReplyCheck::default(),
        }
    }

    /// Verify reply checksums in addition to length and marker
    pub fn with_reply_check(mut self, reply_check: ReplyCheck) -> Self {
        self.reply_check = reply_check;
        self
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    pub fn port_name(&self) -> &str {
        &self.port_name
    }

    pub fn is_open(&self) -> bool {
        self.transport.is_some()
    }

    /// Open the port if it is not open yet.
    pub fn open(&mut self) -> Result<()> {
        if self.transport.is_none() {
            let transport = self.opener.open(&self.port_name)?;
            info!("Opened {} for address {}", self.port_name, self.address);
            self.transport = Some(transport);
        }
        Ok(())
    }

    /// Release the port. A later operation opens it again.
    pub fn close(&mut self) {
        if self.transport.take().is_some() {
            info!("Closed {}", self.port_name);
        }
    }

    /// Read one of the inputs. `port` is `b'S'`, `b'A'`, `b'M'` or `b'P'`
    /// and `n` is 1 or 2. The result is roughly between -1 and 1.
    pub fn input(&mut self, port: u8, n: u8) -> Result<f64> {
        let value = self.read(GetType::Value, port, n)?;
        Ok(value as f64 / FULL_SCALE)
    }

    /// Battery voltage in volts
    pub fn battery(&mut self) -> Result<f64> {
        let value = self.read(GetType::Battery, Self::TARGET_MOTOR, 1)?;
        Ok(value as f64 / 10.0)
    }

    /// Current drawn by a motor driver in amperes
    pub fn current(&mut self, motor: u8) -> Result<f64> {
        let value = self.read(GetType::Current, Self::TARGET_MOTOR, motor)?;
        Ok(value as f64 / 10.0)
    }

    /// Temperature of a motor driver in the device's native unit
    pub fn temp(&mut self, motor: u8) -> Result<i16> {
        self.read(GetType::Temperature, Self::TARGET_MOTOR, motor)
    }

    /// Query a value and return it in raw protocol units.
    pub fn read(&mut self, get_type: GetType, target_type: u8, target_number: u8) -> Result<i16> {
        let request = packet::get_frame(self.address, get_type as u8, target_type, target_number);
        let reply_check = self.reply_check;
        let transport = self.channel()?;

        debug!("Sending command: {:02X?}", request);
        let written = transport.write(&request).map_err(transport_err)?;
        debug!("Wrote {} bytes", written);

        let mut reply = [0u8; REPLY_LEN];
        let bytes_read = transport.read(&mut reply).map_err(transport_err)?;
        debug!("Received {} bytes: {:02X?}", bytes_read, &reply[..bytes_read.min(REPLY_LEN)]);
        if bytes_read != REPLY_LEN {
            warn!("Expected {} reply bytes, got {}", REPLY_LEN, bytes_read);
            return Err(SabertoothError::Protocol("unexpected data length".into()));
        }

        let packet = packet::decode_reply_checked(&reply, reply_check).inspect_err(|e| {
            warn!("Rejected reply {:02X?}: {}", reply, e);
        })?;
        Ok(packet.value)
    }

    /// Drive a motor. `motor` is 1 or 2, `speed` is between -1 and 1 inclusive.
    pub fn motor(&mut self, motor: u8, speed: f64) -> Result<()> {
        if !(-1.0..=1.0).contains(&speed) {
            return Err(SabertoothError::Range(format!("speed {} is outside [-1, 1]", speed)));
        }
        let value = (speed * FULL_SCALE) as i16;
        self.set(SetType::Value, Self::TARGET_MOTOR, motor, value)
    }

    /// Reset the serial timeout without changing any output.
    pub fn keep_alive(&mut self) -> Result<()> {
        self.set(SetType::KeepAlive, Self::TARGET_MOTOR, Self::TARGET_ALL, 0)
    }

    /// Stop the motors when no command arrives within `timeout`.
    /// `None` disables the timeout.
    pub fn set_timeout(&mut self, timeout: Option<Duration>) -> Result<()> {
        let value = match timeout {
            None => Self::TIMEOUT_DISABLED,
            Some(timeout) => {
                let millis = timeout.as_millis();
                if millis > MAX_MAGNITUDE as u128 {
                    return Err(SabertoothError::Range(format!(
                        "timeout of {} ms exceeds {} ms",
                        millis, MAX_MAGNITUDE
                    )));
                }
                millis as i16
            }
        };
        self.set(SetType::Timeout, Self::TARGET_MOTOR, Self::TARGET_ALL, value)
    }

    /// Assert or release the shutdown of an output.
    pub fn shutdown(&mut self, target_type: u8, number: u8, shut_down: bool) -> Result<()> {
        let value = if shut_down { Self::SHUTDOWN_ON } else { 0 };
        self.set(SetType::Shutdown, target_type, number, value)
    }

    /// Send a SET command with a raw protocol value. No reply is read.
    pub fn set(
        &mut self,
        set_type: SetType,
        target_type: u8,
        target_number: u8,
        value: i16,
    ) -> Result<()> {
        if value.unsigned_abs() > MAX_MAGNITUDE {
            return Err(SabertoothError::Range(format!("value {value} does not fit in 14 bits")));
        }

        let command =
            packet::set_frame(self.address, set_type as u8, target_type, target_number, value);
        let transport = self.channel()?;

        debug!("Sending command: {:02X?}", command);
        let written = transport.write(&command).map_err(transport_err)?;
        if written != command.len() {
            warn!("Wrote {} of {} bytes", written, command.len());
            return Err(SabertoothError::Protocol("wrote unexpected number of bytes".into()));
        }
        Ok(())
    }

    fn channel(&mut self) -> Result<&mut O::Transport> {
        self.open()?;
        self.transport
            .as_mut()
            .ok_or_else(|| SabertoothError::Transport(format!("{} is not open", self.port_name)))
    }
}
