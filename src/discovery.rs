//! Locating a Sabertooth among the attached USB serial devices

use crate::types::{Result, SabertoothError};

/// USB vendor id of Dimension Engineering
pub const SABERTOOTH_VID: u16 = 0x268B;
/// USB product id of the Sabertooth packet serial interface
pub const SABERTOOTH_PID: u16 = 0x0201;

/// An attached USB serial device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsbDevice {
    pub port_name: String,
    pub vid: u16,
    pub pid: u16,
}

/// Pick the first device matching the Sabertooth USB signature.
pub fn select_port(devices: &[UsbDevice]) -> Result<String> {
    if devices.is_empty() {
        return Err(SabertoothError::DeviceNotFound("no serial ports found".into()));
    }
    match_signature(devices)
}

/// First device with the Sabertooth vendor and product id
pub(crate) fn match_signature(devices: &[UsbDevice]) -> Result<String> {
    devices
        .iter()
        .find(|d| d.vid == SABERTOOTH_VID && d.pid == SABERTOOTH_PID)
        .map(|d| d.port_name.clone())
        .ok_or_else(|| SabertoothError::DeviceNotFound("sabertooth not found".into()))
}

/// Scan the serial ports for a Sabertooth. Ports that are not USB devices
/// never match.
#[cfg(feature = "serial")]
pub fn find_port() -> Result<String> {
    let ports = serialport::available_ports().map_err(crate::types::transport_err)?;
    log::debug!("Found {} serial ports", ports.len());
    if ports.is_empty() {
        return Err(SabertoothError::DeviceNotFound("no serial ports found".into()));
    }

    let devices: Vec<UsbDevice> = ports
        .into_iter()
        .filter_map(|port| match port.port_type {
            serialport::SerialPortType::UsbPort(info) => Some(UsbDevice {
                port_name: port.port_name,
                vid: info.vid,
                pid: info.pid,
            }),
            _ => None,
        })
        .collect();

    let port_name = match_signature(&devices)?;
    log::info!("Found Sabertooth on {}", port_name);
    Ok(port_name)
}
