use crate::domain::{config::DeviceConfig, error::{CrowComError, CrowComResult}};
use serde::Serialize;
use serialport::{SerialPortInfo, SerialPortType};
use tracing::debug;

/// One serial port as reported by the OS.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PortSummary {
    pub name: String,
    pub kind: String,
    pub vid: Option<u16>,
    pub pid: Option<u16>,
    pub product: Option<String>,
    /// Whether the port matches the configured device
    pub matches: bool,
}

impl PortSummary {
    fn from_info(info: &SerialPortInfo, device: &DeviceConfig) -> Self {
        let matches = port_matches(info, device);
        match &info.port_type {
            SerialPortType::UsbPort(usb) => Self {
                name: info.port_name.clone(),
                kind: "usb".to_string(),
                vid: Some(usb.vid),
                pid: Some(usb.pid),
                product: usb.product.clone(),
                matches,
            },
            other => Self {
                name: info.port_name.clone(),
                kind: match other {
                    SerialPortType::BluetoothPort => "bluetooth",
                    SerialPortType::PciPort => "pci",
                    _ => "unknown",
                }
                .to_string(),
                vid: None,
                pid: None,
                product: None,
                matches,
            },
        }
    }
}

/// Whether `info` is the device described by `device`.
///
/// An explicit port name wins over USB ids.
pub fn port_matches(info: &SerialPortInfo, device: &DeviceConfig) -> bool {
    if let Some(port) = &device.port {
        return &info.port_name == port;
    }
    matches!(
        &info.port_type,
        SerialPortType::UsbPort(usb) if usb.vid == device.vid && usb.pid == device.pid
    )
}

/// Pick the port to open from a list of candidates.
pub fn select_port(ports: &[SerialPortInfo], device: &DeviceConfig) -> CrowComResult<String> {
    ports
        .iter()
        .find(|info| port_matches(info, device))
        .map(|info| info.port_name.clone())
        .ok_or_else(|| CrowComError::DeviceNotFound {
            criteria: device.criteria(),
        })
}

/// Locate the configured device among the ports present right now.
pub fn find_device_port(device: &DeviceConfig) -> CrowComResult<String> {
    let ports = serialport::available_ports().unwrap_or_else(|e| {
        debug!("Port enumeration failed: {}", e);
        Vec::new()
    });
    debug!("Found {} serial ports", ports.len());

    match (&device.port, select_port(&ports, device)) {
        (_, Ok(name)) => Ok(name),
        // Enumeration may not list every node (e.g. ptys); trust an explicit path.
        (Some(port), Err(_)) if std::path::Path::new(port).exists() => Ok(port.clone()),
        (_, Err(e)) => Err(e),
    }
}

/// Describe every serial port, flagging the ones matching `device`.
pub fn list_ports(device: &DeviceConfig) -> CrowComResult<Vec<PortSummary>> {
    let ports = serialport::available_ports()?;
    Ok(ports.iter().map(|info| PortSummary::from_info(info, device)).collect())
}
