// Serial module - Serial transport implementation
pub mod client;
pub mod discovery;
pub mod script;

pub use client::SerialTransport;
pub use discovery::{find_device_port, list_ports, PortSummary};
pub use script::{send_script, ScriptMode, ScriptTiming};
