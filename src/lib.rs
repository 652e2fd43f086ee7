//! crowcom library
//!
//! Interactive serial console for the crow module: operator commands,
//! script transfer, device event parsing and a reconnecting poller.

pub mod cli;
pub mod core;
pub mod domain;
pub mod infrastructure;
pub mod tui;

pub use crate::core::command::{Command, CommandInterpreter, Outcome};
pub use crate::core::communication::{Sink, Transport};
pub use crate::core::events::{DeviceEvent, DeviceEventParser, EventArgs, EventKind, HandlerRegistry};
pub use crate::core::session::{ConnectionState, SessionController};
pub use crate::domain::config::CrowComConfig;
pub use crate::domain::error::{CrowComError, CrowComResult};
pub use crate::infrastructure::serial::SerialTransport;
