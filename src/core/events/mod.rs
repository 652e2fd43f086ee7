// Events module - Device output framing and dispatch
pub mod event;
pub mod handlers;
pub mod parser;

pub use event::{DeviceEvent, EventArgs, EventKind};
pub use handlers::{EventHandler, HandlerRegistry};
pub use parser::DeviceEventParser;
