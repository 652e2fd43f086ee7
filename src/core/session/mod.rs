// Session module - Session control and background polling
pub mod controller;
pub mod poller;
pub mod state;

pub use controller::SessionController;
pub use poller::{Poller, CONNECTED_NOTICE, LOST_CONNECTION_NOTICE};
pub use state::ConnectionState;
