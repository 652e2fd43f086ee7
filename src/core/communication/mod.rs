// Communication module - Transport and sink abstractions
#[cfg(any(test, feature = "test-util"))]
pub mod mock;
pub mod sink;
pub mod transport;

#[cfg(any(test, feature = "test-util"))]
pub use mock::{MockTransport, TransportCall};
pub use sink::{MemorySink, Sink};
pub use transport::{Transport, LINE_ENDING};
