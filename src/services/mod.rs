// Service exports
pub mod memory;
pub mod transport;
pub mod webhook;

pub use memory::MemoryTransport;
pub use transport::{Envelope, Transport, TransportError};
pub use webhook::WebhookTransport;
