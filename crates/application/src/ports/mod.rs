//! Port definitions (interfaces)
//!
//! Ports define the boundaries between the application core and external systems.
//! Each port is a trait that can be implemented by adapters in the infrastructure layer.

mod clock;
mod storage;
mod transport;

pub use clock::{Clock, FixedClock};
pub use storage::{KeyValueStore, MemoryStore, StorageError};
pub use transport::{GenerationTransport, TransportError, TransportResponse};
