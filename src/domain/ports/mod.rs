//! Domain Ports (Interfaces)
//!
//! These traits define the boundaries of the domain layer.
//! Infrastructure layer provides concrete implementations.

pub mod file_ready;
pub mod readiness;
pub mod transport;

pub use file_ready::FileReadyHandler;
pub use readiness::{Readiness, ReadinessProbe};
pub use transport::{Connector, TransportError, TransportSession};
