//! Domain Layer
//!
//! The vocabulary of the relay without any I/O.
//!
//! ## Structure
//!
//! - `entities/` - Folder mappings and upload requests
//! - `value_objects/` - Normalized watch keys and remote target paths
//! - `ports/` - Interfaces implemented by infrastructure (transport, readiness, delivery)
//!
//! ## Design Principles
//!
//! 1. **No I/O** - This layer never touches the file system or network directly
//! 2. **Ports & Adapters** - All I/O goes through trait-defined ports

pub mod entities;
pub mod ports;
pub mod value_objects;
