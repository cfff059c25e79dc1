//! File System Implementations
//!
//! Lock probing used to decide whether a writer is done with a file.

mod lock;

pub use lock::try_open_exclusive;
