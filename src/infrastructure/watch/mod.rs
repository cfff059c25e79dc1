//! Filesystem notification source
//!
//! Wraps `notify` watchers and turns their events into `RawEvent`s on a
//! tokio channel. No filtering beyond event kind happens here; coalescing is
//! the debounce coordinator's job.

mod notify_source;

pub use notify_source::{relevant_paths, FolderWatch, RawEvent};
