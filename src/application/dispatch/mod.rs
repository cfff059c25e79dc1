//! Dispatch Pipeline
//!
//! Glues the watch source, the debounce coordinator and the delivery
//! callback together:
//! - `start` registers one watch per valid folder mapping
//! - raw events are pumped into the coordinator
//! - stabilized files are handed to the single `FileReadyHandler`
//! - callback failures are contained and logged per file

mod dispatcher;
mod pipeline;


pub use dispatcher::Dispatcher;
pub use pipeline::{
    DispatchPipeline, PipelineSettings, SkipReason, SkippedMapping, StartReport, WatchedFolder,
};
