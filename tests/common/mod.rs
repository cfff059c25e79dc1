//! Common test utilities for droprelay integration tests.
//!
//! This module provides:
//! - `TestEnv`: isolated temp directory with a config file and CLI helpers
//! - `MemoryConnector`: in-process transport that records uploads
//! - `Recorder`: delivery callback that records stabilized files

#![allow(dead_code)]

pub mod env;
pub mod transport;

pub use env::*;
pub use transport::*;
