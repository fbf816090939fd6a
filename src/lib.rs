//! Idlewatch: shut the machine down once a process tree stops reading from disk.
//!
//! This library exposes the core modules for use by the binary and by tests.

pub mod clock;
pub mod collectors;
pub mod config;
pub mod controller;
pub mod error;
pub mod logging;
pub mod model;
pub mod shutdown;
pub mod view;

pub use controller::Monitor;
pub use error::{Result, WatchError};
