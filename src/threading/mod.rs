//! Thread harness: configure, run and control pinned busy-loop workers.

pub mod configurator;
pub mod controller;
pub mod worker;

pub use controller::{start, stop, HandleState, ThreadConfig, WorkerHandle};
