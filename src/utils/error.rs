//! Error kinds raised by the thread harness.
//!
//! Affinity and scheduling failures happen inside a worker and only end that
//! worker. Create/join failures surface to the driver and abort the experiment.

use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HarnessError {
    /// Pinning the calling thread to `cpu` was refused by the OS.
    #[error("Cannot set scheduling affinity to cpu/core {cpu}: {source}")]
    Affinity { cpu: usize, source: io::Error },

    /// Real-time FIFO class at `priority` was refused (usually missing privilege).
    #[error("Cannot set scheduling policy (SCHED_FIFO, priority {priority}): {reason}")]
    Scheduling { priority: u32, reason: String },

    #[error("Cannot create {name} thread: {source}")]
    ThreadCreate { name: String, source: io::Error },

    /// The worker panicked before it could be joined cleanly.
    #[error("Cannot stop {name} thread: worker panicked")]
    ThreadJoin { name: String },

    #[error("{name} thread is already running")]
    AlreadyRunning { name: String },

    #[error("{name} thread is not running")]
    NotRunning { name: String },

    #[error("cpu/core {cpu} is out of range ({available} cpu(s) available)")]
    InvalidCpu { cpu: usize, available: usize },

    /// Writing the per-round report failed.
    #[error("Cannot write experiment output: {0}")]
    Output(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, HarnessError>;
