//! controller.rs
//! Start/stop lifecycle of one worker thread.
//!
//! The driver is the only caller and never touches one handle from two places,
//! so a handle needs no locking of its own. Console feedback ("starting ..." /
//! "stopping ...") goes to the caller's writer, next to the round lines.

use std::{
    io::Write,
    sync::Arc,
    thread::{self, JoinHandle},
};

use log::{debug, warn};

use crate::threading::worker::{run_worker, WorkerContext, WorkerShared};
use crate::utils::error::{HarnessError, Result};
use crate::workload::Work;

/// Scheduling and payload of one worker. `priority == 0` keeps the default
/// time-shared class; anything above asks for SCHED_FIFO at that priority.
#[derive(Debug, Clone, Copy)]
pub struct ThreadConfig {
    pub name: &'static str,
    pub priority: u32,
    pub cpu: usize,
    pub work: Work,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleState {
    Empty,
    Running,
    Stopped,
}

/// A reusable slot for one worker thread.
pub struct WorkerHandle {
    config: Option<ThreadConfig>,
    shared: Arc<WorkerShared>,
    thread: Option<JoinHandle<()>>,
    state: HandleState,
}

impl Default for WorkerHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkerHandle {
    pub fn new() -> Self {
        Self {
            config: None,
            shared: Arc::new(WorkerShared::new()),
            thread: None,
            state: HandleState::Empty,
        }
    }

    pub fn state(&self) -> HandleState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == HandleState::Running
    }

    pub fn config(&self) -> Option<&ThreadConfig> {
        self.config.as_ref()
    }

    /// Latest iteration count published by the worker. Zero before the first
    /// start and right after a restart.
    #[inline]
    pub fn counter(&self) -> u64 {
        self.shared.counter()
    }

    fn name(&self) -> &'static str {
        self.config.map(|c| c.name).unwrap_or("?")
    }
}

/// Launch a worker for `config` in `handle`. The counter restarts at 0.
pub fn start<W: Write>(handle: &mut WorkerHandle, config: ThreadConfig, out: &mut W) -> Result<()> {
    if handle.is_running() {
        return Err(HarnessError::AlreadyRunning {
            name: config.name.to_string(),
        });
    }

    writeln!(
        out,
        "starting {} thread to do {} work at priority {} on cpu/core {}",
        config.name, config.work, config.priority, config.cpu
    )?;

    let shared = Arc::new(WorkerShared::new());
    let ctx = WorkerContext {
        name: config.name,
        priority: config.priority,
        cpu: config.cpu,
        work: config.work,
    };

    let worker_shared = shared.clone();
    let spawned = thread::Builder::new()
        .name(format!("{}_cpu{}", config.name, config.cpu))
        .spawn(move || run_worker(ctx, &worker_shared));

    let join = match spawned {
        Ok(join) => join,
        Err(source) => {
            return Err(HarnessError::ThreadCreate {
                name: config.name.to_string(),
                source,
            });
        }
    };

    handle.config = Some(config);
    handle.shared = shared;
    handle.thread = Some(join);
    handle.state = HandleState::Running;
    Ok(())
}

/// Ask the worker to stop and wait for it. Blocks for as long as the worker
/// takes to reach its loop check. Afterwards the handle reads a zero counter
/// and can be started again.
pub fn stop<W: Write>(handle: &mut WorkerHandle, out: &mut W) -> Result<()> {
    let name = handle.name();
    let join = match handle.thread.take() {
        Some(join) if handle.is_running() => join,
        _ => {
            return Err(HarnessError::NotRunning {
                name: name.to_string(),
            });
        }
    };

    // a failed write still stops the worker
    let announced = writeln!(out, "stopping {} thread", name);

    handle.shared.request_stop();
    handle.state = HandleState::Stopped;
    let joined = join.join();
    handle.shared = Arc::new(WorkerShared::new());

    joined.map_err(|_| HarnessError::ThreadJoin {
        name: name.to_string(),
    })?;
    announced?;
    Ok(())
}

impl Drop for WorkerHandle {
    /// Best-effort cleanup for handles abandoned on an error path.
    fn drop(&mut self) {
        if let Some(join) = self.thread.take() {
            self.shared.request_stop();
            debug!("reaping {} thread on drop", self.name());
            if join.join().is_err() {
                warn!("{} thread panicked before cleanup", self.name());
            }
        }
    }
}
