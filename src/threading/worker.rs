//! worker.rs
//! Busy-loop body of every measured, disturbance and filler thread.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use crossbeam::utils::CachePadded;
use log::{debug, error};

use crate::threading::configurator::configure;
use crate::workload::Work;

/// State shared between one worker and its handle.
///
/// - `stop`: written once (false → true) by the controller, read by the worker each iteration.
/// - `counter`: written only by the worker, read by the driver when sampling.
#[derive(Debug, Default)]
pub struct WorkerShared {
    stop: AtomicBool,
    counter: CachePadded<AtomicU64>,
}

impl WorkerShared {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn request_stop(&self) {
        self.stop.store(true, Ordering::Release);
    }

    #[inline]
    pub fn stop_requested(&self) -> bool {
        self.stop.load(Ordering::Acquire)
    }

    #[inline]
    pub fn counter(&self) -> u64 {
        self.counter.load(Ordering::Relaxed)
    }
}

/// What a freshly spawned worker needs to configure itself and run.
#[derive(Debug, Clone, Copy)]
pub struct WorkerContext {
    pub name: &'static str,
    pub priority: u32,
    pub cpu: usize,
    pub work: Work,
}

/// Thread entry point: configure, then spin on `work` until told to stop.
///
/// A configuration failure ends the thread before the loop, leaving the counter at 0.
pub fn run_worker(ctx: WorkerContext, shared: &WorkerShared) {
    if let Err(e) = configure(ctx.priority, ctx.cpu) {
        error!("[{}] not running on cpu/core {}: {}", ctx.name, ctx.cpu, e);
        return;
    }

    let mut iterations: u64 = 0;
    while !shared.stop_requested() {
        ctx.work.run();

        // single writer: a plain store of the local count is enough
        iterations = iterations.wrapping_add(1);
        shared.counter.store(iterations, Ordering::Relaxed);
    }

    debug!("[{}] stopped after {} iterations", ctx.name, iterations);
}
