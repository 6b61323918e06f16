//! configurator.rs
//! Pins the *calling* thread to one core and optionally moves it to SCHED_FIFO.
//!
//! Both calls act on the current thread only, so this must run inside the
//! worker being configured, never on its behalf from the controller.

use std::io;

use core_affinity::{set_for_current, CoreId};
use log::{debug, error};

use crate::utils::error::{HarnessError, Result};

/// Upper bound of a cpu mask the OS accepts (`CPU_SETSIZE` on Linux).
const MAX_CPUS: usize = 1024;

/// Bind the calling thread to `cpu`; if `priority > 0`, also request real-time
/// FIFO scheduling at that priority. No retry on failure.
pub fn configure(priority: u32, cpu: usize) -> Result<()> {
    pin_to_cpu(cpu)?;

    if priority > 0 {
        set_fifo_priority(priority)?;
    }

    debug!("thread {:?} configured: cpu={} priority={}", std::thread::current().name(), cpu, priority);
    Ok(())
}

fn pin_to_cpu(cpu: usize) -> Result<()> {
    if cpu >= MAX_CPUS {
        let err = HarnessError::Affinity {
            cpu,
            source: io::Error::from_raw_os_error(libc::EINVAL),
        };
        error!("{}", err);
        return Err(err);
    }

    if set_for_current(CoreId { id: cpu }) {
        return Ok(());
    }

    // errno is still the one left by sched_setaffinity
    let err = HarnessError::Affinity {
        cpu,
        source: io::Error::last_os_error(),
    };
    error!("{}", err);
    Err(err)
}

#[cfg(unix)]
fn set_fifo_priority(priority: u32) -> Result<()> {
    use thread_priority::{
        set_thread_priority_and_policy, thread_native_id, RealtimeThreadSchedulePolicy,
        ThreadPriority, ThreadPriorityValue, ThreadSchedulePolicy,
    };

    let scheduling_error = |reason: String| {
        let err = HarnessError::Scheduling { priority, reason };
        error!("{}", err);
        err
    };

    let raw = u8::try_from(priority).map_err(|e| scheduling_error(e.to_string()))?;
    let value = ThreadPriorityValue::try_from(raw).map_err(|e| scheduling_error(format!("{:?}", e)))?;

    set_thread_priority_and_policy(
        thread_native_id(),
        ThreadPriority::Crossplatform(value),
        ThreadSchedulePolicy::Realtime(RealtimeThreadSchedulePolicy::Fifo),
    )
    .map_err(|e| scheduling_error(describe_priority_error(e)))
}

#[cfg(unix)]
fn describe_priority_error(e: thread_priority::Error) -> String {
    match e {
        thread_priority::Error::OS(code) => io::Error::from_raw_os_error(code).to_string(),
        other => format!("{:?}", other),
    }
}

/// No FIFO class off unix; the closest is the platform's top priority.
#[cfg(not(unix))]
fn set_fifo_priority(priority: u32) -> Result<()> {
    use thread_priority::ThreadPriority;

    ThreadPriority::Max.set_for_current().map_err(|e| {
        let err = HarnessError::Scheduling {
            priority,
            reason: format!("{:?}", e),
        };
        error!("{}", err);
        err
    })
}
