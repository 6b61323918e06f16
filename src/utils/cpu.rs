//! CPU/core queries used for configuration and verification.

use std::io;

/// Logical cores this process may run on.
pub fn available_cpu_count() -> usize {
    num_cpus::get().max(1)
}

/// Core indices in the calling thread's affinity mask, ascending.
#[cfg(target_os = "linux")]
pub fn current_affinity() -> io::Result<Vec<usize>> {
    use std::mem;

    // SAFETY: cpu_set_t is plain data; sched_getaffinity fills it for the calling thread.
    unsafe {
        let mut set: libc::cpu_set_t = mem::zeroed();
        libc::CPU_ZERO(&mut set);
        if libc::sched_getaffinity(0, mem::size_of::<libc::cpu_set_t>(), &mut set) != 0 {
            return Err(io::Error::last_os_error());
        }

        let max = libc::CPU_SETSIZE as usize;
        Ok((0..max).filter(|&cpu| libc::CPU_ISSET(cpu, &set)).collect())
    }
}

/// Core indices usable by the calling thread, as reported by `core_affinity`.
#[cfg(not(target_os = "linux"))]
pub fn current_affinity() -> io::Result<Vec<usize>> {
    core_affinity::get_core_ids()
        .map(|ids| ids.into_iter().map(|c| c.id).collect())
        .ok_or_else(|| io::Error::new(io::ErrorKind::Unsupported, "cpu affinity not available"))
}
