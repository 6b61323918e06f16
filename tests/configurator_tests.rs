use std::thread;

use cpu_interference::threading::configurator::configure;
use cpu_interference::utils::{cpu::current_affinity, error::HarnessError};

fn first_usable_core() -> usize {
    current_affinity()
        .ok()
        .and_then(|cores| cores.first().copied())
        .unwrap_or(0)
}

#[test]
#[cfg(target_os = "linux")]
fn pins_calling_thread_to_exactly_one_core() {
    for cpu in current_affinity().unwrap() {
        let mask = thread::spawn(move || {
            configure(0, cpu).unwrap();
            current_affinity().unwrap()
        })
        .join()
        .unwrap();

        assert_eq!(mask, vec![cpu]);
    }
}

#[test]
fn pinning_does_not_leak_to_other_threads() {
    let before = current_affinity().unwrap();
    let cpu = first_usable_core();

    thread::spawn(move || configure(0, cpu).unwrap()).join().unwrap();

    assert_eq!(current_affinity().unwrap(), before);
}

#[test]
fn core_index_past_mask_size_fails() {
    let result = thread::spawn(|| configure(0, 4096)).join().unwrap();
    assert!(matches!(result, Err(HarnessError::Affinity { cpu: 4096, .. })));
}

#[test]
#[cfg(target_os = "linux")]
fn offline_core_fails_with_os_error() {
    let cores = current_affinity().unwrap();
    if cores.contains(&1023) {
        return;
    }

    let result = thread::spawn(|| configure(0, 1023)).join().unwrap();
    match result {
        Err(HarnessError::Affinity { cpu, source }) => {
            assert_eq!(cpu, 1023);
            assert!(source.raw_os_error().is_some());
        }
        other => panic!("expected affinity error, got {:?}", other),
    }
}

#[test]
fn out_of_range_priority_is_a_scheduling_error() {
    let cpu = first_usable_core();
    let result = thread::spawn(move || configure(300, cpu)).join().unwrap();
    match result {
        Err(HarnessError::Scheduling { priority, reason }) => {
            assert_eq!(priority, 300);
            assert!(!reason.is_empty());
        }
        other => panic!("expected scheduling error, got {:?}", other),
    }
}

#[test]
fn fifo_request_succeeds_or_reports_scheduling_error() {
    // needs CAP_SYS_NICE / an rtprio limit, so both outcomes are legitimate here
    let cpu = first_usable_core();
    let result = thread::spawn(move || configure(10, cpu)).join().unwrap();
    match result {
        Ok(()) => {}
        Err(HarnessError::Scheduling { priority, reason }) => {
            assert_eq!(priority, 10);
            assert!(!reason.is_empty());
        }
        Err(other) => panic!("unexpected error: {}", other),
    }
}
