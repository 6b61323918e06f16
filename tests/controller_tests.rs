use std::{
    io,
    thread,
    time::{Duration, Instant},
};

use cpu_interference::threading::{start, stop, HandleState, ThreadConfig, WorkerHandle};
use cpu_interference::utils::{cpu::current_affinity, error::HarnessError};
use cpu_interference::workload::Work;

fn config(name: &'static str, work: Work) -> ThreadConfig {
    let cpu = current_affinity()
        .ok()
        .and_then(|cores| cores.first().copied())
        .unwrap_or(0);
    ThreadConfig {
        name,
        priority: 0,
        cpu,
        work,
    }
}

fn wait_for_progress(handle: &WorkerHandle, above: u64) -> u64 {
    let deadline = Instant::now() + Duration::from_secs(5);
    loop {
        let now = handle.counter();
        if now > above || Instant::now() > deadline {
            return now;
        }
        thread::sleep(Duration::from_millis(5));
    }
}

#[test]
fn counter_grows_until_stopped() {
    let mut handle = WorkerHandle::new();
    assert_eq!(handle.state(), HandleState::Empty);
    assert_eq!(handle.counter(), 0);

    start(&mut handle, config("measured", Work::Int), &mut io::sink()).unwrap();
    assert!(handle.is_running());

    let first = wait_for_progress(&handle, 0);
    assert!(first > 0);
    let second = wait_for_progress(&handle, first);
    assert!(second > first);

    stop(&mut handle, &mut io::sink()).unwrap();
    assert_eq!(handle.state(), HandleState::Stopped);
    assert_eq!(handle.counter(), 0);
}

#[test]
fn immediate_stop_after_start_succeeds() {
    for _ in 0..20 {
        let mut handle = WorkerHandle::new();
        start(&mut handle, config("flash", Work::Null), &mut io::sink()).unwrap();
        stop(&mut handle, &mut io::sink()).unwrap();
    }
}

#[test]
fn handle_can_be_restarted_after_stop() {
    let mut handle = WorkerHandle::new();

    start(&mut handle, config("disturb", Work::Float), &mut io::sink()).unwrap();
    assert!(wait_for_progress(&handle, 0) > 0);
    stop(&mut handle, &mut io::sink()).unwrap();

    start(&mut handle, config("disturb", Work::Comb1), &mut io::sink()).unwrap();
    assert_eq!(handle.config().map(|c| c.work), Some(Work::Comb1));
    assert!(wait_for_progress(&handle, 0) > 0);
    stop(&mut handle, &mut io::sink()).unwrap();
}

#[test]
fn double_start_is_refused() {
    let mut handle = WorkerHandle::new();
    start(&mut handle, config("dsp", Work::Null), &mut io::sink()).unwrap();

    let again = start(&mut handle, config("dsp", Work::Null), &mut io::sink());
    assert!(matches!(again, Err(HarnessError::AlreadyRunning { .. })));
    assert!(handle.is_running());

    stop(&mut handle, &mut io::sink()).unwrap();
}

#[test]
fn stop_without_running_worker_is_refused() {
    let mut handle = WorkerHandle::new();
    assert!(matches!(stop(&mut handle, &mut io::sink()), Err(HarnessError::NotRunning { .. })));

    start(&mut handle, config("dsp", Work::Null), &mut io::sink()).unwrap();
    stop(&mut handle, &mut io::sink()).unwrap();
    assert!(matches!(stop(&mut handle, &mut io::sink()), Err(HarnessError::NotRunning { .. })));
}

#[test]
fn worker_that_cannot_pin_never_counts() {
    let mut handle = WorkerHandle::new();
    let cfg = ThreadConfig {
        name: "misplaced",
        priority: 0,
        cpu: 4096,
        work: Work::Null,
    };

    start(&mut handle, cfg, &mut io::sink()).unwrap();
    thread::sleep(Duration::from_millis(50));
    assert_eq!(handle.counter(), 0);
    stop(&mut handle, &mut io::sink()).unwrap();
}

#[test]
fn dropping_a_running_handle_reaps_the_worker() {
    let mut handle = WorkerHandle::new();
    start(&mut handle, config("abandoned", Work::Null), &mut io::sink()).unwrap();
    wait_for_progress(&handle, 0);
    drop(handle);
}

#[test]
fn start_and_stop_announce_themselves_on_the_writer() {
    let mut out = Vec::new();
    let mut handle = WorkerHandle::new();
    let cfg = config("dsp", Work::Comb2);

    start(&mut handle, cfg, &mut out).unwrap();
    stop(&mut handle, &mut out).unwrap();

    let text = String::from_utf8(out).unwrap();
    let started = format!("starting dsp thread to do comb2 work at priority 0 on cpu/core {}", cfg.cpu);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines, vec![started.as_str(), "stopping dsp thread"]);
}

#[test]
fn refused_stop_writes_nothing() {
    let mut out = Vec::new();
    let mut handle = WorkerHandle::new();
    assert!(stop(&mut handle, &mut out).is_err());
    assert!(out.is_empty());
}
