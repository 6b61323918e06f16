//! # dsptest
//! Measures how much threads pinned to different cores slow each other down.
//!
//! ## Run
//! - **Measured ("dsp") thread:** SCHED_FIFO, pinned, runs for the whole experiment.
//! - **Disturbance thread:** SCHED_FIFO, pinned, on for 5 rounds, off for 5 rounds.
//! - **Filler threads (optional):** SCHED_OTHER on every remaining core.
//!
//! One line per one-second round: iterations of the measured thread, then of the
//! disturbance thread, during that round.
//!
//! Set `RUST_LOG=info` (or `debug`) for lifecycle details on stderr.

use std::{io, process};

use log::info;

use cpu_interference::{cli, experiment::run_experiment, utils::cpu::available_cpu_count};

fn main() {
    env_logger::init();

    let cpu_count = available_cpu_count();

    let config = match cli::parse_from(std::env::args_os(), cpu_count) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", cli::command().render_help());
            eprint!("{}", e);
            process::exit(1);
        }
    };

    println!("{} cpu(s)", cpu_count);
    info!("=== DSPTEST START ===");

    let stdout = io::stdout();
    if let Err(e) = run_experiment(&config, stdout.lock()) {
        eprintln!("{}", e);
        process::exit(1);
    }

    info!("=== DSPTEST FINISHED ===");
}
