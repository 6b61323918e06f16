//! Command line surface of `dsptest`.
//!
//! Positional only: nothing, the four thread arguments, or those four plus a
//! filler payload. Anything else is a usage error.

use std::ffi::OsString;

use clap::{error::ErrorKind, value_parser, Arg, Command};

use crate::experiment::config::{ExperimentConfig, ThreadSpec, FIFO_PRIORITY};
use crate::workload::{Work, CATALOG};

const THREAD_ARGS: [&str; 4] = ["dsp_cpu", "dsp_work", "disturb_cpu", "disturb_work"];

fn catalog_help() -> String {
    let mut text = format!(
        "If <extra_work> is specified, SCHED_OTHER threads will be started on cpu/cores\n\
         that are not occupied by the dsp or disturb thread.\n\
         \n\
         The dsp and disturb threads are SCHED_FIFO ones and run at priority {}\n\
         \n\
         Work can be specified as full string or single char:\n",
        FIFO_PRIORITY
    );
    for d in CATALOG {
        text.push_str(&format!(" {:>5} or {} - {}\n", d.name, d.ch, d.descr));
    }
    text
}

pub fn command() -> Command {
    Command::new("dsptest")
        .version(clap::crate_version!())
        .disable_help_flag(true)
        .disable_version_flag(true)
        .about("dsptest - test how much CPUs/cores/threads affect each other.")
        .override_usage("dsptest [<dsp_cpu> <dsp_work> <disturb_cpu> <disturb_work> [<extra_work>]]")
        .arg(
            Arg::new("dsp_cpu")
                .value_parser(value_parser!(usize))
                .help("cpu/core index (zero based) of the measured thread, default 0"),
        )
        .arg(Arg::new("dsp_work").help("work done by the measured thread"))
        .arg(
            Arg::new("disturb_cpu")
                .value_parser(value_parser!(usize))
                .help("cpu/core index (zero based) of the disturbance thread, default 1"),
        )
        .arg(Arg::new("disturb_work").help("work done by the disturbance thread"))
        .arg(Arg::new("extra_work").help("work done by filler threads on all other cpu/cores"))
        .after_help(catalog_help())
}

/// Turn the command line into an experiment configuration for `cpu_count` cores.
pub fn parse_from<I, T>(args: I, cpu_count: usize) -> Result<ExperimentConfig, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let mut cmd = command();
    let matches = cmd.try_get_matches_from_mut(args)?;

    let given = THREAD_ARGS.iter().filter(|id| matches.contains_id(id)).count();
    let mut config = ExperimentConfig::default_for(cpu_count);

    match given {
        0 => return Ok(config),
        4 => {}
        _ => return Err(cmd.error(ErrorKind::WrongNumberOfValues, "expected 0, 4 or 5 arguments")),
    }

    let work_of = |id: &str| {
        matches
            .get_one::<String>(id)
            .map(|s| Work::decode(s))
            .unwrap_or(Work::Null)
    };
    let cpu_of = |id: &str| matches.get_one::<usize>(id).copied().unwrap_or_default();

    config.measured = ThreadSpec { cpu: cpu_of("dsp_cpu"), work: work_of("dsp_work") };
    config.disturb = ThreadSpec { cpu: cpu_of("disturb_cpu"), work: work_of("disturb_work") };
    config.filler_work = matches.contains_id("extra_work").then(|| work_of("extra_work"));

    Ok(config)
}
