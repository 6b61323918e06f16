//! driver.rs
//! Runs one measured thread for the whole experiment and switches a disturbance
//! thread on and off every `switch_period` rounds, printing both counter deltas
//! once per round.
//!
//! Timing is a plain sleep per round, so drift accumulates over the run.

use std::{collections::BTreeMap, io::Write};

use log::{debug, info};
use spin_sleep::{SpinSleeper, SpinStrategy};

use crate::experiment::{
    config::ExperimentConfig,
    schedule::{Phase, Schedule, Transition},
};
use crate::threading::{start, stop, ThreadConfig, WorkerHandle};
use crate::utils::{
    error::Result,
    sampling::{Baseline, RoundSample},
};

const MEASURED_NAME: &str = "dsp";
const DISTURB_NAME: &str = "disturb";
const FILLER_NAME: &str = "extra";

/// Per-round results of a finished run, in print order.
#[derive(Debug, Clone, Default)]
pub struct ExperimentReport {
    pub samples: Vec<RoundSample>,
}

impl ExperimentReport {
    pub fn in_phase(&self, phase: Phase) -> impl Iterator<Item = &RoundSample> {
        self.samples.iter().filter(move |s| s.phase == phase)
    }
}

/// Owns every worker of one run. Handles left running when an error aborts the
/// run are reaped when the experiment is dropped.
pub struct Experiment<'a, W: Write> {
    config: &'a ExperimentConfig,
    out: W,
    measured: WorkerHandle,
    disturb: WorkerHandle,
    fillers: BTreeMap<usize, WorkerHandle>,
    phase: Phase,
    measured_baseline: Baseline,
    disturb_baseline: Baseline,
}

impl<'a, W: Write> Experiment<'a, W> {
    pub fn new(config: &'a ExperimentConfig, out: W) -> Self {
        Self {
            config,
            out,
            measured: WorkerHandle::new(),
            disturb: WorkerHandle::new(),
            fillers: BTreeMap::new(),
            phase: Phase::MeasuredOnly,
            measured_baseline: Baseline::default(),
            disturb_baseline: Baseline::default(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Full run: fillers, table, measured thread, timed rounds, teardown.
    pub fn run(&mut self) -> Result<ExperimentReport> {
        let cfg = self.config;
        cfg.validate()?;

        let schedule = Schedule::new(cfg.switch_period, cfg.rounds());
        info!(
            "[Experiment] {} rounds of {:?}, switch period {}",
            schedule.rounds(),
            cfg.round_length,
            schedule.switch_period()
        );

        self.start_fillers()?;
        self.write_config_table()?;

        start(
            &mut self.measured,
            ThreadConfig {
                name: MEASURED_NAME,
                priority: cfg.rt_priority,
                cpu: cfg.measured.cpu,
                work: cfg.measured.work,
            },
            &mut self.out,
        )?;

        let sleeper = SpinSleeper::new(100_000).with_spin_strategy(SpinStrategy::YieldThread);
        let mut report = ExperimentReport::default();

        for round in 0..schedule.rounds() {
            if let Some(t) = schedule.transition_at(round, self.phase) {
                self.apply(t)?;
            }

            sleeper.sleep(cfg.round_length);

            let sample = self.sample(round);
            writeln!(self.out, "{}", sample.to_line())?;
            debug!("[Experiment] round {} {:?}: {:?}", round, sample.phase, sample);
            report.samples.push(sample);
        }

        if let Some(t) = schedule.transition_at(schedule.rounds(), self.phase) {
            self.apply(t)?;
        }
        stop(&mut self.measured, &mut self.out)?;
        self.stop_fillers()?;

        self.out.flush()?;
        info!("[Experiment] Completed");
        Ok(report)
    }

    fn apply(&mut self, transition: Transition) -> Result<()> {
        match transition {
            Transition::StartDisturb => {
                let cfg = self.config;
                start(
                    &mut self.disturb,
                    ThreadConfig {
                        name: DISTURB_NAME,
                        priority: cfg.rt_priority,
                        cpu: cfg.disturb.cpu,
                        work: cfg.disturb.work,
                    },
                    &mut self.out,
                )?;
                self.phase = Phase::MeasuredPlusDisturb;
            }
            Transition::StopDisturb => {
                stop(&mut self.disturb, &mut self.out)?;
                // a fresh delta series for the next activation
                self.disturb_baseline.reset();
                self.phase = Phase::MeasuredOnly;
            }
        }
        Ok(())
    }

    fn sample(&mut self, round: usize) -> RoundSample {
        let measured_now = self.measured.counter();
        let disturb_now = self.disturb.counter();

        RoundSample {
            round,
            phase: self.phase,
            measured_delta: self.measured_baseline.advance(measured_now),
            disturb_delta: self.disturb_baseline.advance(disturb_now),
        }
    }

    fn start_fillers(&mut self) -> Result<()> {
        let Some(work) = self.config.filler_work else {
            return Ok(());
        };

        for cpu in self.config.filler_cpus() {
            let handle = self.fillers.entry(cpu).or_default();
            start(
                handle,
                ThreadConfig {
                    name: FILLER_NAME,
                    priority: 0,
                    cpu,
                    work,
                },
                &mut self.out,
            )?;
        }
        info!("[Experiment] {} filler thread(s) running", self.fillers.len());
        Ok(())
    }

    fn stop_fillers(&mut self) -> Result<()> {
        for handle in self.fillers.values_mut() {
            if handle.is_running() {
                stop(handle, &mut self.out)?;
            }
        }
        Ok(())
    }

    fn write_config_table(&mut self) -> Result<()> {
        let cfg = self.config;
        writeln!(self.out, "-----------------------")?;
        writeln!(self.out, "       dsp |  disturb")?;
        writeln!(self.out, "cpu {:>6} |   {:>6}", cfg.measured.cpu, cfg.disturb.cpu)?;
        writeln!(
            self.out,
            "work {:>5} |   {:>6}",
            cfg.measured.work.name(),
            cfg.disturb.work.name()
        )?;
        writeln!(self.out, "-----------------------")?;
        Ok(())
    }
}

/// Convenience wrapper: build an [`Experiment`] over `out` and run it.
pub fn run_experiment<W: Write>(config: &ExperimentConfig, out: W) -> Result<ExperimentReport> {
    Experiment::new(config, out).run()
}
