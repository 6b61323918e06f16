//! Experiment configuration and its defaults.

use std::time::Duration;

use crate::utils::error::{HarnessError, Result};
use crate::workload::Work;

/// Rounds per on/off block of the disturbance thread.
pub const DISTURB_SWITCH_PERIOD: usize = 5;
/// Off/on blocks in a full run (two on, two off).
pub const TEST_CYCLES: usize = 4;
/// SCHED_FIFO priority of the measured and disturbance threads.
pub const FIFO_PRIORITY: u32 = 10;
pub const ROUND_LENGTH: Duration = Duration::from_secs(1);

pub const DEFAULT_MEASURED_CPU: usize = 0;
pub const DEFAULT_DISTURB_CPU: usize = 1;

/// Core and payload of one pinned thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThreadSpec {
    pub cpu: usize,
    pub work: Work,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExperimentConfig {
    pub measured: ThreadSpec,
    pub disturb: ThreadSpec,
    /// `Some` starts a time-shared filler on every other core.
    pub filler_work: Option<Work>,
    pub switch_period: usize,
    pub cycles: usize,
    pub round_length: Duration,
    pub rt_priority: u32,
    pub cpu_count: usize,
}

impl ExperimentConfig {
    /// Measured on core 0, disturbance on core 1, both float, no fillers.
    pub fn default_for(cpu_count: usize) -> Self {
        Self {
            measured: ThreadSpec { cpu: DEFAULT_MEASURED_CPU, work: Work::Float },
            disturb: ThreadSpec { cpu: DEFAULT_DISTURB_CPU, work: Work::Float },
            filler_work: None,
            switch_period: DISTURB_SWITCH_PERIOD,
            cycles: TEST_CYCLES,
            round_length: ROUND_LENGTH,
            rt_priority: FIFO_PRIORITY,
            cpu_count,
        }
    }

    pub fn rounds(&self) -> usize {
        self.switch_period * self.cycles
    }

    /// Cores that get a filler thread: every core but the measured and disturbance ones.
    pub fn filler_cpus(&self) -> Vec<usize> {
        if self.filler_work.is_none() {
            return Vec::new();
        }
        (0..self.cpu_count)
            .filter(|&cpu| cpu != self.measured.cpu && cpu != self.disturb.cpu)
            .collect()
    }

    pub fn validate(&self) -> Result<()> {
        for cpu in [self.measured.cpu, self.disturb.cpu] {
            if cpu >= self.cpu_count {
                return Err(HarnessError::InvalidCpu {
                    cpu,
                    available: self.cpu_count,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_give_twenty_rounds() {
        let cfg = ExperimentConfig::default_for(4);
        assert_eq!(cfg.rounds(), 20);
        assert_eq!(cfg.measured.cpu, 0);
        assert_eq!(cfg.disturb.cpu, 1);
        assert_eq!(cfg.rt_priority, 10);
        assert!(cfg.filler_cpus().is_empty());
    }

    #[test]
    fn fillers_skip_pinned_cores() {
        let mut cfg = ExperimentConfig::default_for(6);
        cfg.measured.cpu = 2;
        cfg.disturb.cpu = 4;
        cfg.filler_work = Some(Work::Int);
        assert_eq!(cfg.filler_cpus(), vec![0, 1, 3, 5]);
    }

    #[test]
    fn out_of_range_cpu_is_rejected() {
        let mut cfg = ExperimentConfig::default_for(2);
        assert!(cfg.validate().is_ok());
        cfg.disturb.cpu = 2;
        assert!(matches!(
            cfg.validate(),
            Err(HarnessError::InvalidCpu { cpu: 2, available: 2 })
        ));
    }
}
