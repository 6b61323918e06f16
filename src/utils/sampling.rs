//! Per-round counter sampling.
//!
//! Worker counters only ever move forward but may wrap at `u64::MAX`, so every
//! delta is taken with wrapping subtraction.

use crate::experiment::schedule::Phase;

/// Iterations done between two samples of the same counter.
#[inline]
pub fn counter_delta(current: u64, previous: u64) -> u64 {
    current.wrapping_sub(previous)
}

/// One printed line of the experiment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundSample {
    pub round: usize,
    pub phase: Phase,
    pub measured_delta: u64,
    pub disturb_delta: u64,
}

impl RoundSample {
    /// Same layout the benchmark has always printed: two right-aligned columns.
    pub fn to_line(&self) -> String {
        format!("{:>10} {:>10}", self.measured_delta, self.disturb_delta)
    }
}

/// Previous-sample bookkeeping for one counter.
#[derive(Debug, Default, Clone, Copy)]
pub struct Baseline {
    previous: u64,
}

impl Baseline {
    /// Returns the delta against the stored sample and keeps `current` as the new baseline.
    pub fn advance(&mut self, current: u64) -> u64 {
        let delta = counter_delta(current, self.previous);
        self.previous = current;
        delta
    }

    pub fn reset(&mut self) {
        self.previous = 0;
    }
}
