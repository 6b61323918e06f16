//! Disturbance on/off schedule.
//!
//! Rounds are grouped in blocks of `switch_period`. Even blocks run the measured
//! thread alone, odd blocks add the disturbance thread. The phase can only change
//! on a block boundary, and the disturbance is always stopped once the run ends.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    MeasuredOnly,
    MeasuredPlusDisturb,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    StartDisturb,
    StopDisturb,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schedule {
    switch_period: usize,
    rounds: usize,
}

impl Schedule {
    pub fn new(switch_period: usize, rounds: usize) -> Self {
        Self {
            switch_period: switch_period.max(1),
            rounds,
        }
    }

    pub fn rounds(&self) -> usize {
        self.rounds
    }

    pub fn switch_period(&self) -> usize {
        self.switch_period
    }

    /// Phase a round is measured in.
    pub fn phase_of(&self, round: usize) -> Phase {
        if (round / self.switch_period) % 2 == 1 {
            Phase::MeasuredPlusDisturb
        } else {
            Phase::MeasuredOnly
        }
    }

    /// Action to take at the start of `round` when the run is currently in `current`.
    /// `round == rounds` is the teardown point and always ends in `MeasuredOnly`.
    pub fn transition_at(&self, round: usize, current: Phase) -> Option<Transition> {
        let target = if round >= self.rounds {
            Phase::MeasuredOnly
        } else if round % self.switch_period == 0 {
            self.phase_of(round)
        } else {
            current
        };

        match (current, target) {
            (Phase::MeasuredOnly, Phase::MeasuredPlusDisturb) => Some(Transition::StartDisturb),
            (Phase::MeasuredPlusDisturb, Phase::MeasuredOnly) => Some(Transition::StopDisturb),
            _ => None,
        }
    }

    /// Every toggle of a whole run, teardown included, as `(round, transition)`.
    pub fn transitions(&self) -> Vec<(usize, Transition)> {
        let mut phase = Phase::MeasuredOnly;
        let mut out = Vec::new();

        for round in 0..=self.rounds {
            if let Some(t) = self.transition_at(round, phase) {
                phase = match t {
                    Transition::StartDisturb => Phase::MeasuredPlusDisturb,
                    Transition::StopDisturb => Phase::MeasuredOnly,
                };
                out.push((round, t));
            }
        }
        out
    }
}
