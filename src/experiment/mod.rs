//! Interference experiment: configuration, toggle schedule and the timed driver.

pub mod config;
pub mod driver;
pub mod schedule;

pub use config::{ExperimentConfig, ThreadSpec};
pub use driver::{run_experiment, Experiment, ExperimentReport};
pub use schedule::{Phase, Schedule, Transition};
