//! Controlled-interference benchmark for pinned, real-time compute threads.
//!
//! A measured thread spins on one core while a disturbance thread is switched
//! on and off on another; the per-second change of each thread's iteration
//! counter shows how much the two interfere.

pub mod cli;
pub mod experiment;
pub mod threading;
pub mod utils;
pub mod workload;
