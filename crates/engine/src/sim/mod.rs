//! Simulation runner and real-time pacing.

/// Wall-clock pacing of advanced time steps.
pub mod pacing;
/// The run loop composing scheduler, execution engine, and interrupt handler.
pub mod runner;

pub use pacing::{NoPacing, Pacer, ThreadPacer};
pub use runner::Simulation;
