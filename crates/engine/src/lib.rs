//! Operating-system process scheduling simulator.
//!
//! This crate replays a fixed program of simulated CPU, device, and memory
//! operations under a chosen dispatch policy, producing an ordered stream of
//! lifecycle events. It provides:
//! 1. **Process lifecycle:** NEW/READY/RUNNING/BLOCKED/EXIT records in an
//!    owned, index-stable table.
//! 2. **Dispatch policies:** FCFS and SJF (non-preemptive); FCFS, SRTF, and
//!    round-robin (preemptive).
//! 3. **Execution engine:** discrete-event time advance co-simulating the
//!    running CPU burst with all blocked device bursts.
//! 4. **Interrupts:** quantum expiry, device block/completion, and simulated
//!    segmentation faults.
//! 5. **Memory:** overlap-validated allocation with liveness-based release.

/// Simulator configuration (policies, cycle rates, memory size).
pub mod config;
/// Scheduling core (process table, policies, execution engine, interrupts).
pub mod core;
/// Fatal invariant-breach errors.
pub mod error;
/// Memory allocation tracking and validation.
pub mod mem;
/// The instruction stream and its operations.
pub mod program;
/// Run loop and pacing.
pub mod sim;
/// Aggregate run counters.
pub mod stats;
/// Abstract trace events and sinks.
pub mod trace;

/// Root configuration type; use `Config::default()` or deserialize from JSON.
pub use crate::config::Config;
/// Fatal engine error type.
pub use crate::error::SimError;
/// The instruction stream consumed by a run.
pub use crate::program::Program;
/// Simulation context; construct with `Simulation::new` and call `run`.
pub use crate::sim::runner::Simulation;
