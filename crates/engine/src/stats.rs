//! Run statistics collection.
//!
//! Aggregate counters accumulated by the run loop and returned when the
//! simulation completes. These are bookkeeping for summaries, not part of
//! the trace.

use std::fmt;

/// Aggregate counters for one completed run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Processes created from the instruction stream.
    pub processes: u64,
    /// Scheduler selections that yielded a process.
    pub dispatches: u64,
    /// Preemptions caused by quantum expiry.
    pub quantum_expirations: u64,
    /// Transitions into the BLOCKED state for a device burst.
    pub device_blocks: u64,
    /// Memory requests validated (allocations and accesses).
    pub mem_ops: u64,
    /// Memory requests that segfaulted.
    pub seg_faults: u64,
    /// Idle periods with every live process blocked.
    pub idle_periods: u64,
    /// Final value of the global simulated clock.
    pub simulated_ms: i64,
}

impl fmt::Display for RunStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "processes:           {}", self.processes)?;
        writeln!(f, "dispatches:          {}", self.dispatches)?;
        writeln!(f, "quantum expirations: {}", self.quantum_expirations)?;
        writeln!(f, "device blocks:       {}", self.device_blocks)?;
        writeln!(f, "memory requests:     {}", self.mem_ops)?;
        writeln!(f, "segmentation faults: {}", self.seg_faults)?;
        writeln!(f, "idle periods:        {}", self.idle_periods)?;
        write!(f, "simulated time:      {} ms", self.simulated_ms)
    }
}
