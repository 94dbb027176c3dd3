//! Memory allocation tracking and validation.
//!
//! The map records every successful allocation for the whole run; nothing is
//! ever removed. A region stops constraining new requests once its owner
//! reaches EXIT, but the record stays behind for audit.

use crate::config::Config;
use crate::core::process::{ProcessId, ProcessState, ProcessTable};

/// One accepted allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryRegion {
    /// Inclusive lower bound.
    pub lower: i64,
    /// Exclusive upper bound.
    pub upper: i64,
    /// Process that made the allocation.
    pub owner: ProcessId,
}

/// Append-only collection of accepted allocations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryMap {
    regions: Vec<MemoryRegion>,
}

impl MemoryMap {
    /// Accepted regions in allocation order, exited owners included.
    pub fn regions(&self) -> &[MemoryRegion] {
        &self.regions
    }

    /// Validates and records an allocation request over `[lower, upper)`.
    ///
    /// Returns `true` when the request segfaults: bounds outside the
    /// configured memory, or any overlap with a region whose owner is still
    /// live. Overlap is anything that is neither entirely above nor entirely
    /// below the existing region. On success the region is appended.
    pub fn allocate(
        &mut self,
        lower: i64,
        upper: i64,
        owner: ProcessId,
        table: &ProcessTable,
        config: &Config,
    ) -> bool {
        if upper > config.memory_kb || lower < 0 {
            return true;
        }

        for region in &self.regions {
            let entirely_above = upper > region.upper && lower > region.upper;
            let entirely_below = upper < region.lower && lower < region.lower;
            if !(entirely_above || entirely_below) && is_live(table, region.owner) {
                return true;
            }
        }

        self.regions.push(MemoryRegion {
            lower,
            upper,
            owner,
        });
        false
    }

    /// Validates an access request over `[lower, upper)` by process `pid`.
    ///
    /// Returns `true` when the request segfaults. The request stands faulted
    /// unless some live region owned by `pid` fully contains it.
    pub fn access(
        &self,
        lower: i64,
        upper: i64,
        pid: ProcessId,
        table: &ProcessTable,
        config: &Config,
    ) -> bool {
        if lower < 0 || upper > config.memory_kb {
            return true;
        }

        for region in &self.regions {
            if upper <= region.upper
                && lower >= region.lower
                && region.owner == pid
                && is_live(table, region.owner)
            {
                return false;
            }
        }
        true
    }
}

/// A region constrains requests only while its owner has not exited.
fn is_live(table: &ProcessTable, owner: ProcessId) -> bool {
    table
        .get(owner)
        .is_some_and(|pcb| pcb.state != ProcessState::Exit)
}
