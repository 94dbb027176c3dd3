//! Memory-map tests: bounds, overlap, liveness-based release, and access
//! containment.

use pretty_assertions::assert_eq;
use proptest::prelude::*;

use schedsim_core::config::SchedulingPolicy;
use schedsim_core::core::process::{ProcessState, ProcessTable};
use schedsim_core::mem::MemoryMap;

use crate::common::{config, cpu, program_of};

/// Three READY processes (pids 0, 1, 2) and the standard configuration
/// (11 100 KB of memory).
fn fixture() -> (ProcessTable, MemoryMap) {
    let program = program_of(vec![vec![cpu(1)], vec![cpu(1)], vec![cpu(1)]]);
    let mut table = ProcessTable::from_program(&program, &config(SchedulingPolicy::RrP));
    for pcb in table.iter_mut() {
        pcb.state = ProcessState::Ready;
    }
    (table, MemoryMap::default())
}

#[test]
fn test_allocate_rejects_out_of_bounds() {
    let (table, mut map) = fixture();
    let cfg = config(SchedulingPolicy::RrP);

    assert!(map.allocate(0, 11_101, 0, &table, &cfg), "beyond memory size");
    assert!(map.allocate(-1, 50, 0, &table, &cfg), "negative lower bound");
    assert_eq!(map.regions().len(), 0, "rejected requests leave no region");
}

#[test]
fn test_allocate_conflicts_with_live_region_until_owner_exits() {
    let (mut table, mut map) = fixture();
    let cfg = config(SchedulingPolicy::RrP);

    assert!(!map.allocate(0, 100, 1, &table, &cfg), "first claim succeeds");
    assert!(
        map.allocate(50, 150, 2, &table, &cfg),
        "overlap with a live region faults"
    );
    assert_eq!(map.regions().len(), 1);

    table.get_mut(1).unwrap().state = ProcessState::Exit;
    assert!(
        !map.allocate(50, 150, 2, &table, &cfg),
        "the exited owner's region no longer constrains"
    );
    assert_eq!(map.regions().len(), 2, "released regions are kept for audit");
}

#[test]
fn test_allocate_disjoint_regions_coexist() {
    let (table, mut map) = fixture();
    let cfg = config(SchedulingPolicy::RrP);

    assert!(!map.allocate(0, 100, 0, &table, &cfg));
    assert!(!map.allocate(200, 300, 1, &table, &cfg));
    assert!(!map.allocate(500, 600, 2, &table, &cfg));
    assert_eq!(map.regions().len(), 3);
}

#[test]
fn test_allocate_touching_bounds_still_conflicts() {
    // A claim starting exactly at another's upper bound is not entirely
    // above it, so it faults.
    let (table, mut map) = fixture();
    let cfg = config(SchedulingPolicy::RrP);

    assert!(!map.allocate(0, 100, 0, &table, &cfg));
    assert!(map.allocate(100, 200, 1, &table, &cfg));
}

#[test]
fn test_access_requires_containing_owned_region() {
    let (table, mut map) = fixture();
    let cfg = config(SchedulingPolicy::RrP);
    assert!(!map.allocate(0, 100, 1, &table, &cfg));

    assert!(!map.access(10, 90, 1, &table, &cfg), "contained access succeeds");
    assert!(!map.access(0, 100, 1, &table, &cfg), "exact bounds succeed");
    assert!(map.access(10, 90, 2, &table, &cfg), "wrong owner faults");
    assert!(map.access(10, 200, 1, &table, &cfg), "exceeding the region faults");
}

#[test]
fn test_access_rejects_out_of_bounds() {
    let (table, map) = fixture();
    let cfg = config(SchedulingPolicy::RrP);
    assert!(map.access(-5, 10, 0, &table, &cfg));
    assert!(map.access(0, 999_999, 0, &table, &cfg));
}

#[test]
fn test_access_to_exited_owners_region_faults() {
    let (mut table, mut map) = fixture();
    let cfg = config(SchedulingPolicy::RrP);
    assert!(!map.allocate(0, 100, 1, &table, &cfg));

    table.get_mut(1).unwrap().state = ProcessState::Exit;
    assert!(map.access(10, 90, 1, &table, &cfg));
}

proptest! {
    /// After any sequence of allocation attempts by live processes, no two
    /// recorded regions overlap.
    #[test]
    fn prop_live_regions_never_overlap(
        requests in proptest::collection::vec((0i64..2000, 1i64..400), 1..40)
    ) {
        let (table, mut map) = fixture();
        let cfg = config(SchedulingPolicy::RrP);

        for (index, (lower, len)) in requests.iter().enumerate() {
            let owner = (index % 3) as u32;
            let _ = map.allocate(*lower, lower + len, owner, &table, &cfg);
        }

        let regions = map.regions();
        for (i, a) in regions.iter().enumerate() {
            for b in &regions[i + 1..] {
                let above = b.upper > a.upper && b.lower > a.upper;
                let below = b.upper < a.lower && b.lower < a.lower;
                prop_assert!(
                    above || below,
                    "regions [{}, {}) and [{}, {}) overlap",
                    a.lower, a.upper, b.lower, b.upper
                );
            }
        }
    }
}
