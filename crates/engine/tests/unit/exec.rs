//! Execution-engine tests: minimum-step time advance, quantum expiry,
//! device blocking, and idling.

use pretty_assertions::assert_eq;

use schedsim_core::config::SchedulingPolicy;
use schedsim_core::core::exec::{cpu_idle, cpu_run, find_min};
use schedsim_core::core::interrupt::Interrupt;
use schedsim_core::core::process::{ProcessState, ProcessTable};
use schedsim_core::program::Program;
use schedsim_core::sim::pacing::NoPacing;
use schedsim_core::trace::{TraceEvent, VecSink};

use crate::common::{config, cpu, dev_in, mem_allocate, program_of};

#[test]
fn test_find_min_is_arithmetic() {
    assert_eq!(find_min(30, 40, 50), 30);
    assert_eq!(find_min(50, 40, 30), 30);
    assert_eq!(find_min(40, 30, 50), 30);
}

#[test]
fn test_find_min_treats_zero_as_minimum() {
    // A zero-duration candidate is a legal zero-length step, not an absent one.
    assert_eq!(find_min(0, 5, 3), 0);
    assert_eq!(find_min(5, 0, 3), 0);
    assert_eq!(find_min(5, 3, 0), 0);
}

/// Dispatches pid 0 of the given program: primes its first operation and
/// marks it RUNNING, the way selection leaves it.
fn dispatch(program: &Program, policy: SchedulingPolicy) -> ProcessTable {
    let cfg = config(policy);
    let mut table = ProcessTable::from_program(program, &cfg);
    for pcb in table.iter_mut() {
        pcb.state = ProcessState::Ready;
        pcb.advance_op(program, &cfg).unwrap();
    }
    table.get_mut(0).unwrap().state = ProcessState::Running;
    table
}

#[test]
fn test_quantum_expiry_advances_clock_by_quantum() {
    // One CPU burst of 40 ms against a 30 ms quantum and no blocked work.
    let program = program_of(vec![vec![cpu(4)]]);
    let cfg = config(SchedulingPolicy::RrP);
    let mut table = dispatch(&program, SchedulingPolicy::RrP);
    let mut sink = VecSink::default();

    let interrupt = cpu_run(&mut table, 0, &program, &cfg, &mut NoPacing, &mut sink).unwrap();

    assert_eq!(interrupt, Interrupt::QuantumExpired);
    assert_eq!(table.clock_ms(), 30);
    assert_eq!(table.get(0).unwrap().op_ms_left, 10);
    assert_eq!(sink.events, vec![TraceEvent::CpuOpStart { pid: 0 }]);
}

#[test]
fn test_short_burst_completes_and_advances() {
    // One CPU burst of 20 ms against a 30 ms quantum: the operation wins.
    let program = program_of(vec![vec![cpu(2)]]);
    let cfg = config(SchedulingPolicy::RrP);
    let mut table = dispatch(&program, SchedulingPolicy::RrP);
    let mut sink = VecSink::default();

    let interrupt = cpu_run(&mut table, 0, &program, &cfg, &mut NoPacing, &mut sink).unwrap();

    // The burst finished and the cursor moved to the program-end marker,
    // which the run loop resolves through the completion sweep.
    assert_eq!(interrupt, Interrupt::None);
    assert_eq!(table.clock_ms(), 20);
    let pcb = table.get(0).unwrap();
    assert_eq!(pcb.cursor, 2);
    assert_eq!(pcb.ms_left, 0);
    assert_eq!(
        sink.events,
        vec![
            TraceEvent::CpuOpStart { pid: 0 },
            TraceEvent::CpuOpFinish { pid: 0 },
        ]
    );
}

#[test]
fn test_device_burst_blocks_immediately() {
    let program = program_of(vec![vec![dev_in("hard drive", 2), cpu(1)]]);
    let cfg = config(SchedulingPolicy::RrP);
    let mut table = dispatch(&program, SchedulingPolicy::RrP);
    let mut sink = VecSink::default();

    let interrupt = cpu_run(&mut table, 0, &program, &cfg, &mut NoPacing, &mut sink).unwrap();

    assert_eq!(interrupt, Interrupt::IoBlockStarted);
    assert_eq!(table.get(0).unwrap().state, ProcessState::Blocked);
    assert_eq!(table.clock_ms(), 0, "blocking consumes no simulated time");
    assert!(matches!(
        sink.events.as_slice(),
        [TraceEvent::DeviceOpStart { pid: 0, .. }]
    ));
}

#[test]
fn test_memory_request_returns_to_run_loop() {
    let program = program_of(vec![vec![mem_allocate(0, 100)]]);
    let cfg = config(SchedulingPolicy::RrP);
    let mut table = dispatch(&program, SchedulingPolicy::RrP);
    let mut sink = VecSink::default();

    let interrupt = cpu_run(&mut table, 0, &program, &cfg, &mut NoPacing, &mut sink).unwrap();

    assert_eq!(interrupt, Interrupt::None);
    assert_eq!(table.clock_ms(), 0);
    assert!(sink.events.is_empty());
}

#[test]
fn test_io_floor_win_runs_completion_sweep_and_continues() {
    // pid 0 runs a 25 ms CPU burst; pid 1 is blocked with 20 ms of device
    // work left. The first step is bounded by the I/O floor.
    let program = program_of(vec![vec![cpu(25)], vec![dev_in("usb", 1), cpu(1)]]);
    let mut cfg = config(SchedulingPolicy::RrP);
    cfg.cpu_cycle_ms = 1;
    cfg.quantum_cycles = 30;
    let mut table = ProcessTable::from_program(&program, &cfg);
    for pcb in table.iter_mut() {
        pcb.state = ProcessState::Ready;
        pcb.advance_op(&program, &cfg).unwrap();
    }
    table.get_mut(0).unwrap().state = ProcessState::Running;
    table.get_mut(1).unwrap().state = ProcessState::Blocked;

    let mut sink = VecSink::default();
    let interrupt = cpu_run(&mut table, 0, &program, &cfg, &mut NoPacing, &mut sink).unwrap();

    // Step one: 20 ms (I/O floor) charged to both, pid 1 unblocked and
    // advanced, pid 0 demoted to READY by the sweep. Step two: the 5 ms
    // remainder finishes the burst.
    assert_eq!(interrupt, Interrupt::None);
    assert_eq!(table.clock_ms(), 25);

    let unblocked = table.get(1).unwrap();
    assert_eq!(unblocked.state, ProcessState::Ready);
    assert_eq!(unblocked.cursor, 5, "device burst advanced to the next op");

    let demoted = table.get(0).unwrap();
    assert_eq!(demoted.state, ProcessState::Ready);

    assert!(sink.events.contains(&TraceEvent::BlockedToReady { pid: 1 }));
    assert!(
        sink.events
            .iter()
            .any(|event| matches!(event, TraceEvent::DeviceInterrupt { pid: 1, .. }))
    );
}

#[test]
fn test_cpu_idle_advances_to_io_floor() {
    let program = program_of(vec![vec![dev_in("hard drive", 2)], vec![dev_in("usb", 5)]]);
    let cfg = config(SchedulingPolicy::RrP);
    let mut table = ProcessTable::from_program(&program, &cfg);
    for pcb in table.iter_mut() {
        // advance_op leaves BLOCKED records blocked.
        pcb.state = ProcessState::Blocked;
        pcb.advance_op(&program, &cfg).unwrap();
    }

    let mut sink = VecSink::default();
    let interrupt = cpu_idle(&mut table, &mut NoPacing, &mut sink);

    assert_eq!(interrupt, Interrupt::OutOfCycles);
    assert_eq!(table.clock_ms(), 40);
    assert_eq!(table.get(0).unwrap().op_ms_left, 0);
    assert_eq!(table.get(1).unwrap().op_ms_left, 60);
    assert_eq!(sink.events, vec![TraceEvent::IdleStart, TraceEvent::IdleFinish]);
}

#[test]
fn test_cpu_idle_with_nothing_blocked_is_a_no_op() {
    let program = program_of(vec![vec![cpu(1)]]);
    let cfg = config(SchedulingPolicy::RrP);
    let mut table = ProcessTable::from_program(&program, &cfg);

    let interrupt = cpu_idle(&mut table, &mut NoPacing, &mut VecSink::default());
    assert_eq!(interrupt, Interrupt::OutOfCycles);
    assert_eq!(table.clock_ms(), 0);
}
