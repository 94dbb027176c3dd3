//! Dispatch policy tests: ranking rules, tie-breaks, and the wait-time rule.

use pretty_assertions::assert_eq;
use rstest::rstest;

use schedsim_core::config::SchedulingPolicy;
use schedsim_core::core::process::{ProcessState, ProcessTable};
use schedsim_core::core::sched::select_pcb;
use schedsim_core::trace::{NullSink, TraceEvent, VecSink};

use crate::common::{config, cpu, program_of};

/// Three READY processes with distinct totals and wait times.
fn ready_table() -> ProcessTable {
    let program = program_of(vec![vec![cpu(5)], vec![cpu(1)], vec![cpu(3)]]);
    let mut table = ProcessTable::from_program(&program, &config(SchedulingPolicy::RrP));
    for pcb in table.iter_mut() {
        pcb.state = ProcessState::Ready;
    }
    table.get_mut(0).unwrap().wait_time = 3;
    table.get_mut(1).unwrap().wait_time = 7;
    table.get_mut(2).unwrap().wait_time = 5;
    table
}

#[rstest]
#[case::non_preemptive(SchedulingPolicy::FcfsN)]
#[case::preemptive(SchedulingPolicy::FcfsP)]
fn test_fcfs_returns_first_ready_regardless_of_ranking(#[case] policy: SchedulingPolicy) {
    // pid 1 has both the smallest total and the largest wait time; FCFS must
    // still take pid 0.
    let mut table = ready_table();
    let selected = select_pcb(&mut table, policy, &mut None, &mut NullSink);
    assert_eq!(selected, Some(0));
}

#[test]
fn test_fcfs_skips_non_ready_records() {
    let mut table = ready_table();
    table.get_mut(0).unwrap().state = ProcessState::Blocked;
    let selected = select_pcb(&mut table, SchedulingPolicy::FcfsP, &mut None, &mut NullSink);
    assert_eq!(selected, Some(1));
}

#[rstest]
#[case::non_preemptive(SchedulingPolicy::SjfN)]
#[case::preemptive(SchedulingPolicy::SrtfP)]
fn test_shortest_remaining_wins(#[case] policy: SchedulingPolicy) {
    let mut table = ready_table();
    table.get_mut(0).unwrap().ms_left = 50;
    table.get_mut(1).unwrap().ms_left = 10;
    table.get_mut(2).unwrap().ms_left = 30;
    let selected = select_pcb(&mut table, policy, &mut None, &mut NullSink);
    assert_eq!(selected, Some(1));
}

#[test]
fn test_shortest_remaining_tie_takes_table_order() {
    let mut table = ready_table();
    table.get_mut(0).unwrap().ms_left = 50;
    table.get_mut(1).unwrap().ms_left = 50;
    table.get_mut(2).unwrap().ms_left = 50;
    let selected = select_pcb(&mut table, SchedulingPolicy::SrtfP, &mut None, &mut NullSink);
    assert_eq!(selected, Some(0));
}

#[test]
fn test_round_robin_takes_largest_wait_time() {
    let mut table = ready_table();
    let selected = select_pcb(&mut table, SchedulingPolicy::RrP, &mut None, &mut NullSink);
    assert_eq!(selected, Some(1));
}

#[test]
fn test_round_robin_tie_takes_table_order() {
    let mut table = ready_table();
    for pcb in table.iter_mut() {
        pcb.wait_time = 4;
    }
    let selected = select_pcb(&mut table, SchedulingPolicy::RrP, &mut None, &mut NullSink);
    assert_eq!(selected, Some(0));
}

#[rstest]
#[case(SchedulingPolicy::FcfsN)]
#[case(SchedulingPolicy::SjfN)]
#[case(SchedulingPolicy::FcfsP)]
#[case(SchedulingPolicy::SrtfP)]
#[case(SchedulingPolicy::RrP)]
fn test_wait_time_rule_after_selection(#[case] policy: SchedulingPolicy) {
    let mut table = ready_table();
    table.get_mut(2).unwrap().state = ProcessState::Exit;
    let before: Vec<i64> = table.iter().map(|pcb| pcb.wait_time).collect();

    let selected = select_pcb(&mut table, policy, &mut None, &mut NullSink).unwrap();

    for pcb in table.iter() {
        if pcb.pid == selected {
            assert_eq!(pcb.wait_time, 0, "selected process resets");
        } else if pcb.state == ProcessState::Exit {
            assert_eq!(pcb.wait_time, 0, "exited processes stay pinned");
        } else {
            assert_eq!(
                pcb.wait_time,
                before[pcb.pid as usize] + 1,
                "unselected process gains one tick"
            );
        }
    }
}

#[test]
fn test_selection_marks_running() {
    let mut table = ready_table();
    let selected = select_pcb(&mut table, SchedulingPolicy::RrP, &mut None, &mut NullSink).unwrap();
    assert_eq!(table.get(selected).unwrap().state, ProcessState::Running);
}

#[test]
fn test_no_ready_process_selects_nothing_and_mutates_nothing() {
    let mut table = ready_table();
    for pcb in table.iter_mut() {
        pcb.state = ProcessState::Blocked;
    }
    let before = table.clone();
    let selected = select_pcb(&mut table, SchedulingPolicy::RrP, &mut None, &mut NullSink);
    assert_eq!(selected, None);
    assert_eq!(table, before);
}

#[test]
fn test_new_dispatch_emits_selection_events() {
    let mut table = ready_table();
    let mut previous = None;
    let mut sink = VecSink::default();

    let selected = select_pcb(&mut table, SchedulingPolicy::FcfsP, &mut previous, &mut sink);
    assert_eq!(selected, Some(0));
    assert_eq!(previous, Some(0));
    let ms_left = table.get(0).unwrap().ms_left;
    assert_eq!(
        sink.events,
        vec![
            TraceEvent::Selected { pid: 0, ms_left },
            TraceEvent::ReadyToRunning { pid: 0 },
        ]
    );
}

#[test]
fn test_repeat_dispatch_is_silent() {
    let mut table = ready_table();
    let mut previous = Some(0);
    let mut sink = VecSink::default();

    let selected = select_pcb(&mut table, SchedulingPolicy::FcfsP, &mut previous, &mut sink);
    assert_eq!(selected, Some(0));
    assert!(sink.events.is_empty());
}
