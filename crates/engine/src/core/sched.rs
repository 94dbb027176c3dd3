//! Dispatch policies: selecting the next process to run.

use tracing::debug;

use crate::config::SchedulingPolicy;
use crate::core::process::{Pcb, ProcessId, ProcessState, ProcessTable};
use crate::trace::{EventSink, TraceEvent};

/// Scans the table once and returns the chosen process, or `None` when no
/// record is READY.
///
/// Ranking per policy, with ties always broken by the first record found in
/// table order (lowest pid):
///
/// | Policy | Rule |
/// |---|---|
/// | FCFS (both variants) | first READY record |
/// | SJF-N / SRTF-P | READY record with strictly smallest total remainder |
/// | RR-P | READY record with strictly largest wait time |
///
/// When a process is found, the wait-time rule is applied (everyone else
/// non-EXIT gains a tick, the chosen record resets to zero), the record is
/// marked RUNNING unless it is BLOCKED, and `previous` is updated. A
/// selection differing from the previous dispatch additionally emits the
/// selection and dispatch events before the state change.
pub fn select_pcb(
    table: &mut ProcessTable,
    policy: SchedulingPolicy,
    previous: &mut Option<ProcessId>,
    sink: &mut dyn EventSink,
) -> Option<ProcessId> {
    let ready = |pcb: &&Pcb| pcb.state == ProcessState::Ready;

    let chosen = match policy {
        SchedulingPolicy::FcfsN | SchedulingPolicy::FcfsP => {
            table.iter().find(|pcb| pcb.state == ProcessState::Ready)
        }
        SchedulingPolicy::SjfN | SchedulingPolicy::SrtfP => {
            let mut best: Option<&Pcb> = None;
            for pcb in table.iter().filter(ready) {
                if best.is_none_or(|current| pcb.ms_left < current.ms_left) {
                    best = Some(pcb);
                }
            }
            best
        }
        SchedulingPolicy::RrP => {
            let mut best: Option<&Pcb> = None;
            for pcb in table.iter().filter(ready) {
                if best.is_none_or(|current| pcb.wait_time > current.wait_time) {
                    best = Some(pcb);
                }
            }
            best
        }
    }
    .map(|pcb| (pcb.pid, pcb.ms_left));

    let (pid, ms_left) = chosen?;

    if *previous != Some(pid) {
        sink.record(TraceEvent::Selected { pid, ms_left });
        sink.record(TraceEvent::ReadyToRunning { pid });
    }
    debug!(policy = policy.code(), pid, ms_left, "dispatch");

    table.bump_wait_times();
    if let Some(pcb) = table.get_mut(pid) {
        pcb.wait_time = 0;
        // Never force a blocked record onto the CPU; the idle path relies on it.
        if pcb.state != ProcessState::Blocked {
            pcb.state = ProcessState::Running;
        }
    }
    *previous = Some(pid);

    Some(pid)
}
