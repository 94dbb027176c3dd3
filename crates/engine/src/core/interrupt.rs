//! Interrupt events and the transition function applied after every
//! execution-engine or scheduler outcome.

use crate::config::Config;
use crate::core::process::{ProcessId, ProcessState, ProcessTable};
use crate::error::SimError;
use crate::program::{Operation, Program};
use crate::trace::{EventSink, TraceEvent};

/// Event that ended the current step of the run loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interrupt {
    /// The running process used up its quantum.
    QuantumExpired,
    /// The running process reached a device burst and blocked.
    IoBlockStarted,
    /// An idle period ended; re-evaluate the table.
    OutOfCycles,
    /// A memory request faulted; the requesting process must exit.
    SegmentationFault,
    /// A memory request succeeded; advance the requesting process.
    MemOpSucceeded,
    /// Nothing to handle.
    None,
}

/// Applies one interrupt to the table, then runs the completion sweep that
/// promotes processes sitting on their program-end marker to EXIT.
pub fn handle_interrupt(
    table: &mut ProcessTable,
    interrupt: Interrupt,
    selected: Option<ProcessId>,
    program: &Program,
    config: &Config,
    sink: &mut dyn EventSink,
) -> Result<(), SimError> {
    match interrupt {
        Interrupt::QuantumExpired => {
            let pid = dispatched(selected)?;
            sink.record(TraceEvent::QuantumExpired { pid });
            if let Some(pcb) = table.get_mut(pid) {
                pcb.state = ProcessState::Ready;
            }
            io_completion_sweep(table, program, config, sink)?;
        }
        Interrupt::IoBlockStarted => {
            let pid = dispatched(selected)?;
            if let Some((_, direction)) = current_device(table, program, pid) {
                sink.record(TraceEvent::BlockedForDevice { pid, direction });
            }
            sink.record(TraceEvent::RunningToBlocked { pid });
        }
        Interrupt::OutOfCycles => {
            io_completion_sweep(table, program, config, sink)?;
        }
        Interrupt::SegmentationFault => {
            let pid = dispatched(selected)?;
            if let Some(pcb) = table.get(pid)
                && let Some((action, _, _)) =
                    program.op(pcb.cursor).and_then(Operation::mem_request)
            {
                sink.record(TraceEvent::MemFault { pid, action });
            }
            if let Some(pcb) = table.get_mut(pid) {
                pcb.state = ProcessState::Exit;
            }
            sink.record(TraceEvent::ProcessExit { pid });
        }
        Interrupt::MemOpSucceeded => {
            let pid = dispatched(selected)?;
            if let Some(pcb) = table.get(pid)
                && let Some((action, _, _)) =
                    program.op(pcb.cursor).and_then(Operation::mem_request)
            {
                sink.record(TraceEvent::MemSuccess { action });
            }
            if let Some(pcb) = table.get_mut(pid) {
                pcb.advance_op(program, config)?;
            }
        }
        Interrupt::None => {}
    }

    completion_sweep(table, program, sink);
    Ok(())
}

/// Reverts any RUNNING record to READY, then advances every BLOCKED record
/// whose device burst has reached exactly zero remaining milliseconds and
/// makes it READY again.
pub fn io_completion_sweep(
    table: &mut ProcessTable,
    program: &Program,
    config: &Config,
    sink: &mut dyn EventSink,
) -> Result<(), SimError> {
    for pid in 0..table.len() as ProcessId {
        let Some(pcb) = table.get(pid) else { continue };

        if pcb.state == ProcessState::Running {
            if let Some(pcb) = table.get_mut(pid) {
                pcb.state = ProcessState::Ready;
            }
            continue;
        }

        if pcb.state == ProcessState::Blocked && pcb.op_ms_left == 0 {
            if let Some((device, direction)) = current_device(table, program, pid) {
                sink.record(TraceEvent::DeviceInterrupt {
                    pid,
                    device,
                    direction,
                });
            }
            sink.record(TraceEvent::BlockedToReady { pid });
            if let Some(pcb) = table.get_mut(pid) {
                pcb.advance_op(program, config)?;
                pcb.state = ProcessState::Ready;
            }
        }
    }
    Ok(())
}

/// Promotes every non-EXIT record whose cursor sits on its program-end
/// marker to the terminal state.
pub fn completion_sweep(table: &mut ProcessTable, program: &Program, sink: &mut dyn EventSink) {
    for pid in 0..table.len() as ProcessId {
        let finished = table.get(pid).is_some_and(|pcb| {
            pcb.state != ProcessState::Exit
                && program.op(pcb.cursor).is_some_and(Operation::is_program_end)
        });
        if finished {
            sink.record(TraceEvent::ProcessExit { pid });
            if let Some(pcb) = table.get_mut(pid) {
                pcb.state = ProcessState::Exit;
            }
        }
    }
}

/// Device name and direction of a process's current operation, if it is a
/// device burst.
fn current_device(
    table: &ProcessTable,
    program: &Program,
    pid: ProcessId,
) -> Option<(String, crate::program::Direction)> {
    let pcb = table.get(pid)?;
    match program.op(pcb.cursor)? {
        Operation::Device {
            name, direction, ..
        } => Some((name.clone(), *direction)),
        _ => None,
    }
}

/// Unwraps the dispatched process an interrupt refers to.
fn dispatched(selected: Option<ProcessId>) -> Result<ProcessId, SimError> {
    selected.ok_or(SimError::DispatchInvariant(
        "interrupt delivered without a dispatched process",
    ))
}
