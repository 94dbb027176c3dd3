//! Execution engine: discrete-event time advance.
//!
//! Instead of stepping one simulated millisecond at a time, the engine
//! computes the minimum of all competing durations (quantum, I/O floor,
//! current-operation remainder), advances the global clock by that amount in
//! one step, and resolves whichever event hit zero.

use tracing::trace;

use crate::config::Config;
use crate::core::interrupt::{Interrupt, io_completion_sweep};
use crate::core::process::{ProcessId, ProcessState, ProcessTable};
use crate::error::SimError;
use crate::program::{Operation, Program};
use crate::sim::pacing::Pacer;
use crate::trace::{EventSink, TraceEvent};

/// Arithmetic minimum of three durations.
///
/// A zero argument is a legal zero-length step, not an absent candidate.
pub fn find_min(first: i64, second: i64, third: i64) -> i64 {
    first.min(second).min(third)
}

/// Runs the selected process until an interrupt-worthy event fires.
///
/// CPU bursts advance in `min(quantum, io_floor, op_left)` steps, with the
/// elapsed time charged to every RUNNING and BLOCKED record so device bursts
/// progress concurrently. On the advanced step:
///
/// - the I/O floor winning runs the completion sweep and keeps executing
///   (more CPU time may remain in the quantum),
/// - the quantum winning returns [`Interrupt::QuantumExpired`],
/// - the operation finishing advances the process and keeps executing.
///
/// Reaching a device burst blocks the process and returns
/// [`Interrupt::IoBlockStarted`]; reaching a memory request or a program
/// boundary returns [`Interrupt::None`] for the run loop to resolve.
pub fn cpu_run(
    table: &mut ProcessTable,
    selected: ProcessId,
    program: &Program,
    config: &Config,
    pacer: &mut dyn Pacer,
    sink: &mut dyn EventSink,
) -> Result<Interrupt, SimError> {
    loop {
        let (cursor, op_ms_left) = {
            let pcb = table
                .get(selected)
                .ok_or(SimError::DispatchInvariant("selected process not in table"))?;
            (pcb.cursor, pcb.op_ms_left)
        };
        let op = program.op(cursor).ok_or(SimError::CursorOutOfRange {
            pid: selected,
            cursor,
        })?;

        match op {
            Operation::Mem { .. } | Operation::ProgramStart | Operation::ProgramEnd => {
                return Ok(Interrupt::None);
            }
            Operation::Device {
                name, direction, ..
            } => {
                sink.record(TraceEvent::DeviceOpStart {
                    pid: selected,
                    device: name.clone(),
                    direction: *direction,
                });
                if let Some(pcb) = table.get_mut(selected) {
                    pcb.state = ProcessState::Blocked;
                }
                return Ok(Interrupt::IoBlockStarted);
            }
            Operation::Cpu { .. } => {
                let quantum_ms = config.quantum_ms();
                let io_floor = table.min_blocked_op_ms();
                let step = find_min(io_floor.unwrap_or(i64::MAX), quantum_ms, op_ms_left);
                trace!(pid = selected, step, quantum_ms, ?io_floor, "time advance");

                sink.record(TraceEvent::CpuOpStart { pid: selected });
                table.advance_clock(step);
                pacer.pace(step);

                if io_floor == Some(step) {
                    io_completion_sweep(table, program, config, sink)?;
                } else if step == quantum_ms {
                    return Ok(Interrupt::QuantumExpired);
                } else {
                    sink.record(TraceEvent::CpuOpFinish { pid: selected });
                    if let Some(pcb) = table.get_mut(selected) {
                        pcb.advance_op(program, config)?;
                    }
                }
            }
        }
    }
}

/// Idles the CPU while every live process is blocked: advances the clock by
/// the I/O floor in a single step, then reports the idle period over.
pub fn cpu_idle(
    table: &mut ProcessTable,
    pacer: &mut dyn Pacer,
    sink: &mut dyn EventSink,
) -> Interrupt {
    sink.record(TraceEvent::IdleStart);
    if let Some(floor) = table.min_blocked_op_ms() {
        trace!(floor, "idle advance");
        table.advance_clock(floor);
        pacer.pace(floor);
    }
    sink.record(TraceEvent::IdleFinish);
    Interrupt::OutOfCycles
}
