//! Process records and the process table.
//!
//! The table owns every process record for the lifetime of the run; a record
//! is created when its program-start marker is scanned and is never removed.
//! `EXIT` is a terminal state, not a deallocation. The table also carries the
//! single global simulated clock that the execution engine advances.

use crate::config::Config;
use crate::error::SimError;
use crate::program::{Operation, Program};

/// Process identifier: dense, assigned in creation order starting at 0.
pub type ProcessId = u32;

/// Lifecycle state of a process record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessState {
    /// Created but not yet runnable.
    New,
    /// Runnable, waiting for dispatch.
    Ready,
    /// Holding the CPU.
    Running,
    /// Waiting on a device burst.
    Blocked,
    /// Terminal; ignored by selection and by live-region checks.
    Exit,
}

/// One process control block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pcb {
    /// Process identifier.
    pub pid: ProcessId,
    /// Lifecycle state.
    pub state: ProcessState,
    /// Total simulated milliseconds remaining across all operations.
    pub ms_left: i64,
    /// Simulated milliseconds remaining for the current operation.
    pub op_ms_left: i64,
    /// Scheduling-decision ticks spent unselected since the last dispatch.
    pub wait_time: i64,
    /// Index of the current operation in the instruction stream.
    pub cursor: usize,
}

impl Pcb {
    /// Moves the cursor to the next operation and primes its remaining time:
    /// zero for memory requests and boundaries, `cycles x rate` for CPU and
    /// device bursts.
    ///
    /// Sets the record READY unless it is BLOCKED; the I/O-completion sweep
    /// handles the BLOCKED-to-READY transition itself.
    pub fn advance_op(&mut self, program: &Program, config: &Config) -> Result<(), SimError> {
        self.cursor += 1;
        let op = program.op(self.cursor).ok_or(SimError::CursorOutOfRange {
            pid: self.pid,
            cursor: self.cursor,
        })?;

        self.op_ms_left = match op {
            Operation::Cpu { cycles } => cycles * config.cpu_cycle_ms,
            Operation::Device { cycles, .. } => cycles * config.io_cycle_ms,
            Operation::Mem { .. } | Operation::ProgramStart | Operation::ProgramEnd => 0,
        };

        if self.state != ProcessState::Blocked {
            self.state = ProcessState::Ready;
        }
        Ok(())
    }
}

/// Owner of all process records plus the global simulated clock.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessTable {
    pcbs: Vec<Pcb>,
    clock_ms: i64,
}

impl ProcessTable {
    /// Scans the instruction stream and creates one NEW record per program
    /// span, accumulating each span's total simulated time from its CPU and
    /// device bursts. Cursors point at the program-start markers.
    pub fn from_program(program: &Program, config: &Config) -> Self {
        let mut pcbs: Vec<Pcb> = Vec::with_capacity(program.process_count());
        let mut open: Option<Pcb> = None;

        for (index, op) in program.iter().enumerate() {
            match op {
                Operation::ProgramStart => {
                    open = Some(Pcb {
                        pid: pcbs.len() as ProcessId,
                        state: ProcessState::New,
                        ms_left: 0,
                        op_ms_left: 0,
                        wait_time: 0,
                        cursor: index,
                    });
                }
                Operation::Cpu { cycles } => {
                    if let Some(pcb) = open.as_mut() {
                        pcb.ms_left += cycles * config.cpu_cycle_ms;
                    }
                }
                Operation::Device { cycles, .. } => {
                    if let Some(pcb) = open.as_mut() {
                        pcb.ms_left += cycles * config.io_cycle_ms;
                    }
                }
                Operation::ProgramEnd => {
                    if let Some(pcb) = open.take() {
                        pcbs.push(pcb);
                    }
                }
                Operation::Mem { .. } => {}
            }
        }

        Self { pcbs, clock_ms: 0 }
    }

    /// Number of records in the table.
    pub fn len(&self) -> usize {
        self.pcbs.len()
    }

    /// Returns `true` when the table holds no records.
    pub fn is_empty(&self) -> bool {
        self.pcbs.is_empty()
    }

    /// Record lookup by identifier (identifiers are dense indices).
    pub fn get(&self, pid: ProcessId) -> Option<&Pcb> {
        self.pcbs.get(pid as usize)
    }

    /// Mutable record lookup by identifier.
    pub fn get_mut(&mut self, pid: ProcessId) -> Option<&mut Pcb> {
        self.pcbs.get_mut(pid as usize)
    }

    /// Iterates records in table (creation) order.
    pub fn iter(&self) -> std::slice::Iter<'_, Pcb> {
        self.pcbs.iter()
    }

    /// Mutably iterates records in table order.
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Pcb> {
        self.pcbs.iter_mut()
    }

    /// Current value of the global simulated clock in milliseconds.
    pub fn clock_ms(&self) -> i64 {
        self.clock_ms
    }

    /// Returns `true` when every record is terminal.
    pub fn all_exited(&self) -> bool {
        self.pcbs.iter().all(|pcb| pcb.state == ProcessState::Exit)
    }

    /// Returns `true` when at least one record is runnable.
    pub fn any_ready(&self) -> bool {
        self.pcbs.iter().any(|pcb| pcb.state == ProcessState::Ready)
    }

    /// Smallest current-operation remainder among BLOCKED records, or `None`
    /// when nothing is blocked. This is the I/O floor of the time advance.
    pub fn min_blocked_op_ms(&self) -> Option<i64> {
        self.pcbs
            .iter()
            .filter(|pcb| pcb.state == ProcessState::Blocked)
            .map(|pcb| pcb.op_ms_left)
            .min()
    }

    /// Advances the global clock by `step` milliseconds, charging the elapsed
    /// time to every RUNNING and BLOCKED record. This uniform subtraction is
    /// what lets blocked device bursts progress while the CPU runs, and vice
    /// versa.
    pub fn advance_clock(&mut self, step: i64) {
        self.clock_ms += step;
        for pcb in &mut self.pcbs {
            if matches!(pcb.state, ProcessState::Running | ProcessState::Blocked) {
                pcb.ms_left -= step;
                pcb.op_ms_left -= step;
            }
        }
    }

    /// Advances the global clock without charging any record. Used by the
    /// non-preemptive loop, which runs operations wholesale instead of
    /// decrementing remainders.
    pub fn tick_clock(&mut self, step: i64) {
        self.clock_ms += step;
    }

    /// Applies the per-decision wait-time rule: every non-EXIT record gains
    /// one tick; EXIT records are pinned at zero.
    pub fn bump_wait_times(&mut self) {
        for pcb in &mut self.pcbs {
            if pcb.state == ProcessState::Exit {
                pcb.wait_time = 0;
            } else {
                pcb.wait_time += 1;
            }
        }
    }
}
