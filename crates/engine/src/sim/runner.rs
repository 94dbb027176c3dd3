//! The run loop: selection, execution, and interrupt handling composed
//! until every process reaches the terminal state.
//!
//! Preemptive and non-preemptive policies use two structurally different
//! loops. The preemptive loop re-enters the scheduler after every interrupt;
//! the non-preemptive loop runs a dispatched process through its whole
//! program span before selecting again.

use tracing::{debug, info};

use crate::config::Config;
use crate::core::exec::{cpu_idle, cpu_run};
use crate::core::interrupt::{Interrupt, handle_interrupt};
use crate::core::process::{ProcessId, ProcessState, ProcessTable};
use crate::core::sched::select_pcb;
use crate::error::SimError;
use crate::mem::MemoryMap;
use crate::program::{MemAction, Operation, Program};
use crate::sim::pacing::Pacer;
use crate::stats::RunStats;
use crate::trace::{EventSink, TraceEvent};

/// Simulation context: the instruction stream, configuration, and all state
/// owned by the run loop.
#[derive(Debug)]
pub struct Simulation<'p> {
    program: &'p Program,
    config: Config,
    table: ProcessTable,
    memory: MemoryMap,
    previous: Option<ProcessId>,
    stats: RunStats,
}

impl<'p> Simulation<'p> {
    /// Builds the process table from the instruction stream. Records start
    /// NEW; they become runnable when [`Simulation::run`] loads them.
    pub fn new(program: &'p Program, config: Config) -> Self {
        let table = ProcessTable::from_program(program, &config);
        Self {
            program,
            config,
            table,
            memory: MemoryMap::default(),
            previous: None,
            stats: RunStats::default(),
        }
    }

    /// The process table in its current state.
    pub fn table(&self) -> &ProcessTable {
        &self.table
    }

    /// The memory map in its current state.
    pub fn memory(&self) -> &MemoryMap {
        &self.memory
    }

    /// Runs the simulation to completion and returns the run counters.
    pub fn run(
        &mut self,
        sink: &mut dyn EventSink,
        pacer: &mut dyn Pacer,
    ) -> Result<RunStats, SimError> {
        info!(
            policy = self.config.policy.code(),
            processes = self.table.len(),
            "run start"
        );
        sink.record(TraceEvent::SimStart);
        self.load_ready(sink)?;

        if self.config.policy.is_preemptive() {
            self.run_preemptive(sink, pacer)?;
        } else {
            self.run_to_completion(sink, pacer)?;
        }

        self.stats.simulated_ms = self.table.clock_ms();
        info!(simulated_ms = self.stats.simulated_ms, "run end");
        Ok(self.stats)
    }

    /// Promotes every NEW record to READY and primes its first operation.
    ///
    /// Initial wait times descend with creation order (the first process gets
    /// the largest), so earlier-created processes win wait-time-ranked
    /// selection first.
    fn load_ready(&mut self, sink: &mut dyn EventSink) -> Result<(), SimError> {
        let count = self.table.len() as i64;
        self.stats.processes = count as u64;

        for pcb in self.table.iter_mut() {
            pcb.state = ProcessState::Ready;
            pcb.op_ms_left = 0;
            pcb.wait_time = count - i64::from(pcb.pid);
            sink.record(TraceEvent::NewToReady { pid: pcb.pid });
            pcb.advance_op(self.program, &self.config)?;
        }
        Ok(())
    }

    /// Interrupt-driven loop for the preemptive policies.
    fn run_preemptive(
        &mut self,
        sink: &mut dyn EventSink,
        pacer: &mut dyn Pacer,
    ) -> Result<(), SimError> {
        loop {
            let all_exited = self.table.all_exited();
            let any_ready = self.table.any_ready();

            let selected = select_pcb(&mut self.table, self.config.policy, &mut self.previous, sink);
            if selected.is_some() {
                self.stats.dispatches += 1;
            }

            let interrupt = if all_exited {
                sink.record(TraceEvent::AllExited);
                Interrupt::None
            } else if !any_ready {
                self.stats.idle_periods += 1;
                cpu_idle(&mut self.table, pacer, sink)
            } else {
                let pid = selected.ok_or(SimError::DispatchInvariant(
                    "no process selected while READY work remained",
                ))?;
                let cursor = self
                    .table
                    .get(pid)
                    .ok_or(SimError::DispatchInvariant("selected process not in table"))?
                    .cursor;
                let op = self.program.op(cursor).ok_or(SimError::CursorOutOfRange {
                    pid,
                    cursor,
                })?;

                if let Some((action, lower, upper)) = op.mem_request() {
                    sink.record(TraceEvent::MemAttempt { pid, action });
                    self.memory_request(pid, action, lower, upper)
                } else {
                    cpu_run(
                        &mut self.table,
                        pid,
                        self.program,
                        &self.config,
                        pacer,
                        sink,
                    )?
                }
            };

            match interrupt {
                Interrupt::QuantumExpired => self.stats.quantum_expirations += 1,
                Interrupt::IoBlockStarted => self.stats.device_blocks += 1,
                Interrupt::SegmentationFault => self.stats.seg_faults += 1,
                _ => {}
            }

            handle_interrupt(
                &mut self.table,
                interrupt,
                selected,
                self.program,
                &self.config,
                sink,
            )?;

            if all_exited {
                return Ok(());
            }
        }
    }

    /// Validates one memory request and converts the outcome to an interrupt.
    fn memory_request(
        &mut self,
        pid: ProcessId,
        action: MemAction,
        lower: i64,
        upper: i64,
    ) -> Interrupt {
        self.stats.mem_ops += 1;
        let fault = match action {
            MemAction::Allocate => {
                self.memory
                    .allocate(lower, upper, pid, &self.table, &self.config)
            }
            MemAction::Access => self.memory.access(lower, upper, pid, &self.table, &self.config),
        };
        debug!(pid, action = action.as_str(), lower, upper, fault, "memory request");

        if fault {
            Interrupt::SegmentationFault
        } else {
            Interrupt::MemOpSucceeded
        }
    }

    /// Run-to-completion loop for the non-preemptive policies: each selected
    /// process executes every operation in its span (or faults), then exits.
    fn run_to_completion(
        &mut self,
        sink: &mut dyn EventSink,
        pacer: &mut dyn Pacer,
    ) -> Result<(), SimError> {
        while let Some(pid) =
            select_pcb(&mut self.table, self.config.policy, &mut self.previous, sink)
        {
            self.stats.dispatches += 1;
            let mut seg_fault = false;

            loop {
                let cursor = self
                    .table
                    .get(pid)
                    .ok_or(SimError::DispatchInvariant("selected process not in table"))?
                    .cursor;
                let op = self
                    .program
                    .op(cursor)
                    .ok_or(SimError::CursorOutOfRange { pid, cursor })?
                    .clone();

                if seg_fault || op.is_program_end() {
                    break;
                }

                match &op {
                    Operation::Mem { .. } => {
                        if let Some((action, lower, upper)) = op.mem_request() {
                            let interrupt = self.memory_request(pid, action, lower, upper);
                            sink.record(TraceEvent::MemAttempt { pid, action });
                            if interrupt == Interrupt::SegmentationFault {
                                self.stats.seg_faults += 1;
                                sink.record(TraceEvent::MemFault { pid, action });
                                seg_fault = true;
                            } else {
                                sink.record(TraceEvent::MemSuccess { action });
                            }
                        }
                    }
                    Operation::Cpu { .. } => {
                        sink.record(TraceEvent::CpuOpStart { pid });
                        let ms = self.op_ms(pid);
                        self.table.tick_clock(ms);
                        pacer.pace(ms);
                        sink.record(TraceEvent::CpuOpFinish { pid });
                    }
                    Operation::Device {
                        name, direction, ..
                    } => {
                        sink.record(TraceEvent::DeviceOpStart {
                            pid,
                            device: name.clone(),
                            direction: *direction,
                        });
                        let ms = self.op_ms(pid);
                        self.table.tick_clock(ms);
                        pacer.pace(ms);
                        sink.record(TraceEvent::DeviceOpFinish {
                            pid,
                            device: name.clone(),
                            direction: *direction,
                        });
                    }
                    Operation::ProgramStart | Operation::ProgramEnd => {}
                }

                if let Some(pcb) = self.table.get_mut(pid) {
                    pcb.advance_op(self.program, &self.config)?;
                }
            }

            sink.record(TraceEvent::ProcessExit { pid });
            if let Some(pcb) = self.table.get_mut(pid) {
                pcb.state = ProcessState::Exit;
            }
        }
        Ok(())
    }

    /// Current-operation remainder of a process (zero if unknown).
    fn op_ms(&self, pid: ProcessId) -> i64 {
        self.table.get(pid).map_or(0, |pcb| pcb.op_ms_left)
    }
}
