//! Abstract trace events and the sink interface.
//!
//! The engine narrates a run as a stream of [`TraceEvent`]s: process
//! lifecycle transitions, dispatch decisions, operation boundaries, faults,
//! and idle periods. Formatting and persistence (monitor, file, or both) are
//! entirely the consumer's concern; the engine only calls
//! [`EventSink::record`] in simulated-time order.

use crate::core::process::ProcessId;
use crate::program::{Direction, MemAction};

/// One observable event of a simulation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraceEvent {
    /// Run begin.
    SimStart,
    /// A process was loaded from the instruction stream and made runnable.
    NewToReady {
        /// Loaded process.
        pid: ProcessId,
    },
    /// The scheduler chose a process that was not the previous dispatch.
    Selected {
        /// Chosen process.
        pid: ProcessId,
        /// Total simulated milliseconds the process still needs.
        ms_left: i64,
    },
    /// Dispatch notification accompanying [`TraceEvent::Selected`].
    ReadyToRunning {
        /// Dispatched process.
        pid: ProcessId,
    },
    /// A process began waiting on a device.
    RunningToBlocked {
        /// Blocked process.
        pid: ProcessId,
    },
    /// A blocked process's device burst completed.
    BlockedToReady {
        /// Unblocked process.
        pid: ProcessId,
    },
    /// A process reached its program end (or faulted) and became terminal.
    ProcessExit {
        /// Exiting process.
        pid: ProcessId,
    },
    /// CPU burst execution began (or resumed after an interleaved event).
    CpuOpStart {
        /// Running process.
        pid: ProcessId,
    },
    /// CPU burst execution completed.
    CpuOpFinish {
        /// Running process.
        pid: ProcessId,
    },
    /// The running process exhausted its quantum.
    QuantumExpired {
        /// Preempted process.
        pid: ProcessId,
    },
    /// Device burst execution began.
    DeviceOpStart {
        /// Owning process.
        pid: ProcessId,
        /// Device name from the operation.
        device: String,
        /// Transfer direction.
        direction: Direction,
    },
    /// Device burst execution completed (non-preemptive path).
    DeviceOpFinish {
        /// Owning process.
        pid: ProcessId,
        /// Device name from the operation.
        device: String,
        /// Transfer direction.
        direction: Direction,
    },
    /// A completed device burst interrupted the CPU (preemptive path).
    DeviceInterrupt {
        /// Process whose device finished.
        pid: ProcessId,
        /// Device name from the operation.
        device: String,
        /// Transfer direction.
        direction: Direction,
    },
    /// Block notification emitted by the interrupt handler.
    BlockedForDevice {
        /// Blocked process.
        pid: ProcessId,
        /// Transfer direction of the pending burst.
        direction: Direction,
    },
    /// A memory request is being validated.
    MemAttempt {
        /// Requesting process.
        pid: ProcessId,
        /// Allocate or access.
        action: MemAction,
    },
    /// A memory request passed validation.
    MemSuccess {
        /// Allocate or access.
        action: MemAction,
    },
    /// A memory request faulted; the process will exit.
    MemFault {
        /// Faulting process.
        pid: ProcessId,
        /// Allocate or access.
        action: MemAction,
    },
    /// All runnable work is blocked; the CPU idles until a device finishes.
    IdleStart,
    /// A device completion ended the idle period.
    IdleFinish,
    /// Every process reached the terminal state.
    AllExited,
}

/// Consumer of the engine's event stream.
pub trait EventSink {
    /// Records one event. Called in simulated-time order.
    fn record(&mut self, event: TraceEvent);
}

/// Sink that discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn record(&mut self, _event: TraceEvent) {}
}

/// Sink that retains every event in arrival order.
#[derive(Debug, Clone, Default)]
pub struct VecSink {
    /// Recorded events.
    pub events: Vec<TraceEvent>,
}

impl EventSink for VecSink {
    fn record(&mut self, event: TraceEvent) {
        self.events.push(event);
    }
}
