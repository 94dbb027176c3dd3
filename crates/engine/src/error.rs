//! Simulator error definitions.
//!
//! Only programming-invariant breaches surface as [`SimError`]; simulated
//! failures (segmentation faults) are modeled outcomes carried by the
//! interrupt type, never `Err` values.

use thiserror::Error;

use crate::core::process::ProcessId;

/// Fatal invariant breaches inside the engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimError {
    /// A process cursor moved past the end of the instruction stream, which
    /// means the stream's boundary markers were unbalanced.
    #[error("process {pid}: operation cursor {cursor} escaped the instruction stream")]
    CursorOutOfRange {
        /// Offending process.
        pid: ProcessId,
        /// Cursor value that failed to resolve.
        cursor: usize,
    },

    /// The run loop and the scheduler disagreed about runnable work.
    #[error("dispatch invariant violated: {0}")]
    DispatchInvariant(&'static str),
}
