//! The instruction stream: simulated program operations.
//!
//! This module defines the operations a simulated program is made of. It provides:
//! 1. **Operations:** A closed tagged variant over program boundaries, CPU bursts,
//!    device bursts, and memory requests.
//! 2. **The stream:** An owned, index-stable sequence of operations with
//!    bounds-checked access.
//!
//! Each process owns a cursor into one contiguous span of the stream, delimited
//! by a [`Operation::ProgramStart`]/[`Operation::ProgramEnd`] pair. The stream is
//! immutable for the whole run; the front end is responsible for producing it
//! with balanced boundary markers.

/// Transfer direction of a device operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Input transfer (`in`).
    In,
    /// Output transfer (`out`).
    Out,
}

impl Direction {
    /// Returns the lower-case keyword used in program files and trace lines.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::In => "in",
            Self::Out => "out",
        }
    }
}

/// Sub-action of a memory request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemAction {
    /// Claim a new address range.
    Allocate,
    /// Touch an already-claimed address range.
    Access,
}

impl MemAction {
    /// Returns the lower-case keyword used in program files and trace lines.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Allocate => "allocate",
            Self::Access => "access",
        }
    }
}

/// One instruction of a simulated program.
///
/// Cycle counts are abstract; the configuration's per-cycle millisecond rates
/// convert them to simulated time when a process reaches the operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Program boundary: process creation point.
    ProgramStart,
    /// Program boundary: process completion point.
    ProgramEnd,
    /// CPU burst of the given cycle count.
    Cpu {
        /// Burst length in processor cycles.
        cycles: i64,
    },
    /// Device burst of the given cycle count.
    Device {
        /// Human-readable device name (e.g. `"hard drive"`).
        name: String,
        /// Transfer direction.
        direction: Direction,
        /// Burst length in device cycles.
        cycles: i64,
    },
    /// Memory request over `[base, base + bytes)`.
    Mem {
        /// Allocate or access.
        action: MemAction,
        /// Lower bound of the requested range.
        base: i64,
        /// Length of the requested range.
        bytes: i64,
    },
}

impl Operation {
    /// Returns `true` for memory requests.
    pub fn is_memory(&self) -> bool {
        matches!(self, Self::Mem { .. })
    }

    /// Returns `true` for the program-end boundary marker.
    pub fn is_program_end(&self) -> bool {
        matches!(self, Self::ProgramEnd)
    }

    /// For memory requests, returns `(action, lower, upper)` with the upper
    /// bound computed as `base + bytes`.
    pub fn mem_request(&self) -> Option<(MemAction, i64, i64)> {
        match self {
            Self::Mem {
                action,
                base,
                bytes,
            } => Some((*action, *base, *base + *bytes)),
            _ => None,
        }
    }
}

/// An ordered, immutable sequence of operations.
///
/// Processes never hold references into the stream; they hold plain indices,
/// resolved through [`Program::op`] so a cursor can never be dereferenced past
/// the end of the stream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    ops: Vec<Operation>,
}

impl Program {
    /// Wraps an operation sequence produced by the front end.
    pub fn new(ops: Vec<Operation>) -> Self {
        Self { ops }
    }

    /// Bounds-checked operation lookup.
    pub fn op(&self, index: usize) -> Option<&Operation> {
        self.ops.get(index)
    }

    /// Number of operations in the stream.
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Returns `true` when the stream holds no operations.
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Iterates the stream in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Operation> {
        self.ops.iter()
    }

    /// Number of complete program spans (start/end pairs) in the stream.
    pub fn process_count(&self) -> usize {
        self.ops.iter().filter(|op| op.is_program_end()).count()
    }
}

impl<'a> IntoIterator for &'a Program {
    type Item = &'a Operation;
    type IntoIter = std::slice::Iter<'a, Operation>;

    fn into_iter(self) -> Self::IntoIter {
        self.ops.iter()
    }
}
