//! Front-end collaborators for the scheduling simulator.
//!
//! This crate hosts everything the engine deliberately excludes: the
//! configuration-file parser and its range validation, the program (op-code)
//! file parser, and the human-readable trace logger. The `schedsim` binary
//! wires them to `schedsim-core`.

/// Configuration-file (`.cnf`) parsing and validation.
pub mod config_file;
/// Trace formatting and monitor/file routing.
pub mod logger;
/// Program (`.mdf`) op-code file parsing.
pub mod metadata;

pub use config_file::{ConfigFileError, FileConfig};
pub use logger::TraceLogger;
pub use metadata::{MetadataError, load_program, parse_program};
