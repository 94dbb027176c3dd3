//! Program (op-code) file parsing.
//!
//! Parses the simulator's `.mdf` format into an engine [`Program`]:
//!
//! ```text
//! Start Program Meta-Data Code:
//! sys start
//! app start, 0
//! dev in, hard drive, 39
//! cpu process, 9
//! mem allocate, 2048, 4096
//! app end, 0
//! sys end
//! End Program Meta-Data Code.
//! ```
//!
//! The `sys start`/`sys end` envelope and the framing lines are validated and
//! discarded; the engine's stream contains only app-delimited operations.
//! Program-start/end markers must balance, and every operation between a
//! start and its end belongs to that process.

use std::fmt;
use std::fs;
use std::path::Path;

use thiserror::Error;

use schedsim_core::program::{Direction, MemAction, Operation, Program};

const LEADER: &str = "Start Program Meta-Data Code:";
const TRAILER: &str = "End Program Meta-Data Code.";

/// Failures while reading or validating a program file.
#[derive(Debug, Error)]
pub enum MetadataError {
    /// The file could not be read.
    #[error("program file access error: {0}")]
    Io(#[from] std::io::Error),
    /// The leader line was missing or corrupt.
    #[error("corrupt program leader line")]
    BadLeader,
    /// The trailer line was missing or corrupt.
    #[error("corrupt program trailer line")]
    BadTrailer,
    /// The `sys start`/`sys end` envelope was missing or misplaced.
    #[error("program missing the sys start/end envelope")]
    BadEnvelope,
    /// An op-code line used an unknown command word.
    #[error("unrecognized op-code command: {0:?}")]
    UnknownCommand(String),
    /// An op-code line's arguments could not be parsed.
    #[error("malformed op-code arguments: {0:?}")]
    BadArguments(String),
    /// Program-start and program-end markers did not balance.
    #[error("unbalanced program start/end markers")]
    UnbalancedBoundaries,
}

/// Reads and validates a program file from disk.
pub fn load_program(path: &Path) -> Result<Program, MetadataError> {
    parse_program(&fs::read_to_string(path)?)
}

/// Parses and validates program-file text.
pub fn parse_program(text: &str) -> Result<Program, MetadataError> {
    let mut lines = text.lines().map(str::trim).filter(|line| !line.is_empty());

    if lines.next() != Some(LEADER) {
        return Err(MetadataError::BadLeader);
    }

    let mut ops: Vec<Operation> = Vec::new();
    let mut saw_sys_start = false;
    let mut saw_sys_end = false;
    let mut closed = false;
    let mut open_spans: i64 = 0;

    for line in lines {
        if line == TRAILER {
            closed = true;
            break;
        }
        if saw_sys_end {
            // Op codes after sys end mean the envelope is misplaced.
            return Err(MetadataError::BadEnvelope);
        }

        let (command, rest) = line.split_once(' ').unwrap_or((line, ""));
        let args: Vec<&str> = if rest.is_empty() {
            Vec::new()
        } else {
            rest.split(',').map(str::trim).collect()
        };

        match command {
            "sys" => match args.first().copied() {
                Some("start") if !saw_sys_start => saw_sys_start = true,
                Some("end") if saw_sys_start => saw_sys_end = true,
                _ => return Err(MetadataError::BadEnvelope),
            },
            "app" => {
                if !saw_sys_start {
                    return Err(MetadataError::BadEnvelope);
                }
                match args.first().copied() {
                    Some("start") => {
                        open_spans += 1;
                        if open_spans > 1 {
                            return Err(MetadataError::UnbalancedBoundaries);
                        }
                        ops.push(Operation::ProgramStart);
                    }
                    Some("end") => {
                        open_spans -= 1;
                        if open_spans < 0 {
                            return Err(MetadataError::UnbalancedBoundaries);
                        }
                        ops.push(Operation::ProgramEnd);
                    }
                    _ => return Err(MetadataError::BadArguments(line.to_owned())),
                }
            }
            "cpu" => {
                let cycles = match args.as_slice() {
                    ["process", cycles] => parse_count(line, *cycles)?,
                    _ => return Err(MetadataError::BadArguments(line.to_owned())),
                };
                ops.push(Operation::Cpu { cycles });
            }
            "dev" => {
                let (direction, name, cycles) = match args.as_slice() {
                    [direction, name, cycles] => (*direction, *name, *cycles),
                    _ => return Err(MetadataError::BadArguments(line.to_owned())),
                };
                let direction = match direction {
                    "in" => Direction::In,
                    "out" => Direction::Out,
                    _ => return Err(MetadataError::BadArguments(line.to_owned())),
                };
                ops.push(Operation::Device {
                    name: name.to_owned(),
                    direction,
                    cycles: parse_count(line, cycles)?,
                });
            }
            "mem" => {
                let (action, base, bytes) = match args.as_slice() {
                    [action, base, bytes] => (*action, *base, *bytes),
                    _ => return Err(MetadataError::BadArguments(line.to_owned())),
                };
                let action = match action {
                    "allocate" => MemAction::Allocate,
                    "access" => MemAction::Access,
                    _ => return Err(MetadataError::BadArguments(line.to_owned())),
                };
                ops.push(Operation::Mem {
                    action,
                    base: parse_count(line, base)?,
                    bytes: parse_count(line, bytes)?,
                });
            }
            other => return Err(MetadataError::UnknownCommand(other.to_owned())),
        }
    }

    if !closed {
        return Err(MetadataError::BadTrailer);
    }
    if !saw_sys_start || !saw_sys_end {
        return Err(MetadataError::BadEnvelope);
    }
    if open_spans != 0 {
        return Err(MetadataError::UnbalancedBoundaries);
    }

    Ok(Program::new(ops))
}

/// Parses one numeric op-code argument.
fn parse_count(line: &str, value: &str) -> Result<i64, MetadataError> {
    value
        .parse()
        .map_err(|_| MetadataError::BadArguments(line.to_owned()))
}

/// Renders a parsed program one operation per line, for `--show-program`.
#[derive(Debug)]
pub struct ProgramDisplay<'a>(pub &'a Program);

impl fmt::Display for ProgramDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Program File Display")?;
        write!(f, "--------------------")?;
        for op in self.0 {
            f.write_str("\n")?;
            match op {
                Operation::ProgramStart => write!(f, "app start")?,
                Operation::ProgramEnd => write!(f, "app end")?,
                Operation::Cpu { cycles } => write!(f, "cpu process, {cycles}")?,
                Operation::Device {
                    name,
                    direction,
                    cycles,
                } => write!(f, "dev {}, {name}, {cycles}", direction.as_str())?,
                Operation::Mem {
                    action,
                    base,
                    bytes,
                } => write!(f, "mem {}, {base}, {bytes}", action.as_str())?,
            }
        }
        Ok(())
    }
}
