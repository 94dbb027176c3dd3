//! Configuration-file parsing and validation.
//!
//! Parses the simulator's `.cnf` format: a leader line, nine `Prompt: value`
//! items in any order, and a trailer line. Values are range-checked here so
//! the engine only ever sees a valid [`Config`].
//!
//! ```text
//! Start Simulator Configuration File
//! Version/Phase: 1.0
//! File Path: testfile.mdf
//! CPU Scheduling Code: RR-P
//! Quantum Time (cycles): 3
//! Memory Available (KB): 11100
//! Processor Cycle Time (msec): 10
//! I/O Cycle Time (msec): 20
//! Log To: Both
//! Log File Path: logfile_1.lgf
//! End Simulator Configuration File.
//! ```

use std::fmt;
use std::fs;
use std::path::Path;

use thiserror::Error;

use schedsim_core::config::{Config, LogDestination, SchedulingPolicy};

const LEADER: &str = "Start Simulator Configuration File";
const TRAILER: &str = "End Simulator Configuration File.";

/// Failures while reading or validating a configuration file.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    /// The file could not be read.
    #[error("configuration file access error: {0}")]
    Io(#[from] std::io::Error),
    /// The leader line was missing or corrupt.
    #[error("corrupt configuration leader line")]
    BadLeader,
    /// The trailer line was missing or corrupt.
    #[error("corrupt configuration trailer line")]
    BadTrailer,
    /// A data line's prompt was not recognized.
    #[error("configuration prompt corruption error: {0:?}")]
    UnknownPrompt(String),
    /// A data line's value could not be parsed.
    #[error("malformed configuration value for {item}: {value:?}")]
    BadValue {
        /// Prompt of the offending line.
        item: &'static str,
        /// Raw value text.
        value: String,
    },
    /// A value parsed but fell outside its allowed range.
    #[error("configuration item out of range: {item} = {value}")]
    OutOfRange {
        /// Prompt of the offending line.
        item: &'static str,
        /// Raw value text.
        value: String,
    },
    /// A required item never appeared before the trailer.
    #[error("missing configuration item: {0}")]
    MissingItem(&'static str),
}

/// A parsed and validated configuration file.
#[derive(Debug, Clone, PartialEq)]
pub struct FileConfig {
    /// Version/phase number (0–10).
    pub version: f64,
    /// Path of the program (op-code) file.
    pub program_path: String,
    /// Path of the log file (used for `File`/`Both` destinations).
    pub log_path: String,
    /// Engine configuration assembled from the file.
    pub config: Config,
}

impl FileConfig {
    /// Reads and validates a configuration file from disk.
    pub fn load(path: &Path) -> Result<Self, ConfigFileError> {
        Self::parse(&fs::read_to_string(path)?)
    }

    /// Parses and validates configuration-file text.
    pub fn parse(text: &str) -> Result<Self, ConfigFileError> {
        let mut lines = text.lines().map(str::trim).filter(|line| !line.is_empty());

        if lines.next() != Some(LEADER) {
            return Err(ConfigFileError::BadLeader);
        }

        let mut version: Option<f64> = None;
        let mut program_path: Option<String> = None;
        let mut log_path: Option<String> = None;
        let mut policy: Option<SchedulingPolicy> = None;
        let mut quantum: Option<i64> = None;
        let mut memory: Option<i64> = None;
        let mut cpu_rate: Option<i64> = None;
        let mut io_rate: Option<i64> = None;
        let mut log_to: Option<LogDestination> = None;
        let mut closed = false;

        for line in lines {
            if line == TRAILER {
                closed = true;
                break;
            }
            let Some((prompt, value)) = line.split_once(':') else {
                return Err(ConfigFileError::UnknownPrompt(line.to_owned()));
            };
            let value = value.trim();

            match prompt.trim() {
                "Version/Phase" => {
                    version = Some(parse_ranged_f64("Version/Phase", value, 0.0, 10.0)?);
                }
                "File Path" => program_path = Some(value.to_owned()),
                "Log File Path" => log_path = Some(value.to_owned()),
                "CPU Scheduling Code" => {
                    policy = Some(SchedulingPolicy::from_code(value).ok_or_else(|| {
                        ConfigFileError::OutOfRange {
                            item: "CPU Scheduling Code",
                            value: value.to_owned(),
                        }
                    })?);
                }
                "Quantum Time (cycles)" => {
                    quantum = Some(parse_ranged("Quantum Time (cycles)", value, 0, 100)?);
                }
                "Memory Available (KB)" => {
                    memory = Some(parse_ranged("Memory Available (KB)", value, 1024, 102_400)?);
                }
                "Processor Cycle Time (msec)" => {
                    cpu_rate = Some(parse_ranged("Processor Cycle Time (msec)", value, 1, 100)?);
                }
                "I/O Cycle Time (msec)" => {
                    io_rate = Some(parse_ranged("I/O Cycle Time (msec)", value, 1, 1000)?);
                }
                "Log To" => {
                    log_to = Some(LogDestination::from_code(value).ok_or_else(|| {
                        ConfigFileError::OutOfRange {
                            item: "Log To",
                            value: value.to_owned(),
                        }
                    })?);
                }
                other => return Err(ConfigFileError::UnknownPrompt(other.to_owned())),
            }
        }

        if !closed {
            return Err(ConfigFileError::BadTrailer);
        }

        Ok(Self {
            version: version.ok_or(ConfigFileError::MissingItem("Version/Phase"))?,
            program_path: program_path.ok_or(ConfigFileError::MissingItem("File Path"))?,
            log_path: log_path.ok_or(ConfigFileError::MissingItem("Log File Path"))?,
            config: Config {
                policy: policy.ok_or(ConfigFileError::MissingItem("CPU Scheduling Code"))?,
                quantum_cycles: quantum.ok_or(ConfigFileError::MissingItem("Quantum Time (cycles)"))?,
                memory_kb: memory.ok_or(ConfigFileError::MissingItem("Memory Available (KB)"))?,
                cpu_cycle_ms: cpu_rate
                    .ok_or(ConfigFileError::MissingItem("Processor Cycle Time (msec)"))?,
                io_cycle_ms: io_rate.ok_or(ConfigFileError::MissingItem("I/O Cycle Time (msec)"))?,
                log_to: log_to.ok_or(ConfigFileError::MissingItem("Log To"))?,
            },
        })
    }
}

impl fmt::Display for FileConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Config File Display")?;
        writeln!(f, "-------------------")?;
        writeln!(f, "Version                : {}", self.version)?;
        writeln!(f, "Program file name      : {}", self.program_path)?;
        writeln!(f, "CPU schedule selection : {}", self.config.policy.code())?;
        writeln!(f, "Quantum time           : {}", self.config.quantum_cycles)?;
        writeln!(f, "Memory available       : {}", self.config.memory_kb)?;
        writeln!(f, "Process cycle rate     : {}", self.config.cpu_cycle_ms)?;
        writeln!(f, "I/O cycle rate         : {}", self.config.io_cycle_ms)?;
        writeln!(f, "Log to selection       : {:?}", self.config.log_to)?;
        write!(f, "Log file name          : {}", self.log_path)
    }
}

/// Parses an integer item and checks it against an inclusive range.
fn parse_ranged(
    item: &'static str,
    value: &str,
    low: i64,
    high: i64,
) -> Result<i64, ConfigFileError> {
    let parsed: i64 = value.parse().map_err(|_| ConfigFileError::BadValue {
        item,
        value: value.to_owned(),
    })?;
    if parsed < low || parsed > high {
        return Err(ConfigFileError::OutOfRange {
            item,
            value: value.to_owned(),
        });
    }
    Ok(parsed)
}

/// Parses a floating-point item and checks it against an inclusive range.
fn parse_ranged_f64(
    item: &'static str,
    value: &str,
    low: f64,
    high: f64,
) -> Result<f64, ConfigFileError> {
    let parsed: f64 = value.parse().map_err(|_| ConfigFileError::BadValue {
        item,
        value: value.to_owned(),
    })?;
    if parsed < low || parsed > high {
        return Err(ConfigFileError::OutOfRange {
            item,
            value: value.to_owned(),
        });
    }
    Ok(parsed)
}
