//! Configuration for the scheduling simulator.
//!
//! This module defines the structures and enums that parameterize a run. It
//! provides:
//! 1. **Defaults:** Baseline constants for quantum, cycle rates, and memory.
//! 2. **Structures:** The root [`Config`] consumed by the run loop.
//! 3. **Enums:** Scheduling policy and log destination selectors.
//!
//! Configuration is supplied by the front end (parsed from a configuration
//! file or deserialized from JSON) or via `Config::default()`.

use serde::Deserialize;

/// Default configuration constants.
///
/// These values define the baseline simulation parameters when not explicitly
/// overridden by the front end.
mod defaults {
    /// Default round-robin quantum in processor cycles.
    pub const QUANTUM_CYCLES: i64 = 3;

    /// Default addressable memory in kilobytes.
    ///
    /// Memory requests whose upper bound exceeds this value fault.
    pub const MEMORY_KB: i64 = 10_240;

    /// Default simulated milliseconds consumed per processor cycle.
    pub const CPU_CYCLE_MS: i64 = 10;

    /// Default simulated milliseconds consumed per device cycle.
    ///
    /// Device bursts are typically an order of magnitude slower than CPU
    /// bursts, which is what makes blocked-process co-simulation observable.
    pub const IO_CYCLE_MS: i64 = 20;
}

/// Dispatch policy selectors.
///
/// The `-N` policies are non-preemptive: a dispatched process runs its whole
/// program span before the next selection. The `-P` policies re-enter the
/// scheduler on every interrupt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum SchedulingPolicy {
    /// First-come-first-served, non-preemptive.
    #[default]
    #[serde(rename = "FCFS-N")]
    FcfsN,
    /// Shortest-job-first, non-preemptive.
    #[serde(rename = "SJF-N")]
    SjfN,
    /// First-come-first-served, preemptive variant.
    #[serde(rename = "FCFS-P")]
    FcfsP,
    /// Shortest-remaining-time-first, preemptive.
    #[serde(rename = "SRTF-P")]
    SrtfP,
    /// Round-robin, preemptive.
    #[serde(rename = "RR-P")]
    RrP,
}

impl SchedulingPolicy {
    /// Returns `true` for policies dispatched through the interrupt-driven loop.
    pub fn is_preemptive(self) -> bool {
        matches!(self, Self::FcfsP | Self::SrtfP | Self::RrP)
    }

    /// Returns the canonical policy code (e.g. `"SRTF-P"`).
    pub fn code(self) -> &'static str {
        match self {
            Self::FcfsN => "FCFS-N",
            Self::SjfN => "SJF-N",
            Self::FcfsP => "FCFS-P",
            Self::SrtfP => "SRTF-P",
            Self::RrP => "RR-P",
        }
    }

    /// Parses a policy code case-insensitively; returns `None` for unknown codes.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_ascii_lowercase().as_str() {
            "fcfs-n" => Some(Self::FcfsN),
            "sjf-n" => Some(Self::SjfN),
            "fcfs-p" => Some(Self::FcfsP),
            "srtf-p" => Some(Self::SrtfP),
            "rr-p" => Some(Self::RrP),
            _ => None,
        }
    }
}

/// Trace output destination selectors.
///
/// The core only carries the selection; routing is the front end's concern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum LogDestination {
    /// Print trace lines to the monitor as they occur.
    #[default]
    Monitor,
    /// Buffer trace lines and write them to the log file at run end.
    File,
    /// Both of the above.
    Both,
}

impl LogDestination {
    /// Parses a destination keyword case-insensitively; returns `None` when unknown.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_ascii_lowercase().as_str() {
            "monitor" => Some(Self::Monitor),
            "file" => Some(Self::File),
            "both" => Some(Self::Both),
            _ => None,
        }
    }

    /// Returns `true` when trace lines should reach the monitor.
    pub fn to_monitor(self) -> bool {
        matches!(self, Self::Monitor | Self::Both)
    }

    /// Returns `true` when trace lines should reach the log file.
    pub fn to_file(self) -> bool {
        matches!(self, Self::File | Self::Both)
    }
}

/// Root configuration consumed by the run loop.
///
/// # Examples
///
/// Deserializing from JSON:
///
/// ```
/// use schedsim_core::config::{Config, SchedulingPolicy};
///
/// let json = r#"{
///     "policy": "RR-P",
///     "quantum_cycles": 4,
///     "memory_kb": 2048,
///     "cpu_cycle_ms": 5,
///     "io_cycle_ms": 50,
///     "log_to": "Both"
/// }"#;
///
/// let config = Config::from_json(json).unwrap();
/// assert_eq!(config.policy, SchedulingPolicy::RrP);
/// assert_eq!(config.quantum_ms(), 20);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Config {
    /// Dispatch policy for the run.
    #[serde(default)]
    pub policy: SchedulingPolicy,

    /// Round-robin quantum in processor cycles.
    #[serde(default = "Config::default_quantum_cycles")]
    pub quantum_cycles: i64,

    /// Total addressable memory in kilobytes.
    #[serde(default = "Config::default_memory_kb")]
    pub memory_kb: i64,

    /// Simulated milliseconds per processor cycle.
    #[serde(default = "Config::default_cpu_cycle_ms")]
    pub cpu_cycle_ms: i64,

    /// Simulated milliseconds per device cycle.
    #[serde(default = "Config::default_io_cycle_ms")]
    pub io_cycle_ms: i64,

    /// Trace destination selector.
    #[serde(default)]
    pub log_to: LogDestination,
}

impl Config {
    /// Returns the default quantum in processor cycles.
    fn default_quantum_cycles() -> i64 {
        defaults::QUANTUM_CYCLES
    }

    /// Returns the default memory size in kilobytes.
    fn default_memory_kb() -> i64 {
        defaults::MEMORY_KB
    }

    /// Returns the default processor cycle rate.
    fn default_cpu_cycle_ms() -> i64 {
        defaults::CPU_CYCLE_MS
    }

    /// Returns the default device cycle rate.
    fn default_io_cycle_ms() -> i64 {
        defaults::IO_CYCLE_MS
    }

    /// Deserializes a configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Quantum length in simulated milliseconds.
    pub fn quantum_ms(&self) -> i64 {
        self.quantum_cycles * self.cpu_cycle_ms
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            policy: SchedulingPolicy::default(),
            quantum_cycles: defaults::QUANTUM_CYCLES,
            memory_kb: defaults::MEMORY_KB,
            cpu_cycle_ms: defaults::CPU_CYCLE_MS,
            io_cycle_ms: defaults::IO_CYCLE_MS,
            log_to: LogDestination::default(),
        }
    }
}
