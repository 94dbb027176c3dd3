//! Trace formatting and output routing.
//!
//! Consumes the engine's abstract event stream and renders the classic
//! simulator trace: a lap-timer stamp in seconds, an `OS:` prefix, and one
//! line per event. Lines go to the monitor as they occur, into an in-memory
//! buffer flushed to the log file at run end, or both, per the configured
//! destination.

use std::fs;
use std::io;
use std::path::PathBuf;
use std::time::Instant;

use schedsim_core::config::LogDestination;
use schedsim_core::trace::{EventSink, TraceEvent};

/// Event sink rendering the human-readable simulation trace.
#[derive(Debug)]
pub struct TraceLogger {
    destination: LogDestination,
    log_path: PathBuf,
    started: Instant,
    lines: Vec<String>,
}

impl TraceLogger {
    /// Creates a logger routing to the given destination. The path is only
    /// touched by [`TraceLogger::finish`], and only for file destinations.
    pub fn new(destination: LogDestination, log_path: PathBuf) -> Self {
        Self {
            destination,
            log_path,
            started: Instant::now(),
            lines: Vec::new(),
        }
    }

    /// Buffered trace lines, in order.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Writes the buffered trace to the log file when the destination asks
    /// for one.
    pub fn finish(&self) -> io::Result<()> {
        if self.destination.to_file() {
            let mut text = self.lines.join("\n");
            text.push('\n');
            fs::write(&self.log_path, text)?;
        }
        Ok(())
    }

    fn stamp(&self) -> String {
        format!("{:>10.6}", self.started.elapsed().as_secs_f64())
    }

    fn emit(&mut self, line: String) {
        if self.destination.to_monitor() {
            println!("{line}");
        }
        self.lines.push(line);
    }

    fn render(&self, event: &TraceEvent) -> String {
        let t = self.stamp();
        match event {
            TraceEvent::SimStart => {
                format!("Running Simulator\n-----------------\n\n{t}, OS: Simulator start")
            }
            TraceEvent::NewToReady { pid } => {
                format!("{t}, OS: Process {pid} set to READY state from NEW state")
            }
            TraceEvent::Selected { pid, ms_left } => {
                format!("{t}, OS: Process {pid} selected with {ms_left} ms remaining")
            }
            TraceEvent::ReadyToRunning { pid } => {
                format!("{t}, OS: Process {pid} set from READY to RUNNING")
            }
            TraceEvent::RunningToBlocked { pid } => {
                format!("{t}, OS: Process {pid} set from RUNNING to BLOCKED")
            }
            TraceEvent::BlockedToReady { pid } => {
                format!("{t}, OS: Process {pid} set from BLOCKED to READY")
            }
            TraceEvent::ProcessExit { pid } => {
                format!("{t}, OS: Process {pid} ended and set to EXIT state")
            }
            TraceEvent::CpuOpStart { pid } => {
                format!("{t}, OS: Process {pid}, cpu process operation start")
            }
            TraceEvent::CpuOpFinish { pid } => {
                format!("{t}, OS: Process {pid}, cpu process operation end")
            }
            TraceEvent::QuantumExpired { pid } => {
                format!("{t}, OS: Process {pid}, quantum time out, cpu process operation end")
            }
            TraceEvent::DeviceOpStart {
                pid,
                device,
                direction,
            } => format!(
                "{t}, OS: Process {pid}, {device} {}put operation start",
                direction.as_str()
            ),
            TraceEvent::DeviceOpFinish {
                pid,
                device,
                direction,
            } => format!(
                "{t}, OS: Process {pid}, {device} {}put operation end",
                direction.as_str()
            ),
            TraceEvent::DeviceInterrupt {
                pid,
                device,
                direction,
            } => format!(
                "{t}, OS: Interrupted by Process {pid} {device} {}put operation",
                direction.as_str()
            ),
            TraceEvent::BlockedForDevice { pid, direction } => format!(
                "{t}, OS: Process {pid}, blocked for {}put operation",
                direction.as_str()
            ),
            TraceEvent::MemAttempt { pid, action } => format!(
                "{t}, OS: Process {pid}, attempting mem {} request",
                action.as_str()
            ),
            TraceEvent::MemSuccess { action } => {
                format!("{t}, OS: successful mem {} request", action.as_str())
            }
            TraceEvent::MemFault { pid, action } => format!(
                "{t}, OS: Process {pid}, failed mem {} request; segmentation fault",
                action.as_str()
            ),
            TraceEvent::IdleStart => {
                format!("{t}, OS: CPU idle, all active processes blocked")
            }
            TraceEvent::IdleFinish => format!("{t}, OS: CPU interrupt, end idle"),
            TraceEvent::AllExited => {
                format!("{t}, OS: All processes in EXIT state - scheduling complete")
            }
        }
    }
}

impl EventSink for TraceLogger {
    fn record(&mut self, event: TraceEvent) {
        let line = self.render(&event);
        self.emit(line);
    }
}
