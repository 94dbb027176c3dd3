//! Real-time pacing of simulated time.
//!
//! Pacing is purely cosmetic: it slows the run down so trace output is
//! legible in real time, and must never influence a scheduling decision.
//! Implementations therefore receive only a duration, never table or memory
//! state.

use std::sync::mpsc;
use std::thread;
use std::time::Duration;

/// Wall-clock delay service invoked once per advanced time step.
pub trait Pacer {
    /// Blocks for a real-world duration proportional to `sim_ms`.
    fn pace(&mut self, sim_ms: i64);
}

/// Pacer that returns immediately: the run executes as fast as the host allows.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPacing;

impl Pacer for NoPacing {
    fn pace(&mut self, _sim_ms: i64) {}
}

/// Pacer that sleeps one wall-clock millisecond per simulated millisecond.
///
/// The delay runs on a spawned helper thread and hands completion back over
/// a one-shot channel; the run loop regains control only after the rendezvous,
/// so steps never overlap or reorder.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadPacer;

impl Pacer for ThreadPacer {
    fn pace(&mut self, sim_ms: i64) {
        if sim_ms <= 0 {
            return;
        }
        let delay = Duration::from_millis(sim_ms as u64);
        let (done_tx, done_rx) = mpsc::sync_channel::<()>(1);
        let worker = thread::spawn(move || {
            thread::sleep(delay);
            let _ = done_tx.send(());
        });
        let _ = done_rx.recv();
        let _ = worker.join();
    }
}
