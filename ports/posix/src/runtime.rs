//! Host main loop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use node_sched::{Dispatcher, Pass};

use crate::clock::SimPower;
use crate::SimNode;

/// Counters collected by [`PosixRuntime::run`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunStats {
    pub passes: u64,
    pub dispatched: u64,
    pub sleeps: u32,
}

/// Stops a running loop after its current pass. Cloneable and `Send`.
#[derive(Debug, Clone)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn stop(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Drives [`SimNode::poll`] until stopped.
///
/// A runtime is armed when created; once stopped, [`run`](Self::run)
/// returns without polling.
#[derive(Debug)]
pub struct PosixRuntime {
    running: Arc<AtomicBool>,
}

impl Default for PosixRuntime {
    fn default() -> Self {
        Self::new()
    }
}

impl PosixRuntime {
    pub fn new() -> Self {
        Self {
            running: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn stop_handle(&self) -> StopHandle {
        StopHandle(Arc::clone(&self.running))
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Polls `node` until stopped or until the core has slept `max_sleeps`
    /// times.
    pub fn run<'a>(
        &self,
        node: &mut SimNode<'a>,
        dispatcher: &Dispatcher<SimNode<'a>>,
        power: &mut SimPower<'_>,
        max_sleeps: Option<u32>,
    ) -> RunStats {
        let start = power.sleeps();
        let mut stats = RunStats::default();

        while self.is_running() {
            if let Pass::Dispatched(ran) = node.poll(dispatcher, power) {
                stats.dispatched += u64::from(ran);
            }
            stats.passes += 1;
            stats.sleeps = power.sleeps() - start;
            if max_sleeps.is_some_and(|limit| stats.sleeps >= limit) {
                break;
            }
        }

        self.running.store(false, Ordering::SeqCst);
        log::info!(
            "stopped after {} passes, {} handlers, {} sleeps",
            stats.passes,
            stats.dispatched,
            stats.sleeps
        );
        stats
    }
}
