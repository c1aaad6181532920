use std::time::Duration;

use embedded_hal::delay::DelayNs;

/// Blocking delay that only accounts time unless asked to really wait.
#[derive(Debug, Default)]
pub struct SimDelay {
    realtime: bool,
    elapsed: Duration,
}

impl SimDelay {
    pub fn new(realtime: bool) -> Self {
        Self {
            realtime,
            elapsed: Duration::ZERO,
        }
    }

    /// Total time requested so far.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }
}

impl DelayNs for SimDelay {
    fn delay_ns(&mut self, ns: u32) {
        let wait = Duration::from_nanos(u64::from(ns));
        self.elapsed += wait;
        if self.realtime {
            std::thread::sleep(wait);
        }
    }
}
