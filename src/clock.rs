//! Time source for the driver loop.

use std::time::{Duration, Instant};

/// Supplies the current instant and the blocking wait between ticks.
pub trait Clock {
    fn now(&self) -> Instant;

    fn sleep(&mut self, duration: Duration);
}

/// Wall-clock time with a real blocking sleep.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// A clock that only moves when asked to sleep.
#[derive(Clone, Copy, Debug)]
pub struct ManualClock {
    start: Instant,
    now: Instant,
}

impl ManualClock {
    pub fn new() -> Self {
        let start = Instant::now();
        Self { start, now: start }
    }

    pub fn advance(&mut self, duration: Duration) {
        self.now += duration;
    }

    /// Total time slept since construction.
    pub fn elapsed(&self) -> Duration {
        self.now - self.start
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.now
    }

    fn sleep(&mut self, duration: Duration) {
        self.advance(duration);
    }
}
