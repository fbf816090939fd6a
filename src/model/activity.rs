use std::time::{Duration, Instant};

/// Aggregate read-byte count of a process tree at one point in time.
///
/// The total is a sum of per-process monotonic counters, but the set of
/// processes changes between samples, so consecutive totals may decrease.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ActivitySample {
    pub total_read_bytes: u64,
    pub timestamp: Instant,
}

impl ActivitySample {
    pub fn new(total_read_bytes: u64, timestamp: Instant) -> Self {
        Self { total_read_bytes, timestamp }
    }
}

/// State carried between ticks by the idle detector.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IdleState {
    pub last_total_bytes: u64,
    pub last_active_at: Instant,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DetectorState {
    Active,
    TimedOut,
}

/// What a single detector step observed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Signal {
    /// The delta met the byte threshold; the idle timer was reset.
    Downloading { delta: i64, total: u64 },
    /// The delta stayed below the threshold.
    Idle { delta: i64, idle_for: Duration },
}

impl Signal {
    pub fn delta(&self) -> i64 {
        match *self {
            Signal::Downloading { delta, .. } | Signal::Idle { delta, .. } => delta,
        }
    }
}
