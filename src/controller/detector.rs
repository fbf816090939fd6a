//! Idle detection over successive activity samples.
//!
//! Each step compares the new total against the immediately preceding one.
//! A delta at or above the byte threshold resets the idle timer; anything
//! else (including a negative delta from an exited child) counts as idle.
//! Once the idle time reaches the limit the detector is `TimedOut` for good.

use std::time::Duration;

use crate::model::{ActivitySample, DetectorState, IdleState, Signal};

pub struct IdleDetector {
    byte_threshold: u64,
    idle_limit: Duration,
    state: IdleState,
    status: DetectorState,
}

impl IdleDetector {
    /// Start from the sample taken before the first tick.
    pub fn new(byte_threshold: u64, idle_limit: Duration, initial: &ActivitySample) -> Self {
        Self {
            byte_threshold,
            idle_limit,
            state: IdleState {
                last_total_bytes: initial.total_read_bytes,
                last_active_at: initial.timestamp,
            },
            status: DetectorState::Active,
        }
    }

    pub fn step(&mut self, sample: &ActivitySample) -> Signal {
        let delta = signed_delta(sample.total_read_bytes, self.state.last_total_bytes);
        self.state.last_total_bytes = sample.total_read_bytes;

        if delta >= threshold_as_delta(self.byte_threshold) {
            self.state.last_active_at = sample.timestamp;
            return Signal::Downloading { delta, total: sample.total_read_bytes };
        }

        let idle_for = sample.timestamp.saturating_duration_since(self.state.last_active_at);
        if idle_for >= self.idle_limit {
            self.status = DetectorState::TimedOut;
        }
        Signal::Idle { delta, idle_for }
    }

    pub fn status(&self) -> DetectorState {
        self.status
    }

    pub fn is_timed_out(&self) -> bool {
        self.status == DetectorState::TimedOut
    }

    pub fn state(&self) -> IdleState {
        self.state
    }
}

/// `current - previous` as a signed value, saturating at the `i64` bounds.
fn signed_delta(current: u64, previous: u64) -> i64 {
    if current >= previous {
        i64::try_from(current - previous).unwrap_or(i64::MAX)
    } else {
        i64::try_from(previous - current).map_or(i64::MIN, |d| -d)
    }
}

fn threshold_as_delta(threshold: u64) -> i64 {
    i64::try_from(threshold).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::{signed_delta, IdleDetector};
    use crate::model::{ActivitySample, DetectorState, Signal};

    fn secs(n: u64) -> Duration {
        Duration::from_secs(n)
    }

    fn at(t0: Instant, offset: u64, total: u64) -> ActivitySample {
        ActivitySample::new(total, t0 + secs(offset))
    }

    #[test]
    fn delta_is_signed() {
        assert_eq!(signed_delta(10, 4), 6);
        assert_eq!(signed_delta(4, 10), -6);
        assert_eq!(signed_delta(u64::MAX, 0), i64::MAX);
        assert_eq!(signed_delta(0, u64::MAX), i64::MIN);
    }

    #[test]
    fn delta_at_threshold_counts_as_activity() {
        let t0 = Instant::now();
        let mut d = IdleDetector::new(1024, secs(10), &at(t0, 0, 0));
        let signal = d.step(&at(t0, 2, 1024));
        assert_eq!(signal, Signal::Downloading { delta: 1024, total: 1024 });
        assert_eq!(d.state().last_active_at, t0 + secs(2));
    }

    #[test]
    fn delta_below_threshold_is_idle() {
        let t0 = Instant::now();
        let mut d = IdleDetector::new(1024, secs(10), &at(t0, 0, 0));
        let signal = d.step(&at(t0, 2, 1023));
        assert_eq!(signal, Signal::Idle { delta: 1023, idle_for: secs(2) });
        assert_eq!(d.status(), DetectorState::Active);
    }

    #[test]
    fn negative_delta_is_idle_not_clamped() {
        let t0 = Instant::now();
        let mut d = IdleDetector::new(0, secs(10), &at(t0, 0, 5_000));
        let signal = d.step(&at(t0, 2, 3_000));
        assert_eq!(signal, Signal::Idle { delta: -2_000, idle_for: secs(2) });
        assert_eq!(d.state().last_total_bytes, 3_000);
    }

    #[test]
    fn idle_exactly_at_limit_times_out() {
        let t0 = Instant::now();
        let mut d = IdleDetector::new(1024, secs(4), &at(t0, 0, 0));
        d.step(&at(t0, 2, 0));
        assert!(!d.is_timed_out());
        d.step(&at(t0, 4, 0));
        assert!(d.is_timed_out());
    }

    #[test]
    fn zero_limit_times_out_on_first_idle_tick() {
        let t0 = Instant::now();
        let mut d = IdleDetector::new(1024, Duration::ZERO, &at(t0, 0, 0));
        d.step(&at(t0, 0, 0));
        assert!(d.is_timed_out());
    }

    #[test]
    fn zero_threshold_never_goes_idle_on_flat_totals() {
        let t0 = Instant::now();
        let mut d = IdleDetector::new(0, Duration::ZERO, &at(t0, 0, 7));
        for tick in 1..50 {
            let signal = d.step(&at(t0, tick * 2, 7));
            assert!(matches!(signal, Signal::Downloading { delta: 0, .. }));
        }
        assert!(!d.is_timed_out());
    }

    #[test]
    fn last_total_always_tracks_previous_sample() {
        let t0 = Instant::now();
        let mut d = IdleDetector::new(1000, secs(1_000), &at(t0, 0, 0));
        let totals = [5_000u64, 5_100, 4_000, 9_000, 9_000, 8_999, 20_000];
        let mut previous = 0u64;
        for (i, &total) in totals.iter().enumerate() {
            let signal = d.step(&at(t0, (i as u64 + 1) * 2, total));
            assert_eq!(signal.delta(), total as i64 - previous as i64);
            assert_eq!(d.state().last_total_bytes, total);
            previous = total;
        }
    }

    #[test]
    fn idle_time_counts_from_last_active_tick() {
        let t0 = Instant::now();
        let mut d = IdleDetector::new(100, secs(60), &at(t0, 0, 0));
        d.step(&at(t0, 2, 500));
        assert_eq!(d.step(&at(t0, 4, 500)), Signal::Idle { delta: 0, idle_for: secs(2) });
        assert_eq!(d.step(&at(t0, 6, 550)), Signal::Idle { delta: 50, idle_for: secs(4) });
        d.step(&at(t0, 8, 1_000));
        assert_eq!(d.step(&at(t0, 10, 1_000)), Signal::Idle { delta: 0, idle_for: secs(2) });
    }

    #[test]
    fn activity_inside_window_prevents_timeout() {
        let t0 = Instant::now();
        let mut d = IdleDetector::new(100, secs(6), &at(t0, 0, 0));
        let mut total = 0;
        for tick in 1..=20u64 {
            // burst every third tick keeps idle time at most 4s
            if tick % 3 == 0 {
                total += 100;
            }
            d.step(&at(t0, tick * 2, total));
            assert!(!d.is_timed_out(), "timed out at tick {tick}");
        }
    }

    #[test]
    fn timeout_is_terminal() {
        let t0 = Instant::now();
        let mut d = IdleDetector::new(10, secs(2), &at(t0, 0, 0));
        d.step(&at(t0, 2, 0));
        assert!(d.is_timed_out());
        d.step(&at(t0, 4, 1_000_000));
        assert_eq!(d.status(), DetectorState::TimedOut);
    }
}
