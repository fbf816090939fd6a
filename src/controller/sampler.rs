//! Aggregate read-byte sampling over a process set.

use std::time::Instant;

use tracing::debug;

use crate::collectors::ProcessCollector;
use crate::model::{ActivitySample, ProcessSet};

/// Sum the cumulative read counters of every process in `set`.
///
/// A process that has exited or denies access contributes nothing; one bad
/// handle never fails the whole sample.
pub fn total_read_bytes<C: ProcessCollector + ?Sized>(collector: &mut C, set: &ProcessSet) -> u64 {
    set.iter().fold(0u64, |total, pid| match collector.cumulative_read_bytes(pid) {
        Ok(bytes) => total.saturating_add(bytes),
        Err(err) => {
            debug!(%pid, error = %err, "skipping process in sample");
            total
        }
    })
}

pub fn sample<C: ProcessCollector + ?Sized>(
    collector: &mut C,
    set: &ProcessSet,
    now: Instant,
) -> ActivitySample {
    ActivitySample::new(total_read_bytes(collector, set), now)
}
