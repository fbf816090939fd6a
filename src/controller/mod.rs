//! The monitoring loop: snapshot the tree, sample reads, feed the detector.

pub mod detector;
pub mod sampler;
pub mod tree;

use std::time::Instant;

use tracing::{debug, info, warn};

use crate::clock::Clock;
use crate::collectors::ProcessCollector;
use crate::config::Config;
use crate::error::{Result, WatchError};
use crate::model::{Outcome, RunSummary};
use crate::shutdown::ShutdownAction;
use crate::view::{Event, Presenter};

use detector::IdleDetector;

pub struct Monitor<C, S, K> {
    config: Config,
    collector: C,
    shutdown: S,
    clock: K,
    presenter: Presenter,
    ticks: u64,
}

impl<C, S, K> Monitor<C, S, K>
where
    C: ProcessCollector,
    S: ShutdownAction,
    K: Clock,
{
    pub fn new(config: Config, collector: C, shutdown: S, clock: K, presenter: Presenter) -> Self {
        Self {
            config,
            collector,
            shutdown,
            clock,
            presenter,
            ticks: 0,
        }
    }

    /// Run until the root process exits or the tree has been idle for the
    /// configured limit.
    ///
    /// Fails before the first tick if no process matches the configured
    /// name, and after the last one if the shutdown action fails.
    pub fn run(&mut self) -> Result<RunSummary> {
        let Some(root) = tree::locate(&mut self.collector, &self.config.process_name) else {
            self.presenter.emit(&Event::NotFound { process: &self.config.process_name });
            return Err(WatchError::process_not_found(&self.config.process_name));
        };
        info!(
            process = %root.name,
            pid = %root.pid,
            start_time = root.start_time,
            idle_limit = ?self.config.idle_time_limit,
            byte_threshold = self.config.byte_threshold,
            interval = ?self.config.check_interval,
            dry_run = self.config.dry_run,
            "monitoring process tree"
        );
        self.presenter.emit(&Event::started(&root, &self.config));

        let started_at = self.clock.now();
        let set = tree::snapshot(&mut self.collector, &root);
        let initial = sampler::sample(&mut self.collector, &set, started_at);
        let mut detector = IdleDetector::new(
            self.config.byte_threshold,
            self.config.idle_time_limit,
            &initial,
        );

        loop {
            self.ticks += 1;
            let set = tree::snapshot(&mut self.collector, &root);
            if set.is_empty() {
                info!(pid = %root.pid, tick = self.ticks, "main process closed");
                self.presenter.emit(&Event::RootExited);
                return Ok(self.finish(Outcome::RootExited, started_at, &detector));
            }

            let sample = sampler::sample(&mut self.collector, &set, self.clock.now());
            let signal = detector.step(&sample);
            debug!(
                tick = self.ticks,
                processes = set.len(),
                total = sample.total_read_bytes,
                delta = signal.delta(),
                "sampled process tree"
            );
            if signal.delta() < 0 {
                debug!(delta = signal.delta(), "read total dropped, a tracked process likely exited");
            }
            self.presenter.signal(&signal);

            if detector.is_timed_out() {
                let outcome = self.fire()?;
                return Ok(self.finish(outcome, started_at, &detector));
            }

            self.clock.sleep(self.config.check_interval);
        }
    }

    /// Invoke the terminal action, or only announce it under dry-run.
    fn fire(&mut self) -> Result<Outcome> {
        self.presenter.emit(&Event::TimedOut { dry_run: self.config.dry_run });
        if self.config.dry_run {
            info!("idle limit reached, dry run: not shutting down");
            return Ok(Outcome::DryRunCompleted);
        }
        info!("idle limit reached, shutting down");
        if let Err(e) = self.shutdown.shutdown_now() {
            warn!(error = %e, "shutdown action failed");
            return Err(e);
        }
        Ok(Outcome::ShutdownIssued)
    }

    fn finish(&mut self, outcome: Outcome, started_at: Instant, detector: &IdleDetector) -> RunSummary {
        let summary = RunSummary {
            outcome,
            ticks: self.ticks,
            elapsed: self.clock.now().saturating_duration_since(started_at),
            last_total_bytes: detector.state().last_total_bytes,
        };
        info!(%outcome, ticks = summary.ticks, elapsed = ?summary.elapsed, "monitor stopped");
        self.presenter.emit(&Event::summary(&summary));
        summary
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn collector(&self) -> &C {
        &self.collector
    }

    pub fn shutdown(&self) -> &S {
        &self.shutdown
    }

    pub fn clock(&self) -> &K {
        &self.clock
    }
}
