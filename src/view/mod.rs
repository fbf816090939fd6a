//! User-facing progress output, as text lines or JSON lines.
//!
//! Diagnostics go through `tracing` on stderr; this is the stdout stream a
//! user watches or a script parses.

mod shared;

use std::io::{self, Write};

use chrono::Local;
use serde::Serialize;
use tracing::warn;

use crate::config::Config;
use crate::model::{ProcessEntry, RunSummary, Signal};

pub use shared::{format_bytes, format_number};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// One line of output.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event<'a> {
    Started {
        process: &'a str,
        pid: u32,
        idle_time_limit_secs: u64,
        byte_threshold: u64,
        check_interval_secs: u64,
        dry_run: bool,
    },
    NotFound {
        process: &'a str,
    },
    Downloading {
        time: String,
        delta: i64,
        total: u64,
    },
    Idle {
        time: String,
        delta: i64,
        idle_secs: f64,
    },
    TimedOut {
        dry_run: bool,
    },
    RootExited,
    Summary {
        outcome: &'static str,
        ticks: u64,
        elapsed_secs: f64,
        last_total_bytes: u64,
    },
}

impl<'a> Event<'a> {
    pub fn started(root: &'a ProcessEntry, config: &Config) -> Self {
        Event::Started {
            process: &root.name,
            pid: root.pid.as_u32(),
            idle_time_limit_secs: config.idle_time_limit.as_secs(),
            byte_threshold: config.byte_threshold,
            check_interval_secs: config.check_interval.as_secs(),
            dry_run: config.dry_run,
        }
    }

    pub fn from_signal(signal: &Signal, time: String) -> Self {
        match *signal {
            Signal::Downloading { delta, total } => Event::Downloading { time, delta, total },
            Signal::Idle { delta, idle_for } => Event::Idle {
                time,
                delta,
                idle_secs: idle_for.as_secs_f64(),
            },
        }
    }

    pub fn summary(summary: &RunSummary) -> Self {
        Event::Summary {
            outcome: summary.outcome.as_str(),
            ticks: summary.ticks,
            elapsed_secs: summary.elapsed.as_secs_f64(),
            last_total_bytes: summary.last_total_bytes,
        }
    }
}

/// Render an event as a console line.
pub fn text_line(event: &Event<'_>) -> String {
    match event {
        Event::Started { process, pid, .. } => format!(
            "Monitoring {} (PID: {}) and all dynamic children for download activity...",
            process, pid
        ),
        Event::NotFound { process } => format!("Process {} not found.", process),
        Event::Downloading { time, delta, total } => format!(
            "[{}] Downloading... +{} (total: {} bytes)",
            time,
            format_bytes(delta.unsigned_abs()),
            format_number(*total)
        ),
        Event::Idle { time, delta, idle_secs } => format!(
            "[{}] Only {} bytes in last check, idle for {:.1} seconds.",
            time, delta, idle_secs
        ),
        Event::TimedOut { dry_run: false } => "Download finished. Shutting down...".to_string(),
        Event::TimedOut { dry_run: true } => {
            "Download finished. Dry run: shutdown skipped.".to_string()
        }
        Event::RootExited => "Main process closed.".to_string(),
        Event::Summary { outcome, ticks, elapsed_secs, .. } => format!(
            "Stopped after {} checks ({:.0}s): {}",
            ticks, elapsed_secs, outcome
        ),
    }
}

pub struct Presenter {
    out: Box<dyn Write>,
    format: OutputFormat,
}

impl Presenter {
    pub fn new(out: Box<dyn Write>, format: OutputFormat) -> Self {
        Self { out, format }
    }

    pub fn stdout(format: OutputFormat) -> Self {
        Self::new(Box::new(io::stdout()), format)
    }

    /// Discards everything.
    pub fn sink() -> Self {
        Self::new(Box::new(io::sink()), OutputFormat::Text)
    }

    /// Write one event. Output failures are logged, never fatal to the run.
    pub fn emit(&mut self, event: &Event<'_>) {
        let line = match self.format {
            OutputFormat::Text => text_line(event),
            OutputFormat::Json => match serde_json::to_string(event) {
                Ok(line) => line,
                Err(e) => {
                    warn!(error = %e, "failed to serialize output event");
                    return;
                }
            },
        };
        if let Err(e) = writeln!(self.out, "{}", line).and_then(|()| self.out.flush()) {
            warn!(error = %e, "failed to write output");
        }
    }

    pub fn signal(&mut self, signal: &Signal) {
        let time = Local::now().format("%H:%M:%S").to_string();
        self.emit(&Event::from_signal(signal, time));
    }
}
