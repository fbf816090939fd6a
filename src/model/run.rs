use std::fmt;
use std::time::Duration;

/// How a monitoring run ended without error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The root process exited before the tree went idle.
    RootExited,
    /// The idle limit was reached and the shutdown action was invoked.
    ShutdownIssued,
    /// The idle limit was reached under dry-run; nothing was invoked.
    DryRunCompleted,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::RootExited => "root_exited",
            Outcome::ShutdownIssued => "shutdown_issued",
            Outcome::DryRunCompleted => "dry_run_completed",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct RunSummary {
    pub outcome: Outcome,
    /// Loop iterations started, including the one that ended the run.
    pub ticks: u64,
    /// Monitoring time measured from the startup sample.
    pub elapsed: Duration,
    pub last_total_bytes: u64,
}
