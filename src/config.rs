//! Command-line surface and the immutable run configuration built from it.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::view::OutputFormat;

#[cfg(windows)]
pub const DEFAULT_PROCESS_NAME: &str = "chrome.exe";
#[cfg(not(windows))]
pub const DEFAULT_PROCESS_NAME: &str = "chrome";

pub const DEFAULT_IDLE_TIME_LIMIT_SECS: u64 = 30;
pub const DEFAULT_BYTE_THRESHOLD: u64 = 1024;
pub const DEFAULT_CHECK_INTERVAL_SECS: u64 = 2;

/// Watch a process tree for disk-read activity and shut the machine down
/// once it has stayed quiet for long enough.
#[derive(Parser, Debug)]
#[command(name = "idlewatch", version, about)]
pub struct Cli {
    /// Target process name (case-insensitive exact match)
    #[arg(long, default_value = DEFAULT_PROCESS_NAME)]
    pub process_name: String,

    /// Seconds without significant activity before shutting down
    #[arg(long, value_name = "SECS", default_value_t = DEFAULT_IDLE_TIME_LIMIT_SECS)]
    pub idle_time_limit: u64,

    /// Ignore read increases smaller than this many bytes
    #[arg(long, value_name = "BYTES", default_value_t = DEFAULT_BYTE_THRESHOLD)]
    pub byte_threshold: u64,

    /// Seconds between checks
    #[arg(
        long,
        value_name = "SECS",
        default_value_t = DEFAULT_CHECK_INTERVAL_SECS,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub check_interval: u64,

    /// Log the shutdown instead of performing it
    #[arg(long)]
    pub dry_run: bool,

    /// Print one JSON object per event instead of text lines
    #[arg(long)]
    pub json: bool,

    /// Also write diagnostic logs to this file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Debug-level diagnostics (per-process probe failures, tree sizes)
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn config(&self) -> Config {
        Config {
            process_name: self.process_name.clone(),
            idle_time_limit: Duration::from_secs(self.idle_time_limit),
            byte_threshold: self.byte_threshold,
            check_interval: Duration::from_secs(self.check_interval),
            dry_run: self.dry_run,
        }
    }

    pub fn output_format(&self) -> OutputFormat {
        if self.json { OutputFormat::Json } else { OutputFormat::Text }
    }
}

/// Settings fixed for the lifetime of one run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub process_name: String,
    pub idle_time_limit: Duration,
    pub byte_threshold: u64,
    pub check_interval: Duration,
    pub dry_run: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            process_name: DEFAULT_PROCESS_NAME.to_string(),
            idle_time_limit: Duration::from_secs(DEFAULT_IDLE_TIME_LIMIT_SECS),
            byte_threshold: DEFAULT_BYTE_THRESHOLD,
            check_interval: Duration::from_secs(DEFAULT_CHECK_INTERVAL_SECS),
            dry_run: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use clap::Parser;

    use super::{Cli, Config};
    use crate::view::OutputFormat;

    #[test]
    fn defaults_match_default_config() {
        let cli = Cli::try_parse_from(["idlewatch"]).unwrap();
        assert_eq!(cli.config(), Config::default());
        assert_eq!(cli.output_format(), OutputFormat::Text);
        assert!(cli.log_file.is_none());
    }

    #[test]
    fn flags_override_defaults() {
        let cli = Cli::try_parse_from([
            "idlewatch",
            "--process-name",
            "firefox",
            "--idle-time-limit",
            "120",
            "--byte-threshold",
            "0",
            "--check-interval",
            "5",
            "--dry-run",
            "--json",
        ])
        .unwrap();
        let config = cli.config();
        assert_eq!(config.process_name, "firefox");
        assert_eq!(config.idle_time_limit, Duration::from_secs(120));
        assert_eq!(config.byte_threshold, 0);
        assert_eq!(config.check_interval, Duration::from_secs(5));
        assert!(config.dry_run);
        assert_eq!(cli.output_format(), OutputFormat::Json);
    }

    #[test]
    fn zero_check_interval_is_rejected() {
        assert!(Cli::try_parse_from(["idlewatch", "--check-interval", "0"]).is_err());
    }

    #[test]
    fn zero_idle_limit_is_accepted() {
        let cli = Cli::try_parse_from(["idlewatch", "--idle-time-limit", "0"]).unwrap();
        assert_eq!(cli.config().idle_time_limit, Duration::ZERO);
    }
}
