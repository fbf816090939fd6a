//! Diagnostic log setup: stderr always, plus an optional log file.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::error::{Result, WatchError};

/// Install the global subscriber.
///
/// `RUST_LOG` wins over the default level. The returned guard flushes the
/// file writer on drop and must be held until the program exits.
pub fn init(verbose: bool, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let stderr_layer = fmt::layer().with_target(false).with_writer(std::io::stderr);

    let Some(path) = log_file else {
        tracing_subscriber::registry()
            .with(filter)
            .with(stderr_layer)
            .try_init()
            .map_err(|e| WatchError::Logging(e.to_string()))?;
        return Ok(None);
    };

    let (dir, file_name) = split_log_path(path)?;
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name)
        .build(dir)
        .map_err(|e| WatchError::Logging(format!("cannot open {}: {}", path.display(), e)))?;
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(fmt::layer().with_ansi(false).with_writer(writer))
        .try_init()
        .map_err(|e| WatchError::Logging(e.to_string()))?;
    Ok(Some(guard))
}

/// Directory and file name of a log path; a bare name lives in `.`.
fn split_log_path(path: &Path) -> Result<(&Path, String)> {
    let file_name = path
        .file_name()
        .ok_or_else(|| WatchError::Logging(format!("{} has no file name", path.display())))?;
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    Ok((dir, file_name.to_string_lossy().into_owned()))
}
