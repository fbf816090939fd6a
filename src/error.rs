//! Error types for a monitoring run.

/// Result type alias for monitoring operations.
pub type Result<T> = std::result::Result<T, WatchError>;

/// Errors that end a run with a failure exit code.
///
/// Per-process probe failures are not represented here; they are absorbed
/// by the tracker and sampler and never reach the driver loop.
#[derive(Debug, thiserror::Error)]
pub enum WatchError {
    /// No running process matched the configured name at startup.
    #[error("process {name} not found")]
    ProcessNotFound { name: String },

    /// The shutdown command could not be run or reported failure.
    #[error("shutdown failed: {0}")]
    Shutdown(String),

    /// Logging could not be initialised.
    #[error("logging setup failed: {0}")]
    Logging(String),
}

impl WatchError {
    pub fn process_not_found(name: impl Into<String>) -> Self {
        Self::ProcessNotFound { name: name.into() }
    }

    pub fn shutdown(msg: impl Into<String>) -> Self {
        Self::Shutdown(msg.into())
    }
}
