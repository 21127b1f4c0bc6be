//! Error types for Horizon Gridkit.

use std::fmt;

/// The main error type for Horizon Gridkit operations.
#[derive(Debug, thiserror::Error)]
pub enum GridkitError {
    /// Worker-related error.
    #[error("Worker error: {0}")]
    Worker(#[from] WorkerError),

    /// Signal-related error.
    #[error("Signal error: {0}")]
    Signal(#[from] SignalError),

    /// Configuration could not be read or parsed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A layout contract was violated by the caller.
    #[error("Layout error: {0}")]
    Layout(String),

    /// Background search failed.
    #[error("Search error: {0}")]
    Search(String),
}

/// Worker-specific errors.
#[derive(Debug)]
pub enum WorkerError {
    /// The operating system refused to spawn the worker thread.
    SpawnFailed(std::io::Error),
    /// The worker has been stopped and no longer accepts tasks.
    Stopped,
    /// The task queue is full.
    QueueFull,
}

impl fmt::Display for WorkerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SpawnFailed(err) => write!(f, "Failed to spawn worker thread: {err}"),
            Self::Stopped => write!(f, "Worker has been stopped"),
            Self::QueueFull => write!(f, "Worker task queue is full"),
        }
    }
}

impl std::error::Error for WorkerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::SpawnFailed(err) => Some(err),
            _ => None,
        }
    }
}

/// Signal-specific errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignalError {
    /// The connection ID is invalid or has already been disconnected.
    InvalidConnection,
}

impl fmt::Display for SignalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConnection => write!(f, "Invalid or disconnected connection ID"),
        }
    }
}

impl std::error::Error for SignalError {}

/// A specialized Result type for Horizon Gridkit operations.
pub type Result<T> = std::result::Result<T, GridkitError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_worker_error_wraps() {
        let err: GridkitError = WorkerError::Stopped.into();
        assert_eq!(err.to_string(), "Worker error: Worker has been stopped");
    }

    #[test]
    fn test_spawn_failure_has_source() {
        let io = std::io::Error::other("no threads left");
        let err = WorkerError::SpawnFailed(io);
        assert!(std::error::Error::source(&err).is_some());
    }
}
