use thiserror::Error;

/// Core error type for job pool operations.
#[derive(Error, Debug)]
pub enum PoolError {
    #[error("Invalid worker count: {0} (must be at least 1)")]
    InvalidWorkerCount(usize),

    #[error("Job queue already started")]
    AlreadyStarted,

    #[error("Job queue stopped and cannot be restarted")]
    Stopped,

    #[error("No tokio runtime available to run the job queue")]
    NoRuntime,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using PoolError.
pub type Result<T> = std::result::Result<T, PoolError>;
