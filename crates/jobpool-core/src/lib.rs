pub mod config;
pub mod error;
pub mod job;

pub use config::{pool_size, JobPoolConfig, LoggingConfig, PoolConfig, DEFAULT_POOL_MULTIPLIER};
pub use error::{PoolError, Result};
pub use job::{blocking, job_fn, BlockingJob, BoxFuture, FnJob, Job};
