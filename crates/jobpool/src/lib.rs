//! jobpool - a bounded worker pool for tokio applications.
//!
//! A fixed number of workers pull jobs from a shared queue and run them one
//! at a time, with a stop barrier that waits for every in-flight job.

mod logging;

#[doc(hidden)]
pub use jobpool_core;
#[doc(hidden)]
pub use jobpool_runtime;

pub use jobpool_core::{JobPoolConfig, PoolError, Result};
pub use jobpool_runtime::JobQueue;
pub use logging::init_logging;

/// Prelude module for common imports.
pub mod prelude {
    pub use jobpool_core::config::{
        pool_size, JobPoolConfig, LoggingConfig, PoolConfig, DEFAULT_POOL_MULTIPLIER,
    };
    pub use jobpool_core::error::{PoolError, Result};
    pub use jobpool_core::job::{blocking, job_fn, BoxFuture, Job};
    pub use jobpool_runtime::JobQueue;
}
