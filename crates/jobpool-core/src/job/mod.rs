mod traits;

pub use traits::{blocking, job_fn, BlockingJob, BoxFuture, FnJob, Job};
