use std::future::Future;
use std::pin::Pin;

/// Boxed future returned by [`Job::execute`].
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A unit of work run by the pool.
///
/// All input must be bound into the job value when it is built. Execution
/// consumes the job; nothing is returned to the pool, so errors are the
/// job's own responsibility.
pub trait Job: Send + 'static {
    /// Execute the job.
    fn execute(self: Box<Self>) -> BoxFuture<'static, ()>;
}

/// Job backed by an async closure.
pub struct FnJob<F> {
    f: F,
}

impl<F, Fut> Job for FnJob<F>
where
    F: FnOnce() -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    fn execute(self: Box<Self>) -> BoxFuture<'static, ()> {
        Box::pin((self.f)())
    }
}

/// Wrap an async closure as a job.
pub fn job_fn<F, Fut>(f: F) -> FnJob<F>
where
    F: FnOnce() -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    FnJob { f }
}

/// Job backed by a synchronous closure, run on the blocking thread pool.
///
/// The worker stays busy until the closure returns. A panic inside the
/// closure is resumed on the worker, the same way an async job's panic
/// would surface.
pub struct BlockingJob<F> {
    f: F,
}

impl<F> Job for BlockingJob<F>
where
    F: FnOnce() + Send + 'static,
{
    fn execute(self: Box<Self>) -> BoxFuture<'static, ()> {
        let f = self.f;
        Box::pin(async move {
            match tokio::task::spawn_blocking(f).await {
                Ok(()) => {}
                Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
                Err(e) => {
                    tracing::warn!(error = %e, "Blocking job cancelled before completion");
                }
            }
        })
    }
}

/// Wrap a synchronous closure as a job.
pub fn blocking<F>(f: F) -> BlockingJob<F>
where
    F: FnOnce() + Send + 'static,
{
    BlockingJob { f }
}
