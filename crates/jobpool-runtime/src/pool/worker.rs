use tokio::runtime::Handle;
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

use super::registry::ReadyHandle;

/// A single execution loop that runs at most one job at a time.
pub(crate) struct Worker {
    id: usize,
    ready: ReadyHandle,
}

impl Worker {
    /// Create a new worker advertising through `ready`.
    pub(crate) fn new(id: usize, ready: ReadyHandle) -> Self {
        Self { id, ready }
    }

    /// Spawn the worker loop on `runtime`, tracked by `tracker`.
    ///
    /// Consumes the worker: a stopped worker cannot be restarted.
    pub(crate) fn start(self, tracker: &TaskTracker, runtime: &Handle) -> WorkerHandle {
        let stop = CancellationToken::new();
        tracker.spawn_on(run(self.id, self.ready, stop.clone()), runtime);
        WorkerHandle { id: self.id, stop }
    }
}

/// Handle to a started worker.
pub(crate) struct WorkerHandle {
    id: usize,
    stop: CancellationToken,
}

impl WorkerHandle {
    /// Tell the worker to exit once it is idle.
    ///
    /// A job already delivered still runs to completion first.
    pub(crate) fn stop(&self) {
        tracing::debug!(worker_id = self.id, "Stopping worker");
        self.stop.cancel();
    }
}

async fn run(id: usize, ready: ReadyHandle, stop: CancellationToken) {
    tracing::debug!(worker_id = id, "Worker started");

    loop {
        let (slot, delivery) = oneshot::channel();
        if !ready.advertise(slot).await {
            break;
        }

        // A delivered job wins over a stop that arrives at the same time.
        tokio::select! {
            biased;
            delivered = delivery => match delivered {
                Ok(job) => {
                    tracing::debug!(worker_id = id, "Executing job");
                    job.execute().await;
                }
                Err(_) => break,
            },
            _ = stop.cancelled() => break,
        }
    }

    tracing::debug!(worker_id = id, "Worker stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::registry::readiness_registry;
    use jobpool_core::job_fn;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn test_worker_runs_delivered_jobs_and_readvertises() {
        let (ready, mut pool) = readiness_registry(1);
        let tracker = TaskTracker::new();
        let handle = Worker::new(0, ready).start(&tracker, &Handle::current());
        tracker.close();

        let counter = Arc::new(AtomicUsize::new(0));
        for _ in 0..3 {
            let slot = pool.next_idle().await.expect("worker idle");
            let c = counter.clone();
            let job = job_fn(move || async move {
                c.fetch_add(1, Ordering::SeqCst);
            });
            assert!(slot.send(Box::new(job)).is_ok());
        }

        // The worker only re-advertises after its last job has finished.
        let _ = pool.next_idle().await.expect("worker idle again");
        assert_eq!(counter.load(Ordering::SeqCst), 3);

        handle.stop();
        tokio::time::timeout(Duration::from_secs(1), tracker.wait())
            .await
            .expect("worker exits after stop");
    }

    #[tokio::test]
    async fn test_stop_waits_for_running_job() {
        let (ready, mut pool) = readiness_registry(1);
        let tracker = TaskTracker::new();
        let handle = Worker::new(0, ready).start(&tracker, &Handle::current());
        tracker.close();

        let finished = Arc::new(AtomicUsize::new(0));
        let f = finished.clone();
        let slot = pool.next_idle().await.unwrap();
        let job = job_fn(move || async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            f.fetch_add(1, Ordering::SeqCst);
        });
        assert!(slot.send(Box::new(job)).is_ok());

        handle.stop();
        tracker.wait().await;
        assert_eq!(finished.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_worker_exits_when_dispatcher_gone() {
        let (ready, pool) = readiness_registry(1);
        let tracker = TaskTracker::new();
        let _handle = Worker::new(0, ready).start(&tracker, &Handle::current());
        tracker.close();

        drop(pool);
        tokio::time::timeout(Duration::from_secs(1), tracker.wait())
            .await
            .expect("worker exits without a dispatcher");
    }
}
