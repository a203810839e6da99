use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use jobpool_core::{Job, PoolConfig, PoolError, Result};
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio_util::sync::{CancellationToken, DropGuard};
use tokio_util::task::TaskTracker;

use super::registry::{readiness_registry, BoxedJob, ReadyPool};
use super::worker::{Worker, WorkerHandle};

/// Fixed-size pool of workers fed through a single dispatcher.
///
/// Submissions are best-effort: once the queue is stopped, submitted jobs are
/// dropped without error. [`JobQueue::stop`] is a barrier that returns only
/// after every accepted job has finished and every worker has exited.
pub struct JobQueue {
    worker_count: usize,
    submissions: mpsc::Sender<BoxedJob>,
    stopped: AtomicBool,
    state: Mutex<State>,
    released: CancellationToken,
}

enum State {
    Idle {
        submissions: mpsc::Receiver<BoxedJob>,
        ready: ReadyPool,
        workers: Vec<Worker>,
    },
    Running {
        shutdown: CancellationToken,
    },
    Stopped,
}

impl JobQueue {
    /// Create a queue with a fixed number of workers.
    pub fn new(worker_count: usize) -> Result<Self> {
        if worker_count == 0 {
            return Err(PoolError::InvalidWorkerCount(worker_count));
        }

        // One in-flight slot between submitters and the dispatcher.
        let (submissions, submission_rx) = mpsc::channel(1);
        let (ready, ready_pool) = readiness_registry(worker_count);
        let workers = (0..worker_count)
            .map(|id| Worker::new(id, ready.clone()))
            .collect();

        Ok(Self {
            worker_count,
            submissions,
            stopped: AtomicBool::new(true),
            state: Mutex::new(State::Idle {
                submissions: submission_rx,
                ready: ready_pool,
                workers,
            }),
            released: CancellationToken::new(),
        })
    }

    /// Create a queue from configuration.
    pub fn from_config(config: &PoolConfig) -> Result<Self> {
        Self::new(config.workers)
    }

    /// Number of workers in the pool.
    pub fn worker_count(&self) -> usize {
        self.worker_count
    }

    /// Start the workers and the dispatcher on the current tokio runtime.
    pub fn start(&self) -> Result<()> {
        let runtime = Handle::try_current().map_err(|_| PoolError::NoRuntime)?;

        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let (submissions, ready, workers) = match std::mem::replace(&mut *state, State::Stopped) {
            State::Idle {
                submissions,
                ready,
                workers,
            } => (submissions, ready, workers),
            running @ State::Running { .. } => {
                *state = running;
                return Err(PoolError::AlreadyStarted);
            }
            State::Stopped => return Err(PoolError::Stopped),
        };

        let tracker = TaskTracker::new();
        let workers = workers
            .into_iter()
            .map(|worker| worker.start(&tracker, &runtime))
            .collect();
        tracker.close();

        let shutdown = CancellationToken::new();
        let dispatcher = Dispatcher {
            submissions,
            ready,
            workers,
            tracker,
            shutdown: shutdown.clone(),
            _released: self.released.clone().drop_guard(),
        };
        runtime.spawn(dispatcher.run());

        *state = State::Running { shutdown };
        self.stopped.store(false, Ordering::Release);

        tracing::info!(workers = self.worker_count, "Job queue started");
        Ok(())
    }

    /// Submit a job.
    ///
    /// Waits until the dispatcher has room for the job. If the queue is not
    /// running, or stops while waiting, the job is dropped silently.
    pub async fn submit<J: Job>(&self, job: J) {
        if self.stopped() {
            tracing::debug!("Job queue not running, dropping job");
            return;
        }

        if self.submissions.send(Box::new(job)).await.is_err() {
            tracing::debug!("Job queue closed, dropping job");
        }
    }

    /// Stop the queue and wait for every worker to exit.
    ///
    /// Jobs already accepted still run. Repeated and concurrent calls all
    /// wait on the same barrier. Dropping the returned future does not
    /// abort the teardown.
    pub async fn stop(&self) {
        {
            let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            self.stopped.store(true, Ordering::Release);

            match std::mem::replace(&mut *state, State::Stopped) {
                State::Running { shutdown } => {
                    tracing::info!("Stopping job queue");
                    shutdown.cancel();
                }
                State::Idle { .. } => self.released.cancel(),
                State::Stopped => {}
            }
        }

        self.released.cancelled().await;
    }

    /// Whether the queue currently drops submissions.
    pub fn stopped(&self) -> bool {
        self.stopped.load(Ordering::Acquire)
    }
}

/// Pairs submitted jobs with idle workers and owns the teardown sequence.
struct Dispatcher {
    submissions: mpsc::Receiver<BoxedJob>,
    ready: ReadyPool,
    workers: Vec<WorkerHandle>,
    tracker: TaskTracker,
    shutdown: CancellationToken,
    // Releases `stop` callers when the dispatcher ends, even by unwinding.
    _released: DropGuard,
}

impl Dispatcher {
    async fn run(mut self) {
        loop {
            let next = tokio::select! {
                job = self.submissions.recv() => job,
                _ = self.shutdown.cancelled() => None,
            };
            match next {
                Some(job) => self.dispatch(job).await,
                None => break,
            }
        }

        // Jobs that already made it into the submission slot still run.
        self.submissions.close();
        while let Some(job) = self.submissions.recv().await {
            self.dispatch(job).await;
        }

        for worker in &self.workers {
            worker.stop();
        }
        self.tracker.wait().await;

        tracing::info!(workers = self.workers.len(), "Job queue stopped");
    }

    async fn dispatch(&mut self, job: BoxedJob) {
        match self.ready.next_idle().await {
            Some(slot) => {
                if slot.send(job).is_err() {
                    tracing::warn!("Worker exited before delivery, job dropped");
                }
            }
            None => {
                tracing::warn!("No workers left in the pool, job dropped");
            }
        }
    }
}
