use jobpool_core::Job;
use tokio::sync::{mpsc, oneshot};

/// A job as it travels through the pool.
pub(crate) type BoxedJob = Box<dyn Job>;

/// Slot through which exactly one job reaches an idle worker.
pub(crate) type DeliverySlot = oneshot::Sender<BoxedJob>;

/// Create the readiness registry for a pool of `capacity` workers.
///
/// Each worker has at most one slot outstanding, so advertising never waits
/// for room.
pub(crate) fn readiness_registry(capacity: usize) -> (ReadyHandle, ReadyPool) {
    let (tx, rx) = mpsc::channel(capacity);
    (ReadyHandle { tx }, ReadyPool { rx })
}

/// Worker side of the registry.
#[derive(Clone)]
pub(crate) struct ReadyHandle {
    tx: mpsc::Sender<DeliverySlot>,
}

impl ReadyHandle {
    /// Publish a delivery slot. Returns false once the dispatcher is gone.
    pub(crate) async fn advertise(&self, slot: DeliverySlot) -> bool {
        self.tx.send(slot).await.is_ok()
    }
}

/// Dispatcher side of the registry.
pub(crate) struct ReadyPool {
    rx: mpsc::Receiver<DeliverySlot>,
}

impl ReadyPool {
    /// Wait for the next idle worker.
    ///
    /// Returns `None` when no worker is left to advertise.
    pub(crate) async fn next_idle(&mut self) -> Option<DeliverySlot> {
        self.rx.recv().await
    }
}
