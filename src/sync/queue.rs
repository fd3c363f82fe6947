//! In-process task queue between the orchestrator and the fetch workers.
//!
//! Delivery is at-most-once: a dequeued task is handled by exactly one worker and is
//! never redelivered, even when handling fails. Tasks are dequeued in dispatch order.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;

use crate::error::SyncError;
use crate::types::SyncTask;

use super::fetch::FetchProcessor;

#[async_trait]
pub trait TaskDispatcher: Send + Sync {
    async fn dispatch(&self, task: SyncTask) -> Result<(), SyncError>;
}

#[derive(Clone)]
pub struct SyncQueue {
    tx: mpsc::Sender<SyncTask>,
}

pub struct SyncQueueReceiver {
    rx: mpsc::Receiver<SyncTask>,
}

pub fn sync_queue(capacity: usize) -> (SyncQueue, SyncQueueReceiver) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (SyncQueue { tx }, SyncQueueReceiver { rx })
}

#[async_trait]
impl TaskDispatcher for SyncQueue {
    async fn dispatch(&self, task: SyncTask) -> Result<(), SyncError> {
        self.tx.send(task).await.map_err(|_| SyncError::QueueClosed)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerStats {
    pub succeeded: u64,
    pub failed: u64,
}

pub struct SyncWorkers {
    handles: Vec<JoinHandle<WorkerStats>>,
}

impl SyncWorkers {
    /// Workers exit once every `SyncQueue` clone is dropped and the queue is drained.
    pub fn spawn(workers: usize, receiver: SyncQueueReceiver, processor: FetchProcessor) -> Self {
        let rx = Arc::new(Mutex::new(receiver.rx));
        let handles = (0..workers.max(1))
            .map(|worker| tokio::spawn(worker_loop(worker, rx.clone(), processor.clone())))
            .collect();
        Self { handles }
    }

    pub async fn join(self) -> WorkerStats {
        let mut total = WorkerStats::default();
        for res in futures::future::join_all(self.handles).await {
            match res {
                Ok(s) => {
                    total.succeeded += s.succeeded;
                    total.failed += s.failed;
                }
                Err(e) => tracing::error!(error = %e, "sync worker aborted"),
            }
        }
        total
    }
}

async fn worker_loop(
    worker: usize,
    rx: Arc<Mutex<mpsc::Receiver<SyncTask>>>,
    processor: FetchProcessor,
) -> WorkerStats {
    let mut stats = WorkerStats::default();
    loop {
        // lock only for the dequeue
        let task = rx.lock().await.recv().await;
        let Some(task) = task else { break };

        match processor.handle(task).await {
            Ok(_) => stats.succeeded += 1,
            Err(e) => {
                stats.failed += 1;
                tracing::error!(
                    worker,
                    marketplace = %task.marketplace,
                    error = %e,
                    "sync task failed"
                );
            }
        }
    }
    tracing::debug!(worker, succeeded = stats.succeeded, failed = stats.failed, "sync worker stopped");
    stats
}
