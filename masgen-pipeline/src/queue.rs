//! Bounded queue of candidate scenarios.
//!
//! A fixed-size pool of distinct candidates is produced before consumption
//! begins; the queue itself is a plain bounded ordered buffer with
//! blocking-on-full/empty semantics. Uniqueness of buffered candidates is
//! the generator's responsibility, not the queue's.

use masgen_core::ScenarioSpec;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

/// Bounded FIFO buffer of scenario candidates.
#[derive(Debug)]
pub struct ScenarioQueue {
    capacity: usize,
    tx: mpsc::Sender<ScenarioSpec>,
    rx: tokio::sync::Mutex<mpsc::Receiver<ScenarioSpec>>,
}

impl ScenarioQueue {
    /// Create a queue holding at most `capacity` candidates (at least 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (tx, rx) = mpsc::channel(capacity);
        Self {
            capacity,
            tx,
            rx: tokio::sync::Mutex::new(rx),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Append a candidate, waiting while the queue is full.
    pub async fn push(&self, spec: ScenarioSpec) -> Result<(), QueueClosed> {
        self.tx.send(spec).await.map_err(|_| QueueClosed)
    }

    /// Append a candidate without waiting; fails when the queue is full.
    pub fn try_push(&self, spec: ScenarioSpec) -> Result<(), TrySendError<ScenarioSpec>> {
        self.tx.try_send(spec)
    }

    /// Take the oldest candidate, waiting while the queue is empty.
    pub async fn pop(&self) -> Option<ScenarioSpec> {
        self.rx.lock().await.recv().await
    }
}

/// The queue's receiving half was dropped.
#[derive(Debug, thiserror::Error)]
#[error("Scenario queue closed")]
pub struct QueueClosed;
