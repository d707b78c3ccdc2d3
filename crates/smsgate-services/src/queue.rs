//! Delivery queue — bounded FIFO of segments waiting for the dispatcher.
//!
//! Producers hold cheap clones of [`DeliveryQueue`]. The consumer half,
//! [`PendingSegments`], cannot be cloned, so at most one dispatcher can
//! ever drain a queue.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;

use smsgate_core::Segment;

use crate::dispatcher::{DispatchStats, Dispatcher};
use crate::gateway::GatewaySender;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueueError {
    #[error("queue capacity must be at least 1")]
    ZeroCapacity,
    #[error("{len} segments can never fit a queue of {capacity}")]
    BatchTooLarge { len: usize, capacity: usize },
    #[error("timed out waiting for queue space")]
    Timeout,
    #[error("dispatcher is gone")]
    Closed,
}

#[derive(Clone)]
pub struct DeliveryQueue {
    tx: mpsc::Sender<Segment>,
    /// Held while reserved permits are turned into sends. Reservation alone
    /// does not order the writes of concurrent producers.
    write: Arc<Mutex<()>>,
}

/// Consumer half of a [`DeliveryQueue`].
pub struct PendingSegments {
    rx: mpsc::Receiver<Segment>,
}

impl PendingSegments {
    /// Next segment in FIFO order. `None` once every producer is dropped and
    /// the queue is drained.
    pub async fn recv(&mut self) -> Option<Segment> {
        self.rx.recv().await
    }
}

impl DeliveryQueue {
    pub fn new(capacity: usize) -> Result<(Self, PendingSegments), QueueError> {
        if capacity == 0 {
            return Err(QueueError::ZeroCapacity);
        }
        let (tx, rx) = mpsc::channel(capacity);
        let queue = Self {
            tx,
            write: Arc::new(Mutex::new(())),
        };
        Ok((queue, PendingSegments { rx }))
    }

    /// Spawn the single dispatcher for this queue.
    pub fn start<S: GatewaySender>(
        pending: PendingSegments,
        send_interval: Duration,
        sender: S,
        stats: DispatchStats,
        shutdown: broadcast::Receiver<()>,
    ) -> JoinHandle<()> {
        tokio::spawn(Dispatcher::new(pending, sender, send_interval, stats, shutdown).run())
    }

    pub fn capacity(&self) -> usize {
        self.tx.max_capacity()
    }

    /// Segments queued or reserved right now.
    pub fn len(&self) -> usize {
        self.tx.max_capacity() - self.tx.capacity()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Append at the tail, waiting as long as the queue is full.
    pub async fn enqueue(&self, segment: Segment) -> Result<(), QueueError> {
        let permit = self.tx.reserve().await.map_err(|_| QueueError::Closed)?;
        let _write = self.write.lock().unwrap_or_else(|e| e.into_inner());
        permit.send(segment);
        Ok(())
    }

    /// Like [`enqueue`](Self::enqueue) but gives up after `timeout`.
    pub async fn enqueue_timeout(
        &self,
        segment: Segment,
        timeout: Duration,
    ) -> Result<(), QueueError> {
        let permit = tokio::time::timeout(timeout, self.tx.reserve())
            .await
            .map_err(|_| QueueError::Timeout)?
            .map_err(|_| QueueError::Closed)?;
        let _write = self.write.lock().unwrap_or_else(|e| e.into_inner());
        permit.send(segment);
        Ok(())
    }

    /// Queue every segment of one submission, or none of them.
    ///
    /// Slots for the whole batch are reserved before anything is written, so
    /// the segments land contiguously and in order. On timeout the queue is
    /// left untouched.
    pub async fn enqueue_all(
        &self,
        segments: Vec<Segment>,
        timeout: Duration,
    ) -> Result<(), QueueError> {
        let capacity = self.capacity();
        if segments.len() > capacity {
            return Err(QueueError::BatchTooLarge {
                len: segments.len(),
                capacity,
            });
        }
        if segments.is_empty() {
            return Ok(());
        }

        let permits = tokio::time::timeout(timeout, self.tx.reserve_many(segments.len()))
            .await
            .map_err(|_| QueueError::Timeout)?
            .map_err(|_| QueueError::Closed)?;

        let _write = self.write.lock().unwrap_or_else(|e| e.into_inner());
        for (permit, segment) in permits.zip(segments) {
            permit.send(segment);
        }
        Ok(())
    }
}
