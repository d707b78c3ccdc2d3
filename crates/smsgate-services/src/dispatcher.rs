//! Dispatcher — drains the delivery queue at a fixed rate.
//!
//! The head segment is taken from the queue and held until the send interval
//! has elapsed since the previous send, then handed to the gateway. Idle
//! time is never banked, so sends are always at least one interval apart.
//! Only one send is ever in flight. A failed send is
//! logged and the segment dropped; there is no retry.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;

use smsgate_core::Segment;

use crate::gateway::{GatewayError, GatewayMessage, GatewaySender};
use crate::queue::PendingSegments;

/// Dispatch counters shared with the status endpoint.
#[derive(Clone, Default)]
pub struct DispatchStats {
    sent: Arc<AtomicU64>,
    failed: Arc<AtomicU64>,
}

impl DispatchStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> u64 {
        self.sent.load(Ordering::Relaxed)
    }

    pub fn failed(&self) -> u64 {
        self.failed.load(Ordering::Relaxed)
    }

    fn record_sent(&self) {
        self.sent.fetch_add(1, Ordering::Relaxed);
    }

    fn record_failed(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Log counters, if anything has been dispatched yet.
    pub fn log_stats(&self) {
        let (sent, failed) = (self.sent(), self.failed());
        if sent > 0 || failed > 0 {
            tracing::info!(sent, failed, "dispatch stats");
        }
    }
}

pub struct Dispatcher<S> {
    pending: PendingSegments,
    sender: S,
    send_interval: Duration,
    stats: DispatchStats,
    shutdown: broadcast::Receiver<()>,
}

impl<S: GatewaySender> Dispatcher<S> {
    pub fn new(
        pending: PendingSegments,
        sender: S,
        send_interval: Duration,
        stats: DispatchStats,
        shutdown: broadcast::Receiver<()>,
    ) -> Self {
        Self {
            pending,
            sender,
            send_interval,
            stats,
            shutdown,
        }
    }

    pub async fn run(mut self) {
        // Zero interval = unthrottled.
        let mut ticker = (!self.send_interval.is_zero())
            .then(|| tokio::time::interval(self.send_interval));
        tracing::info!(
            send_interval_ms = u64::try_from(self.send_interval.as_millis()).unwrap_or(u64::MAX),
            "dispatcher started"
        );

        loop {
            let segment = tokio::select! {
                _ = self.shutdown.recv() => {
                    tracing::info!("dispatcher shutting down");
                    return;
                }
                segment = self.pending.recv() => match segment {
                    Some(s) => s,
                    None => {
                        tracing::info!("all producers dropped, dispatcher exiting");
                        return;
                    }
                },
            };

            if let Some(ticker) = ticker.as_mut() {
                tokio::select! {
                    _ = self.shutdown.recv() => {
                        tracing::info!(
                            udh = segment.udh().as_deref().unwrap_or(""),
                            "dispatcher shutting down, held segment not sent"
                        );
                        return;
                    }
                    _ = ticker.tick() => {}
                }
                // A late tick would otherwise leave the next one already due.
                ticker.reset();
            }

            self.deliver(segment).await;
        }
    }

    async fn deliver(&self, segment: Segment) {
        let msg = GatewayMessage::from(segment);

        match self.sender.send(&msg).await {
            Ok(ack) => {
                self.stats.record_sent();
                tracing::debug!(
                    id = ack.id.as_deref().unwrap_or(""),
                    udh = msg.udh.as_deref().unwrap_or(""),
                    "segment sent"
                );
            }
            Err(GatewayError::Rejected { status, errors }) => {
                self.stats.record_failed();
                for e in &errors {
                    tracing::warn!(
                        code = e.code,
                        description = %e.description,
                        parameter = e.parameter.as_deref().unwrap_or(""),
                        "gateway error"
                    );
                }
                tracing::warn!(status, udh = msg.udh.as_deref().unwrap_or(""), "segment dropped");
            }
            Err(e) => {
                self.stats.record_failed();
                tracing::error!(error = %e, "failed to send segment, unrecoverable");
            }
        }
    }
}
