//! smsgate integration test harness.
//!
//! Each test runs the HTTP API on an ephemeral loopback port with a real
//! delivery queue. The gateway is replaced by a recorder, so nothing leaves
//! the machine:
//!
//!   cargo test --test integration

use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};

use smsgate_api::ApiState;
use smsgate_services::{
    Ack, DeliveryQueue, DispatchStats, GatewayError, GatewayMessage, GatewaySender,
    PendingSegments,
};

mod delivery;
mod submission;

// ── Harness ───────────────────────────────────────────────────────────────────

/// Stands in for the SMS gateway. Every call is kept and announced.
#[derive(Clone)]
pub struct RecordingGateway {
    sent: Arc<Mutex<Vec<GatewayMessage>>>,
    notify: mpsc::UnboundedSender<()>,
}

impl GatewaySender for RecordingGateway {
    async fn send(&self, msg: &GatewayMessage) -> Result<Ack, GatewayError> {
        self.sent
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(msg.clone());
        let _ = self.notify.send(());
        Ok(Ack {
            id: Some(format!("test-{}", msg.body.len())),
        })
    }
}

pub struct Options {
    pub capacity: usize,
    pub send_interval: Duration,
    pub enqueue_timeout: Duration,
    /// Without a dispatcher the queue only fills up.
    pub dispatch: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            capacity: 100,
            send_interval: Duration::from_millis(1),
            enqueue_timeout: Duration::from_millis(500),
            dispatch: true,
        }
    }
}

/// A running API plus everything needed to observe it.
pub struct TestGate {
    pub base_url: String,
    pub client: reqwest::Client,
    gateway: RecordingGateway,
    calls: mpsc::UnboundedReceiver<()>,
    shutdown: broadcast::Sender<()>,
    _held: Option<PendingSegments>,
}

impl TestGate {
    pub async fn start(opts: Options) -> Result<Self> {
        let (queue, pending) = DeliveryQueue::new(opts.capacity)?;
        let stats = DispatchStats::new();
        let (shutdown, _) = broadcast::channel(1);
        let (notify, calls) = mpsc::unbounded_channel();
        let gateway = RecordingGateway {
            sent: Arc::new(Mutex::new(Vec::new())),
            notify,
        };

        let held = if opts.dispatch {
            DeliveryQueue::start(
                pending,
                opts.send_interval,
                gateway.clone(),
                stats.clone(),
                shutdown.subscribe(),
            );
            None
        } else {
            Some(pending)
        };

        let state = ApiState {
            queue,
            stats,
            enqueue_timeout: opts.enqueue_timeout,
            send_interval: opts.send_interval,
        };
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .context("failed to bind test listener")?;
        let base_url = format!("http://{}", listener.local_addr()?);
        let rx = shutdown.subscribe();
        tokio::spawn(async move {
            if let Err(e) = smsgate_api::serve_on(listener, state, rx).await {
                eprintln!("test API failed: {e}");
            }
        });

        Ok(Self {
            base_url,
            client: reqwest::Client::new(),
            gateway,
            calls,
            shutdown,
            _held: held,
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// POST a JSON value to /messages.
    pub async fn submit(&self, body: &serde_json::Value) -> Result<reqwest::Response> {
        self.client
            .post(self.url("/messages"))
            .json(body)
            .send()
            .await
            .context("submit failed")
    }

    pub async fn status(&self) -> Result<serde_json::Value> {
        self.client
            .get(self.url("/status"))
            .send()
            .await
            .context("status failed")?
            .json()
            .await
            .context("status is not JSON")
    }

    /// Wait until the gateway has been called `n` more times.
    pub async fn wait_for_sends(&mut self, n: usize) -> Result<()> {
        for i in 0..n {
            match tokio::time::timeout(Duration::from_secs(5), self.calls.recv()).await {
                Ok(Some(())) => {}
                _ => bail!("gateway called {i} times, expected {n}"),
            }
        }
        Ok(())
    }

    pub fn sent(&self) -> Vec<GatewayMessage> {
        self.gateway
            .sent
            .lock()
            .map(|s| s.clone())
            .unwrap_or_default()
    }
}

impl Drop for TestGate {
    fn drop(&mut self) {
        let _ = self.shutdown.send(());
    }
}

/// A valid submission body.
pub fn request(originator: &str, recipient: i64, message: &str) -> serde_json::Value {
    serde_json::json!({
        "Originator": originator,
        "Recipient": recipient,
        "Message": message,
    })
}
