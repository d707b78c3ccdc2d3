//! Gateway trait — the contract between the dispatcher and whatever
//! actually hands SMS to the network.

use std::future::Future;

use serde::{Deserialize, Serialize};
use smsgate_core::Segment;

/// One outbound SMS as the gateway sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GatewayMessage {
    pub originator: String,
    pub recipients: Vec<String>,
    pub body: String,
    /// Hex user data header. Only set for parts of a concatenated message.
    pub udh: Option<String>,
}

impl From<Segment> for GatewayMessage {
    fn from(segment: Segment) -> Self {
        let udh = segment.udh();
        Self {
            originator: segment.originator,
            recipients: vec![segment.recipient],
            body: segment.body,
            udh,
        }
    }
}

/// Gateway acknowledgement. `id` is the gateway's message id when it
/// returns one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Ack {
    pub id: Option<String>,
}

/// Error entry reported by the gateway API.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ApiError {
    pub code: i64,
    pub description: String,
    #[serde(default)]
    pub parameter: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("gateway rejected message (HTTP {status}): {errors:?}")]
    Rejected { status: u16, errors: Vec<ApiError> },
    #[error("gateway request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Sends a single SMS. Called by the dispatcher, one call at a time.
///
/// No retry contract: an error means the segment is dropped.
pub trait GatewaySender: Send + Sync + 'static {
    fn send(&self, msg: &GatewayMessage) -> impl Future<Output = Result<Ack, GatewayError>> + Send;
}

/// Logs every segment instead of sending it. Used when no access key is
/// configured.
#[derive(Debug, Clone, Default)]
pub struct LogSender;

impl GatewaySender for LogSender {
    async fn send(&self, msg: &GatewayMessage) -> Result<Ack, GatewayError> {
        tracing::info!(
            originator = %msg.originator,
            recipients = ?msg.recipients,
            udh = msg.udh.as_deref().unwrap_or(""),
            body_chars = msg.body.chars().count(),
            "gateway disabled, segment logged"
        );
        Ok(Ack::default())
    }
}
