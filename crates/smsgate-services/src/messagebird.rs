//! MessageBird REST client.
//!
//! `POST {endpoint}/messages` with `Authorization: AccessKey <key>`.
//! Concatenation headers travel in `typeDetails.udh`.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::gateway::{Ack, ApiError, GatewayError, GatewayMessage, GatewaySender};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct NewMessage<'a> {
    originator: &'a str,
    recipients: &'a [String],
    body: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    type_details: Option<TypeDetails<'a>>,
}

#[derive(Serialize)]
struct TypeDetails<'a> {
    udh: &'a str,
}

#[derive(Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    errors: Vec<ApiError>,
}

#[derive(Clone)]
pub struct MessageBirdSender {
    client: reqwest::Client,
    messages_url: String,
    access_key: String,
}

impl MessageBirdSender {
    pub fn new(
        endpoint: &str,
        access_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            messages_url: format!("{}/messages", endpoint.trim_end_matches('/')),
            access_key: access_key.into(),
        })
    }
}

fn request_body(msg: &GatewayMessage) -> NewMessage<'_> {
    NewMessage {
        originator: &msg.originator,
        recipients: &msg.recipients,
        body: &msg.body,
        type_details: msg.udh.as_deref().map(|udh| TypeDetails { udh }),
    }
}

impl GatewaySender for MessageBirdSender {
    async fn send(&self, msg: &GatewayMessage) -> Result<Ack, GatewayError> {
        let resp = self
            .client
            .post(&self.messages_url)
            .header(reqwest::header::AUTHORIZATION, format!("AccessKey {}", self.access_key))
            .json(&request_body(msg))
            .send()
            .await?;

        let status = resp.status();
        if status.is_success() {
            return Ok(resp.json::<Ack>().await?);
        }

        // The error body is best effort; the status code alone is enough.
        let errors = resp
            .json::<ErrorResponse>()
            .await
            .map(|e| e.errors)
            .unwrap_or_default();
        Err(GatewayError::Rejected {
            status: status.as_u16(),
            errors,
        })
    }
}
