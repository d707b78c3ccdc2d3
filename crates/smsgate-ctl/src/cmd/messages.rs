//! Message submission command.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::http::{base_url, post_json_body};

#[derive(Serialize)]
struct SubmitRequest<'a> {
    #[serde(rename = "Originator")]
    originator: &'a str,
    #[serde(rename = "Recipient")]
    recipient: i64,
    #[serde(rename = "Message")]
    message: &'a str,
}

#[derive(Deserialize)]
struct SubmitResponse {
    submission_id: String,
    segments: usize,
}

pub async fn cmd_send(port: u16, originator: &str, recipient: &str, message: &str) -> Result<()> {
    let recipient: i64 = recipient
        .parse()
        .map_err(|_| anyhow::anyhow!("recipient must be a number, got {:?}", recipient))?;

    let req = SubmitRequest {
        originator,
        recipient,
        message,
    };
    let resp: SubmitResponse =
        post_json_body(&format!("{}/messages", base_url(port)), &req).await?;

    println!("Message queued:");
    println!("  Submission : {}", resp.submission_id);
    println!("  Segments   : {}", resp.segments);

    Ok(())
}
