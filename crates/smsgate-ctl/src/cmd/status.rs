//! Daemon status command.

use anyhow::Result;
use serde::Deserialize;

use super::http::{base_url, get_json};

#[derive(Deserialize)]
struct StatusResponse {
    queue_capacity: usize,
    queue_depth: usize,
    sent: u64,
    failed: u64,
    send_interval_ms: u64,
}

pub async fn cmd_status(port: u16) -> Result<()> {
    let resp: StatusResponse = get_json(&format!("{}/status", base_url(port))).await?;

    println!("═══════════════════════════════════════");
    println!("  smsgated Status");
    println!("═══════════════════════════════════════");
    println!("  Queue depth    : {}/{}", resp.queue_depth, resp.queue_capacity);
    println!("  Segments sent  : {}", resp.sent);
    println!("  Send failures  : {}", resp.failed);
    if resp.send_interval_ms == 0 {
        println!("  Send interval  : unthrottled");
    } else {
        println!("  Send interval  : {} ms", resp.send_interval_ms);
    }

    Ok(())
}
