//! HTTP API handlers — message submission and daemon status.

pub mod messages;
pub mod status;

use std::time::Duration;

use smsgate_services::{DeliveryQueue, DispatchStats};

#[derive(Clone)]
pub struct ApiState {
    pub queue: DeliveryQueue,
    pub stats: DispatchStats,
    /// Longest a submission may wait for queue space before 429.
    pub enqueue_timeout: Duration,
    /// Reported by /status only; the dispatcher owns the real ticker.
    pub send_interval: Duration,
}

// Re-export handler functions for use in router setup.
pub use messages::handle_submit;
pub use status::handle_status;
