//! smsgate-services — outbound delivery: gateway clients, the bounded
//! segment queue and its rate-limited dispatcher.

pub mod dispatcher;
pub mod gateway;
pub mod messagebird;
pub mod queue;

pub use dispatcher::{DispatchStats, Dispatcher};
pub use gateway::{Ack, GatewayError, GatewayMessage, GatewaySender, LogSender};
pub use messagebird::MessageBirdSender;
pub use queue::{DeliveryQueue, PendingSegments, QueueError};
