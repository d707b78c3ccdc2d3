//! CLI command modules.

pub mod http;
pub mod measure;
pub mod messages;
pub mod status;
