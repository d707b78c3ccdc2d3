//! Submission requests and their validation.
//!
//! Validation errors carry static text only. They are returned to the HTTP
//! client verbatim, so nothing from the request may leak into them.

use serde::{Deserialize, Serialize};

use crate::assemble::MAX_MESSAGE_LEN;
use crate::gsm::weighted_length;

/// JSON body of `POST /messages`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionRequest {
    #[serde(rename = "Originator")]
    pub originator: String,
    #[serde(rename = "Recipient")]
    pub recipient: i64,
    #[serde(rename = "Message")]
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("originator can not be blank")]
    BlankOriginator,
    #[error("originator is not an MSISDN or it is too long")]
    InvalidOriginator,
    #[error("message can not be blank")]
    BlankMessage,
    #[error("message is longer than 1377 septets")]
    MessageTooLong,
    #[error("recipient MSISDN is wrong")]
    InvalidRecipient,
}

// The literal in `MessageTooLong` must track the real limit.
const _: () = assert!(MAX_MESSAGE_LEN == 1377);

impl SubmissionRequest {
    /// Recipient rendered as the digit string the gateway expects.
    pub fn recipient_msisdn(&self) -> String {
        self.recipient.to_string()
    }

    /// Check the request against gateway constraints.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.originator.is_empty() {
            return Err(ValidationError::BlankOriginator);
        }
        if !is_msisdn(&self.originator) && !is_alphanumeric_sender(&self.originator) {
            return Err(ValidationError::InvalidOriginator);
        }
        if self.message.is_empty() {
            return Err(ValidationError::BlankMessage);
        }
        if weighted_length(&self.message) > MAX_MESSAGE_LEN {
            return Err(ValidationError::MessageTooLong);
        }
        if !is_msisdn(&self.recipient_msisdn()) {
            return Err(ValidationError::InvalidRecipient);
        }
        Ok(())
    }
}

/// Correlation id for log lines: `hex(blake3(originator || recipient ||
/// timestamp_le || message))`. Not a delivery status handle.
pub fn submission_id(req: &SubmissionRequest, timestamp_ms: u64) -> String {
    let mut h = blake3::Hasher::new();
    h.update(req.originator.as_bytes());
    h.update(req.recipient_msisdn().as_bytes());
    h.update(&timestamp_ms.to_le_bytes());
    h.update(req.message.as_bytes());
    hex::encode(h.finalize().as_bytes())
}

/// 4 to 15 ASCII digits, not starting with zero.
pub fn is_msisdn(s: &str) -> bool {
    (4..=15).contains(&s.len())
        && s.bytes().all(|b| b.is_ascii_digit())
        && !s.starts_with('0')
}

/// 1 to 11 ASCII letters or digits.
pub fn is_alphanumeric_sender(s: &str) -> bool {
    (1..=11).contains(&s.len()) && s.bytes().all(|b| b.is_ascii_alphanumeric())
}
