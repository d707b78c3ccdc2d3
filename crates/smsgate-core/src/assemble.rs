//! Message assembly — turns a submission into the segments handed to the
//! gateway.

use crate::gsm::weighted_length;
use crate::segment::chunk;
use crate::udh::{ConcatHeader, HeaderError, MAX_SEGMENTS};

/// Septets in a single SMS without a user data header.
pub const PLAIN_SEGMENT_LEN: usize = 160;
/// Septets left in each part of a concatenated SMS once the header is in.
pub const CONCAT_SEGMENT_LEN: usize = 153;
/// Longest body that fits into [`MAX_SEGMENTS`] concatenated parts.
pub const MAX_MESSAGE_LEN: usize = CONCAT_SEGMENT_LEN * MAX_SEGMENTS as usize;

/// One deliverable unit of a possibly multi-part message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// `None` when the whole message fits in one SMS.
    pub header: Option<ConcatHeader>,
    pub body: String,
    pub originator: String,
    pub recipient: String,
}

impl Segment {
    /// Hex header for the gateway, if this segment has one.
    pub fn udh(&self) -> Option<String> {
        self.header.filter(ConcatHeader::is_present).map(|h| h.to_hex())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SplitError {
    #[error("message is longer than {max} septets ({units} septets in {segments} segments)")]
    MessageTooLong {
        units: usize,
        segments: usize,
        max: usize,
    },
    #[error(transparent)]
    InvalidHeader(#[from] HeaderError),
}

/// Split `body` into ordered segments from `originator` to `recipient`.
///
/// Bodies of up to 160 septets become a single headerless segment. Longer
/// bodies are chunked at 153 septets and every part gets a concatenation
/// header. Everything is computed up front, so a failure means nothing was
/// produced.
pub fn split(originator: &str, recipient: &str, body: &str) -> Result<Vec<Segment>, SplitError> {
    let units = weighted_length(body);
    if units > MAX_MESSAGE_LEN {
        return Err(SplitError::MessageTooLong {
            units,
            segments: chunk(body, CONCAT_SEGMENT_LEN).len(),
            max: MAX_MESSAGE_LEN,
        });
    }

    let segment = |header, body: &str| Segment {
        header,
        body: body.to_string(),
        originator: originator.to_string(),
        recipient: recipient.to_string(),
    };

    if units <= PLAIN_SEGMENT_LEN {
        return Ok(vec![segment(None, body)]);
    }

    let parts = chunk(body, CONCAT_SEGMENT_LEN);
    // Deferred escape characters can waste a septet per part.
    let total = match u8::try_from(parts.len()) {
        Ok(n) if n <= MAX_SEGMENTS => n,
        _ => {
            return Err(SplitError::MessageTooLong {
                units,
                segments: parts.len(),
                max: MAX_MESSAGE_LEN,
            })
        }
    };

    parts
        .into_iter()
        .zip(1..=total)
        .map(|(part, sequence)| -> Result<Segment, SplitError> {
            let header = ConcatHeader::new(total, sequence)?;
            Ok(segment(Some(header), part))
        })
        .collect()
}
