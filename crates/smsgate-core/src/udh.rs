//! User data header for concatenated SMS.
//!
//! Every segment of a multi-part message carries this header so the
//! receiving handset can reassemble the parts in order. The layout is a
//! single "concatenated short message, 8-bit reference" information element:
//!
//! ```text
//!   05  overall header length (octets that follow)
//!   00  information element type
//!   03  information element length
//!   00  concatenation reference
//!   NN  total segments
//!   SS  sequence number of this segment
//! ```
//!
//! The all-zero value is the absent header used for single-segment messages.

use static_assertions::assert_eq_size;
use zerocopy::{AsBytes, FromBytes, FromZeroes};

/// Highest segment count the gateway accepts for one message.
pub const MAX_SEGMENTS: u8 = 9;

const OVERALL_LENGTH: u8 = 0x05;
const IE_CONCAT_8BIT: u8 = 0x00;
const IE_LENGTH: u8 = 0x03;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, AsBytes, FromBytes, FromZeroes)]
#[repr(C)]
pub struct ConcatHeader {
    overall_length: u8,
    ie_type: u8,
    ie_length: u8,
    reference: u8,
    total: u8,
    sequence: u8,
}

assert_eq_size!(ConcatHeader, [u8; 6]);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HeaderError {
    #[error("header values violation: total={total}, sequence={sequence}")]
    InvalidArguments { total: u8, sequence: u8 },
}

impl ConcatHeader {
    /// Header for segment `sequence` of `total`.
    ///
    /// Both values start at 1, `sequence` may not exceed `total`, and neither
    /// may exceed [`MAX_SEGMENTS`].
    pub fn new(total: u8, sequence: u8) -> Result<Self, HeaderError> {
        if total == 0
            || sequence == 0
            || total > MAX_SEGMENTS
            || sequence > MAX_SEGMENTS
            || sequence > total
        {
            return Err(HeaderError::InvalidArguments { total, sequence });
        }

        Ok(Self {
            overall_length: OVERALL_LENGTH,
            ie_type: IE_CONCAT_8BIT,
            ie_length: IE_LENGTH,
            reference: 0,
            total,
            sequence,
        })
    }

    /// Lowercase hex of the wire bytes, as the gateway expects in `udh`.
    pub fn to_hex(&self) -> String {
        hex::encode(self.as_bytes())
    }

    /// True for headers built by [`ConcatHeader::new`], false for the default.
    pub fn is_present(&self) -> bool {
        self.total > 0
    }

    pub fn total(&self) -> u8 {
        self.total
    }

    pub fn sequence(&self) -> u8 {
        self.sequence
    }
}
