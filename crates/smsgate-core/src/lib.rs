//! smsgate-core — text measurement, segmentation and header encoding.
//! All other smsgate crates depend on this one.

pub mod assemble;
pub mod config;
pub mod gsm;
pub mod segment;
pub mod submission;
pub mod udh;

pub use assemble::{split, Segment, SplitError};
pub use gsm::{char_weight, weighted_length};
pub use segment::chunk;
pub use submission::{submission_id, SubmissionRequest, ValidationError};
pub use udh::{ConcatHeader, HeaderError};
