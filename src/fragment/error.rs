//! Error and diagnostic types emitted by the fragmentation layer.
//!
//! Only outbound misuse and misconfiguration are surfaced as errors. Inbound
//! anomalies are described by [`RejectReason`] and reported to the
//! [`ReassemblyObserver`](crate::fragment::ReassemblyObserver) instead of being
//! returned to the caller.

use std::num::NonZeroUsize;

use bincode::error::EncodeError;
use thiserror::Error;

use super::PayloadId;

/// Errors raised when a [`FragmentationConfig`](crate::fragment::FragmentationConfig)
/// cannot be represented on the wire.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The fragment size does not fit the negated `i32` length field.
    #[error("fragment size {fragment_size} exceeds the i32 wire range")]
    FragmentSizeTooLarge { fragment_size: usize },
    /// The maximum payload size does not fit an `i32` length.
    #[error("maximum payload size {max_payload_size} exceeds the i32 wire range")]
    PayloadSizeTooLarge { max_payload_size: usize },
}

/// Errors produced while fragmenting outbound payloads.
#[derive(Debug, Error)]
pub enum FragmentationError {
    /// The payload exceeds the configured maximum payload size.
    #[error("payload of {attempted} bytes exceeds the {limit} byte limit")]
    PayloadTooLarge {
        attempted: usize,
        limit: NonZeroUsize,
    },
    /// Encoding a fragment datagram failed.
    #[error("failed to encode fragment: {0}")]
    Encode(#[from] EncodeError),
    /// The outgoing queue no longer accepts fragments.
    #[error("fragment sink closed")]
    SinkClosed,
}

/// Why an inbound fragment was discarded.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum RejectReason {
    /// The datagram could not be decoded into a fragment.
    #[error("undecodable datagram: {0}")]
    Undecodable(String),
    /// `sequence_count` was zero or negative.
    #[error("invalid sequence count {count}")]
    InvalidSequenceCount { count: i32 },
    /// `sequence_count` exceeds what a slot can hold.
    #[error("sequence count {count} exceeds the {limit} fragment limit")]
    TooManyFragments { count: i32, limit: usize },
    /// A non-terminal fragment index does not precede the terminal fragment.
    #[error("fragment index {index} out of range for sequence count {count}")]
    IndexOutOfRange { index: u32, count: i32 },
    /// The fragment data length disagrees with the header.
    #[error("fragment length mismatch: expected {expected}, found {found}")]
    LengthMismatch { expected: usize, found: usize },
    /// The terminal fragment would push the payload past the configured limit.
    #[error("reassembled payload of {attempted} bytes exceeds the {limit} byte limit")]
    PayloadTooLarge { attempted: usize, limit: usize },
    /// A fragment disagreed with the sequence count already recorded for its payload.
    #[error("sequence count mismatch for payload {payload_id}: expected {expected}, found {found}")]
    SequenceCountMismatch {
        payload_id: PayloadId,
        expected: usize,
        found: i32,
    },
}

impl RejectReason {
    /// Short, stable label used for logs and metrics.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Undecodable(_) => "undecodable",
            Self::InvalidSequenceCount { .. } => "invalid_sequence_count",
            Self::TooManyFragments { .. } => "too_many_fragments",
            Self::IndexOutOfRange { .. } => "index_out_of_range",
            Self::LengthMismatch { .. } => "length_mismatch",
            Self::PayloadTooLarge { .. } => "payload_too_large",
            Self::SequenceCountMismatch { .. } => "sequence_count_mismatch",
        }
    }
}
