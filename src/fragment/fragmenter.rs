//! Outbound helper that splits payloads into transport fragments.
//!
//! [`Fragmenter`] is stateless between calls: every call derives the whole
//! fragment sequence from the payload length and the configured fragment
//! size. Fragments share the payload's buffer, so splitting never copies
//! payload bytes.

use std::num::NonZeroUsize;

use bytes::Bytes;

use super::{
    ConfigError,
    Fragment,
    FragmentHeader,
    FragmentSink,
    FragmentationConfig,
    FragmentationError,
    PayloadId,
};
use crate::metrics;

/// Splits payloads into fragment-sized pieces.
#[derive(Clone, Copy, Debug)]
pub struct Fragmenter {
    fragment_size: NonZeroUsize,
    max_payload_size: NonZeroUsize,
}

impl Fragmenter {
    /// Create a fragmenter from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the configured sizes cannot be expressed
    /// in the wire header.
    pub fn new(config: FragmentationConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            fragment_size: config.fragment_size,
            max_payload_size: config.max_payload_size,
        })
    }

    /// Return the payload bytes carried by each non-terminal fragment.
    #[must_use]
    pub const fn fragment_size(&self) -> NonZeroUsize { self.fragment_size }

    /// Return the largest payload this fragmenter accepts.
    #[must_use]
    pub const fn max_payload_size(&self) -> NonZeroUsize { self.max_payload_size }

    /// Lazily split `payload`, yielding fragments in index order.
    ///
    /// # Errors
    ///
    /// Returns [`FragmentationError::PayloadTooLarge`] when the payload
    /// exceeds the configured maximum.
    pub fn cursor(
        &self,
        payload_id: PayloadId,
        payload: impl Into<Bytes>,
    ) -> Result<FragmentCursor, FragmentationError> {
        let payload = payload.into();
        if payload.len() > self.max_payload_size.get() {
            return Err(FragmentationError::PayloadTooLarge {
                attempted: payload.len(),
                limit: self.max_payload_size,
            });
        }
        Ok(FragmentCursor::new(payload_id, payload, self.fragment_size))
    }

    /// Split `payload` into a [`FragmentBatch`].
    ///
    /// # Errors
    ///
    /// Returns [`FragmentationError::PayloadTooLarge`] when the payload
    /// exceeds the configured maximum.
    pub fn fragment(
        &self,
        payload_id: PayloadId,
        payload: impl Into<Bytes>,
    ) -> Result<FragmentBatch, FragmentationError> {
        let fragments = self.cursor(payload_id, payload)?.collect();
        Ok(FragmentBatch::new(payload_id, fragments))
    }

    /// Split `payload` and append every fragment to `sink`.
    ///
    /// Returns the number of fragments pushed. The size check happens before
    /// anything is pushed, but a sink that closes part-way leaves the
    /// fragments pushed so far in place.
    ///
    /// # Errors
    ///
    /// Returns [`FragmentationError::PayloadTooLarge`] for oversized payloads
    /// and propagates any error raised by the sink.
    pub fn fragment_into<S: FragmentSink + ?Sized>(
        &self,
        payload_id: PayloadId,
        payload: impl Into<Bytes>,
        sink: &mut S,
    ) -> Result<usize, FragmentationError> {
        let mut pushed = 0;
        for fragment in self.cursor(payload_id, payload)? {
            sink.push_fragment(fragment)?;
            metrics::inc_fragments_sent();
            pushed += 1;
        }
        Ok(pushed)
    }
}

/// Iterator over the fragments of one payload.
#[derive(Clone, Debug)]
pub struct FragmentCursor {
    payload_id: PayloadId,
    payload: Bytes,
    fragment_size: usize,
    sequence_count: usize,
    next_index: usize,
}

impl FragmentCursor {
    fn new(payload_id: PayloadId, payload: Bytes, fragment_size: NonZeroUsize) -> Self {
        let fragment_size = fragment_size.get();
        let sequence_count = payload.len().div_ceil(fragment_size).max(1);
        Self {
            payload_id,
            payload,
            fragment_size,
            sequence_count,
            next_index: 0,
        }
    }

    /// Total number of fragments the payload splits into.
    #[must_use]
    pub const fn sequence_count(&self) -> usize { self.sequence_count }
}

impl Iterator for FragmentCursor {
    type Item = Fragment;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.next_index;
        if index >= self.sequence_count {
            return None;
        }
        self.next_index += 1;

        let start = index * self.fragment_size;
        let (end, sequence_num) = if index + 1 < self.sequence_count {
            (start + self.fragment_size, to_wire(index))
        } else {
            let end = self.payload.len();
            (end, -to_wire(end - start))
        };

        let header = FragmentHeader::new(
            self.payload_id,
            sequence_num,
            to_wire(self.sequence_count),
        );
        Some(Fragment::new(header, self.payload.slice(start..end)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.sequence_count - self.next_index;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for FragmentCursor {}

/// Collection of fragments produced for a single payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FragmentBatch {
    payload_id: PayloadId,
    fragments: Vec<Fragment>,
}

impl FragmentBatch {
    fn new(payload_id: PayloadId, fragments: Vec<Fragment>) -> Self {
        debug_assert!(!fragments.is_empty(), "fragment batches must not be empty");
        Self {
            payload_id,
            fragments,
        }
    }

    /// Return the [`PayloadId`] shared by all fragments.
    #[must_use]
    pub const fn payload_id(&self) -> PayloadId { self.payload_id }

    /// Return the fragments as a slice.
    #[must_use]
    pub fn fragments(&self) -> &[Fragment] { self.fragments.as_slice() }

    /// Number of fragments in the batch.
    #[expect(
        clippy::len_without_is_empty,
        reason = "batches are guaranteed non-empty"
    )]
    #[must_use]
    pub fn len(&self) -> usize { self.fragments.len() }

    /// Whether the payload required more than one fragment.
    #[must_use]
    pub fn is_fragmented(&self) -> bool { self.len() > 1 }

    /// Consume the batch, returning all fragments.
    #[must_use]
    pub fn into_fragments(self) -> Vec<Fragment> { self.fragments }
}

impl IntoIterator for FragmentBatch {
    type Item = Fragment;
    type IntoIter = std::vec::IntoIter<Fragment>;

    fn into_iter(self) -> Self::IntoIter { self.fragments.into_iter() }
}

// Configuration validation keeps every index and length within `i32`.
fn to_wire(value: usize) -> i32 { i32::try_from(value).unwrap_or(i32::MAX) }
