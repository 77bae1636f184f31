//! Fixed-width fragment header and its wire encoding.
//!
//! Every fragment datagram starts with three little-endian `i32` fields:
//! `payload_id`, `sequence_num`, and `sequence_count`. The header is encoded
//! with bincode's fixed-width integer configuration so its size never
//! depends on the values carried.

use bincode::{
    Decode,
    Encode,
    config::{self, Configuration, Fixint, LittleEndian, NoLimit},
};

use super::PayloadId;

/// Encoded size of a [`FragmentHeader`] in bytes.
pub const HEADER_LEN: usize = 12;

/// Bincode configuration used for fragment headers on the wire.
pub(crate) const WIRE_CONFIG: Configuration<LittleEndian, Fixint, NoLimit> =
    config::standard().with_fixed_int_encoding();

/// Position of a fragment inside its payload, decoded from `sequence_num`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FragmentKind {
    /// A full-size fragment at the given zero-based index.
    Index(u32),
    /// The final fragment, carrying `len` bytes.
    Terminal {
        /// Byte length of the terminal fragment's data.
        len: u32,
    },
}

/// Header describing a single fragment.
///
/// Non-terminal fragments carry their zero-based index in `sequence_num`.
/// The terminal fragment instead carries the negated byte length of its data,
/// which makes a separate "last" flag or length field unnecessary.
///
/// # Examples
///
/// ```
/// use fragwire::fragment::{FragmentHeader, FragmentKind, PayloadId};
/// let header = FragmentHeader::new(PayloadId::new(7), -2, 3);
/// assert_eq!(header.kind(), FragmentKind::Terminal { len: 2 });
/// assert!(header.is_terminal());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Encode, Decode)]
pub struct FragmentHeader {
    payload_id: PayloadId,
    sequence_num: i32,
    sequence_count: i32,
}

impl FragmentHeader {
    /// Create a header from its raw wire fields.
    #[must_use]
    pub const fn new(payload_id: PayloadId, sequence_num: i32, sequence_count: i32) -> Self {
        Self {
            payload_id,
            sequence_num,
            sequence_count,
        }
    }

    /// Return the payload identifier.
    #[must_use]
    pub const fn payload_id(&self) -> PayloadId { self.payload_id }

    /// Return the raw `sequence_num` field.
    #[must_use]
    pub const fn sequence_num(&self) -> i32 { self.sequence_num }

    /// Return the raw `sequence_count` field.
    #[must_use]
    pub const fn sequence_count(&self) -> i32 { self.sequence_count }

    /// Decode `sequence_num` into a fragment position.
    ///
    /// A zero `sequence_num` is the terminal fragment of an empty payload
    /// only when the payload consists of a single fragment; otherwise it is
    /// fragment `0`.
    #[must_use]
    pub const fn kind(&self) -> FragmentKind {
        if self.sequence_num < 0 || (self.sequence_num == 0 && self.sequence_count == 1) {
            FragmentKind::Terminal {
                len: self.sequence_num.unsigned_abs(),
            }
        } else {
            FragmentKind::Index(self.sequence_num.unsigned_abs())
        }
    }

    /// Report whether this header describes the terminal fragment.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self.kind(), FragmentKind::Terminal { .. })
    }
}
