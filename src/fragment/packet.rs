//! Fragment datagrams: a [`FragmentHeader`] followed by the fragment bytes.
//!
//! [`Fragment::encode`] lays a fragment out as
//! `[payload_id][sequence_num][sequence_count][data]` using the fixed-width
//! header encoding. [`Fragment::decode`] reverses the process without
//! copying the data section.

use bincode::{
    decode_from_slice,
    encode_into_slice,
    error::{DecodeError, EncodeError},
};
use bytes::{BufMut, Bytes, BytesMut};

use super::{
    FragmentHeader,
    FragmentKind,
    PayloadId,
    header::{HEADER_LEN, WIRE_CONFIG},
};

/// A single fragment: header metadata plus its slice of the payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fragment {
    header: FragmentHeader,
    data: Bytes,
}

impl Fragment {
    /// Construct a fragment from a header and its data.
    #[must_use]
    pub fn new(header: FragmentHeader, data: impl Into<Bytes>) -> Self {
        Self {
            header,
            data: data.into(),
        }
    }

    /// Return the fragment header.
    #[must_use]
    pub const fn header(&self) -> &FragmentHeader { &self.header }

    /// Shorthand for the header's payload identifier.
    #[must_use]
    pub const fn payload_id(&self) -> PayloadId { self.header.payload_id() }

    /// Shorthand for the header's decoded position.
    #[must_use]
    pub const fn kind(&self) -> FragmentKind { self.header.kind() }

    /// Borrow the fragment data.
    #[must_use]
    pub fn data(&self) -> &[u8] { &self.data }

    /// Number of bytes the fragment occupies on the wire.
    #[must_use]
    pub fn encoded_len(&self) -> usize { HEADER_LEN + self.data.len() }

    /// Consume the fragment, returning its components.
    #[must_use]
    pub fn into_parts(self) -> (FragmentHeader, Bytes) { (self.header, self.data) }

    /// Encode the fragment into a datagram ready for transmission.
    ///
    /// # Errors
    ///
    /// Returns an [`EncodeError`] if the header cannot be written.
    pub fn encode(&self) -> Result<Bytes, EncodeError> {
        let mut header = [0_u8; HEADER_LEN];
        let written = encode_into_slice(self.header, &mut header, WIRE_CONFIG)?;
        debug_assert_eq!(written, HEADER_LEN, "fragment header must be fixed width");

        let mut buf = BytesMut::with_capacity(self.encoded_len());
        buf.put_slice(&header);
        buf.put_slice(&self.data);
        Ok(buf.freeze())
    }

    /// Decode a received datagram into a fragment.
    ///
    /// The data section is a zero-copy slice of `datagram`. No semantic
    /// validation happens here; the [`Reassembler`](super::Reassembler)
    /// performs it when the fragment is accepted.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::UnexpectedEnd`] when the datagram is shorter
    /// than a header.
    pub fn decode(datagram: Bytes) -> Result<Self, DecodeError> {
        let header = decode_header(&datagram)?;
        Ok(Self {
            header,
            data: datagram.slice(HEADER_LEN..),
        })
    }
}

/// Decode only the header of a datagram, returning it with the data section.
///
/// # Errors
///
/// Returns [`DecodeError::UnexpectedEnd`] when the datagram is shorter than a
/// header.
pub fn decode_datagram(datagram: &[u8]) -> Result<(FragmentHeader, &[u8]), DecodeError> {
    let header = decode_header(datagram)?;
    let data = datagram.get(HEADER_LEN..).unwrap_or_default();
    Ok((header, data))
}

fn decode_header(datagram: &[u8]) -> Result<FragmentHeader, DecodeError> {
    let Some(header_bytes) = datagram.get(..HEADER_LEN) else {
        return Err(DecodeError::UnexpectedEnd {
            additional: HEADER_LEN - datagram.len(),
        });
    };
    let (header, consumed) = decode_from_slice::<FragmentHeader, _>(header_bytes, WIRE_CONFIG)?;
    if consumed != HEADER_LEN {
        return Err(DecodeError::OtherString(
            "fragment header length mismatch".to_string(),
        ));
    }
    Ok(header)
}
