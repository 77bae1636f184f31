//! Inbound helper that stitches fragments back into complete payloads.
//!
//! [`Reassembler`] owns a fixed arena of reassembly slots allocated once at
//! construction. A fragment's slot is `payload_id mod max_in_flight`, so
//! lookup is O(1) and accepting a fragment costs one copy of its data. When a
//! fragment for a new payload lands on a slot still filling with another
//! payload, the older payload is evicted and reported to the
//! [`ReassemblyObserver`]; fragments of two payloads never share a slot.
//!
//! Fragments may arrive in any order and may be duplicated. Malformed
//! fragments are discarded without touching any slot.

use std::time::Instant;

use bytes::Bytes;

use super::{
    ConfigError,
    Eviction,
    EvictionCause,
    Fragment,
    FragmentHeader,
    FragmentKind,
    FragmentationConfig,
    LogObserver,
    PayloadId,
    ReassemblyObserver,
    RejectReason,
    SlotState,
    decode_datagram,
    slot::{Occupancy, Placement, ReassemblySlot},
};

/// A completed payload, borrowed from the slot it was staged in.
///
/// The bytes stay valid until the reassembler is next mutated; copy them out
/// with [`ReassembledPayload::to_bytes`] or [`ReassembledPayload::to_vec`]
/// to keep them longer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReassembledPayload<'a> {
    payload_id: PayloadId,
    payload: &'a [u8],
}

impl<'a> ReassembledPayload<'a> {
    /// Identifier shared by the fragments that formed this payload.
    #[must_use]
    pub const fn payload_id(&self) -> PayloadId { self.payload_id }

    /// Borrow the reassembled bytes.
    #[must_use]
    pub const fn payload(&self) -> &'a [u8] { self.payload }

    /// Length of the reassembled payload.
    #[must_use]
    pub const fn len(&self) -> usize { self.payload.len() }

    /// Whether the reassembled payload is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool { self.payload.is_empty() }

    /// Copy the payload into an owned vector.
    #[must_use]
    pub fn to_vec(&self) -> Vec<u8> { self.payload.to_vec() }

    /// Copy the payload into an owned [`Bytes`] buffer.
    #[must_use]
    pub fn to_bytes(&self) -> Bytes { Bytes::copy_from_slice(self.payload) }
}

impl AsRef<[u8]> for ReassembledPayload<'_> {
    fn as_ref(&self) -> &[u8] { self.payload }
}

/// Fixed-capacity fragment re-assembler.
#[derive(Debug)]
pub struct Reassembler<O = LogObserver> {
    config: FragmentationConfig,
    max_fragments: usize,
    slots: Box<[ReassemblySlot]>,
    observer: O,
}

impl Reassembler {
    /// Create a re-assembler reporting through [`LogObserver`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the configured sizes cannot be expressed
    /// in the wire header.
    pub fn new(config: FragmentationConfig) -> Result<Self, ConfigError> {
        Self::with_observer(config, LogObserver)
    }
}

impl<O: ReassemblyObserver> Reassembler<O> {
    /// Create a re-assembler reporting to `observer`.
    ///
    /// Every slot's staging buffer and bitmap is allocated here; accepting
    /// fragments never allocates.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the configured sizes cannot be expressed
    /// in the wire header.
    pub fn with_observer(config: FragmentationConfig, observer: O) -> Result<Self, ConfigError> {
        config.validate()?;
        let max_fragments = config.max_fragments();
        let slots = (0..config.max_in_flight.get())
            .map(|_| ReassemblySlot::new(max_fragments, config.max_payload_size.get()))
            .collect();
        Ok(Self {
            config,
            max_fragments,
            slots,
            observer,
        })
    }

    /// Return the configuration the re-assembler was built with.
    #[must_use]
    pub const fn config(&self) -> &FragmentationConfig { &self.config }

    /// Borrow the observer.
    #[must_use]
    pub const fn observer(&self) -> &O { &self.observer }

    /// Mutably borrow the observer.
    pub fn observer_mut(&mut self) -> &mut O { &mut self.observer }

    /// Consume the re-assembler, returning its observer.
    #[must_use]
    pub fn into_observer(self) -> O { self.observer }

    /// Accept one fragment.
    ///
    /// Returns the payload when this fragment completes it, and `None`
    /// otherwise, including when the fragment is malformed or repeats part
    /// of an already completed payload.
    pub fn accept(&mut self, fragment: &Fragment) -> Option<ReassembledPayload<'_>> {
        self.accept_at(fragment, Instant::now())
    }

    /// Accept one fragment using an explicit clock reading.
    ///
    /// The clock only timestamps newly claimed slots for
    /// [`purge_stale_at`](Self::purge_stale_at).
    pub fn accept_at(
        &mut self,
        fragment: &Fragment,
        now: Instant,
    ) -> Option<ReassembledPayload<'_>> {
        self.accept_parts(*fragment.header(), fragment.data(), now)
    }

    /// Decode a received datagram and accept the fragment it carries.
    ///
    /// Undecodable datagrams are reported as rejected and yield `None`.
    pub fn accept_datagram(&mut self, datagram: &[u8]) -> Option<ReassembledPayload<'_>> {
        self.accept_datagram_at(datagram, Instant::now())
    }

    /// Decode and accept a datagram using an explicit clock reading.
    pub fn accept_datagram_at(
        &mut self,
        datagram: &[u8],
        now: Instant,
    ) -> Option<ReassembledPayload<'_>> {
        match decode_datagram(datagram) {
            Ok((header, data)) => self.accept_parts(header, data, now),
            Err(err) => {
                self.observer
                    .on_rejected(None, &RejectReason::Undecodable(err.to_string()));
                None
            }
        }
    }

    /// Evict partial payloads older than the configured `stale_after`.
    ///
    /// Returns the identifiers of evicted payloads. Does nothing when no
    /// staleness limit is configured.
    pub fn purge_stale(&mut self) -> Vec<PayloadId> { self.purge_stale_at(Instant::now()) }

    /// Evict stale partial payloads using an explicit clock reading.
    pub fn purge_stale_at(&mut self, now: Instant) -> Vec<PayloadId> {
        let mut evicted = Vec::new();
        let Some(limit) = self.config.stale_after else {
            return evicted;
        };

        for (slot_index, slot) in self.slots.iter_mut().enumerate() {
            let Occupancy::Filling {
                payload_id,
                sequence_count,
                started_at,
            } = slot.occupancy()
            else {
                continue;
            };
            let age = now.saturating_duration_since(started_at);
            if age < limit {
                continue;
            }
            self.observer.on_evicted(&Eviction {
                slot_index,
                payload_id,
                received: slot.received(),
                expected: sequence_count,
                cause: EvictionCause::Stale { age },
            });
            slot.reset();
            evicted.push(payload_id);
        }

        evicted
    }

    /// Number of slots currently holding a partial payload.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.slots
            .iter()
            .filter(|slot| matches!(slot.occupancy(), Occupancy::Filling { .. }))
            .count()
    }

    /// Report the state of the slot `payload_id` maps to.
    ///
    /// The slot may belong to a different payload that shares the same
    /// table index.
    #[must_use]
    pub fn slot_state(&self, payload_id: PayloadId) -> SlotState {
        self.slots[payload_id.slot_index(self.config.max_in_flight)].state()
    }

    fn accept_parts(
        &mut self,
        header: FragmentHeader,
        data: &[u8],
        now: Instant,
    ) -> Option<ReassembledPayload<'_>> {
        let placement = match self.place(&header, data.len()) {
            Ok(placement) => placement,
            Err(reason) => {
                self.observer.on_rejected(Some(&header), &reason);
                return None;
            }
        };

        let payload_id = header.payload_id();
        let slot_index = payload_id.slot_index(self.config.max_in_flight);
        let slot = &mut self.slots[slot_index];

        match slot.occupancy() {
            Occupancy::Done { payload_id: done, .. } if done == payload_id => return None,
            Occupancy::Filling {
                payload_id: current,
                sequence_count,
                ..
            } if current == payload_id => {
                if sequence_count != placement.sequence_count {
                    let reason = RejectReason::SequenceCountMismatch {
                        payload_id,
                        expected: sequence_count,
                        found: header.sequence_count(),
                    };
                    self.observer.on_rejected(Some(&header), &reason);
                    return None;
                }
            }
            Occupancy::Filling {
                payload_id: current,
                sequence_count,
                ..
            } => {
                self.observer.on_evicted(&Eviction {
                    slot_index,
                    payload_id: current,
                    received: slot.received(),
                    expected: sequence_count,
                    cause: EvictionCause::Collision {
                        replaced_by: payload_id,
                    },
                });
                slot.claim(payload_id, placement.sequence_count, now);
            }
            Occupancy::Empty | Occupancy::Done { .. } => {
                slot.claim(payload_id, placement.sequence_count, now);
            }
        }

        let len = slot.write(placement, data, self.config.fragment_size.get())?;
        self.observer.on_completed(payload_id, len);
        Some(ReassembledPayload {
            payload_id,
            payload: self.slots[slot_index].payload(len),
        })
    }

    /// Validate `header` against the configuration and locate its bytes.
    fn place(&self, header: &FragmentHeader, data_len: usize) -> Result<Placement, RejectReason> {
        let count = header.sequence_count();
        let Ok(sequence_count) = usize::try_from(count) else {
            return Err(RejectReason::InvalidSequenceCount { count });
        };
        if sequence_count == 0 {
            return Err(RejectReason::InvalidSequenceCount { count });
        }
        if sequence_count > self.max_fragments {
            return Err(RejectReason::TooManyFragments {
                count,
                limit: self.max_fragments,
            });
        }

        let fragment_size = self.config.fragment_size.get();
        match header.kind() {
            FragmentKind::Index(index) => {
                let position = usize::try_from(index).unwrap_or(usize::MAX);
                // The last position always belongs to the terminal fragment.
                if position >= sequence_count - 1 {
                    return Err(RejectReason::IndexOutOfRange { index, count });
                }
                if data_len != fragment_size {
                    return Err(RejectReason::LengthMismatch {
                        expected: fragment_size,
                        found: data_len,
                    });
                }
                Ok(Placement {
                    index: position,
                    offset: position * fragment_size,
                    sequence_count,
                    terminal: false,
                })
            }
            FragmentKind::Terminal { len } => {
                let len = usize::try_from(len).unwrap_or(usize::MAX);
                if len != data_len {
                    return Err(RejectReason::LengthMismatch {
                        expected: len,
                        found: data_len,
                    });
                }
                if len > fragment_size {
                    return Err(RejectReason::LengthMismatch {
                        expected: fragment_size,
                        found: len,
                    });
                }
                let index = sequence_count - 1;
                let offset = index * fragment_size;
                let attempted = offset + len;
                if attempted > self.config.max_payload_size.get() {
                    return Err(RejectReason::PayloadTooLarge {
                        attempted,
                        limit: self.config.max_payload_size.get(),
                    });
                }
                Ok(Placement {
                    index,
                    offset,
                    sequence_count,
                    terminal: true,
                })
            }
        }
    }
}
