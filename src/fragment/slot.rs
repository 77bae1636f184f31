//! Reassembly slots: the fixed arena entries a [`Reassembler`](super::Reassembler)
//! stages payloads in.

use std::time::Instant;

use super::{PayloadId, bitmap::AvailabilityBitmap};

/// Externally visible state of a reassembly slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlotState {
    /// No payload occupies the slot.
    Empty,
    /// Some, but not all, fragments of `payload_id` have arrived.
    Filling {
        payload_id: PayloadId,
        received: usize,
        expected: usize,
    },
    /// Every fragment of `payload_id` has arrived.
    Done { payload_id: PayloadId, len: usize },
}

#[derive(Clone, Copy, Debug)]
pub(crate) enum Occupancy {
    Empty,
    Filling {
        payload_id: PayloadId,
        sequence_count: usize,
        started_at: Instant,
    },
    Done {
        payload_id: PayloadId,
        len: usize,
    },
}

/// Where a validated fragment lands inside a slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Placement {
    pub(crate) index: usize,
    pub(crate) offset: usize,
    pub(crate) sequence_count: usize,
    pub(crate) terminal: bool,
}

#[derive(Debug)]
pub(crate) struct ReassemblySlot {
    occupancy: Occupancy,
    available: AvailabilityBitmap,
    staging: Box<[u8]>,
    last_fragment_len: usize,
}

impl ReassemblySlot {
    pub(crate) fn new(max_fragments: usize, max_payload_size: usize) -> Self {
        Self {
            occupancy: Occupancy::Empty,
            available: AvailabilityBitmap::new(max_fragments),
            staging: vec![0; max_payload_size].into_boxed_slice(),
            last_fragment_len: 0,
        }
    }

    pub(crate) const fn occupancy(&self) -> Occupancy { self.occupancy }

    pub(crate) const fn received(&self) -> usize { self.available.count() }

    pub(crate) fn state(&self) -> SlotState {
        match self.occupancy {
            Occupancy::Empty => SlotState::Empty,
            Occupancy::Filling {
                payload_id,
                sequence_count,
                ..
            } => SlotState::Filling {
                payload_id,
                received: self.received(),
                expected: sequence_count,
            },
            Occupancy::Done { payload_id, len } => SlotState::Done { payload_id, len },
        }
    }

    /// Hand the slot to `payload_id`, discarding whatever it held.
    pub(crate) fn claim(&mut self, payload_id: PayloadId, sequence_count: usize, now: Instant) {
        self.available.clear();
        self.last_fragment_len = 0;
        self.occupancy = Occupancy::Filling {
            payload_id,
            sequence_count,
            started_at: now,
        };
    }

    pub(crate) fn reset(&mut self) {
        self.available.clear();
        self.last_fragment_len = 0;
        self.occupancy = Occupancy::Empty;
    }

    /// Copy `data` into the staging buffer and mark its index as received.
    ///
    /// Returns the reassembled length when this write completes the payload.
    /// The placement must come from validation against the slot's
    /// configuration, which keeps the write inside the staging buffer.
    pub(crate) fn write(
        &mut self,
        placement: Placement,
        data: &[u8],
        fragment_size: usize,
    ) -> Option<usize> {
        let Occupancy::Filling {
            payload_id,
            sequence_count,
            ..
        } = self.occupancy
        else {
            return None;
        };

        self.staging[placement.offset..placement.offset + data.len()].copy_from_slice(data);
        if placement.terminal {
            self.last_fragment_len = data.len();
        }
        self.available.insert(placement.index);

        if self.available.count() < sequence_count {
            return None;
        }
        let len = (sequence_count - 1) * fragment_size + self.last_fragment_len;
        self.occupancy = Occupancy::Done { payload_id, len };
        Some(len)
    }

    pub(crate) fn payload(&self, len: usize) -> &[u8] { &self.staging[..len] }
}
