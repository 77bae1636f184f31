//! Diagnostic callbacks invoked by the [`Reassembler`](super::Reassembler).
//!
//! Reassembly never fails loudly: malformed fragments are dropped and
//! abandoned payloads are evicted. [`ReassemblyObserver`] is how callers find
//! out about those events. [`LogObserver`] is the default and reports through
//! `log` and the crate metrics; `()` discards everything; a
//! `Vec<ReassemblyEvent>` records events for later inspection.

use std::time::Duration;

use log::{debug, warn};

use super::{FragmentHeader, PayloadId, RejectReason};
use crate::metrics;

/// Why a partially reassembled payload was discarded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EvictionCause {
    /// A fragment of another payload claimed the same slot.
    Collision { replaced_by: PayloadId },
    /// The slot sat unfinished for longer than the configured limit.
    Stale { age: Duration },
}

impl EvictionCause {
    /// Short, stable label used for logs and metrics.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Collision { .. } => "collision",
            Self::Stale { .. } => "stale",
        }
    }
}

/// A partially reassembled payload that was dropped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Eviction {
    /// Table index of the slot that was reclaimed.
    pub slot_index: usize,
    /// Identifier of the payload that never completed.
    pub payload_id: PayloadId,
    /// Fragments that had arrived.
    pub received: usize,
    /// Fragments the payload was split into.
    pub expected: usize,
    /// What triggered the eviction.
    pub cause: EvictionCause,
}

/// Callbacks fired while fragments are accepted.
///
/// Every method has an empty default so implementations only override the
/// events they care about.
pub trait ReassemblyObserver {
    /// A payload finished reassembling.
    fn on_completed(&mut self, _payload_id: PayloadId, _len: usize) {}

    /// A fragment was discarded. `header` is `None` when the datagram could
    /// not be decoded.
    fn on_rejected(&mut self, _header: Option<&FragmentHeader>, _reason: &RejectReason) {}

    /// A partial payload was dropped to make room or because it went stale.
    fn on_evicted(&mut self, _eviction: &Eviction) {}
}

/// Observer that ignores every event.
impl ReassemblyObserver for () {}

/// Default observer: logs anomalies and updates metrics.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogObserver;

impl ReassemblyObserver for LogObserver {
    fn on_completed(&mut self, _payload_id: PayloadId, _len: usize) {
        metrics::inc_payloads_reassembled();
    }

    fn on_rejected(&mut self, header: Option<&FragmentHeader>, reason: &RejectReason) {
        match header {
            Some(header) => debug!(
                "discarding fragment: payload_id={}, sequence_num={}, sequence_count={}, \
                 reason={reason}",
                header.payload_id(),
                header.sequence_num(),
                header.sequence_count(),
            ),
            None => debug!("discarding datagram: reason={reason}"),
        }
        metrics::inc_fragments_rejected(reason.label());
    }

    fn on_evicted(&mut self, eviction: &Eviction) {
        let Eviction {
            slot_index,
            payload_id,
            received,
            expected,
            cause,
        } = eviction;
        match cause {
            EvictionCause::Collision { replaced_by } => warn!(
                "dropped packet: payload_id={payload_id} incomplete with {received}/{expected} \
                 fragments, slot={slot_index} reclaimed by payload_id={replaced_by}"
            ),
            EvictionCause::Stale { age } => warn!(
                "dropped packet: payload_id={payload_id} incomplete with {received}/{expected} \
                 fragments, slot={slot_index} stale after {age:?}"
            ),
        }
        metrics::inc_reassemblies_evicted(cause.label());
    }
}

/// Event recorded by a `Vec<ReassemblyEvent>` observer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReassemblyEvent {
    /// See [`ReassemblyObserver::on_completed`].
    Completed {
        payload_id: PayloadId,
        len: usize,
    },
    /// See [`ReassemblyObserver::on_rejected`].
    Rejected {
        header: Option<FragmentHeader>,
        reason: RejectReason,
    },
    /// See [`ReassemblyObserver::on_evicted`].
    Evicted(Eviction),
}

impl ReassemblyObserver for Vec<ReassemblyEvent> {
    fn on_completed(&mut self, payload_id: PayloadId, len: usize) {
        self.push(ReassemblyEvent::Completed { payload_id, len });
    }

    fn on_rejected(&mut self, header: Option<&FragmentHeader>, reason: &RejectReason) {
        self.push(ReassemblyEvent::Rejected {
            header: header.copied(),
            reason: reason.clone(),
        });
    }

    fn on_evicted(&mut self, eviction: &Eviction) {
        self.push(ReassemblyEvent::Evicted(*eviction));
    }
}

impl<O: ReassemblyObserver + ?Sized> ReassemblyObserver for Box<O> {
    fn on_completed(&mut self, payload_id: PayloadId, len: usize) {
        (**self).on_completed(payload_id, len);
    }

    fn on_rejected(&mut self, header: Option<&FragmentHeader>, reason: &RejectReason) {
        (**self).on_rejected(header, reason);
    }

    fn on_evicted(&mut self, eviction: &Eviction) { (**self).on_evicted(eviction); }
}
