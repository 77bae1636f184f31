//! Tests for inbound validation, completion, and duplicate handling.

use bytes::Bytes;
use rstest::rstest;

use super::{config, recording_reassembler};
use crate::fragment::{
    Fragment,
    FragmentHeader,
    Fragmenter,
    PayloadId,
    Reassembler,
    ReassemblyEvent,
    RejectReason,
    SlotState,
};

fn fragments(fragment_size: usize, id: i32, payload: &[u8]) -> Vec<Fragment> {
    Fragmenter::new(config(fragment_size, 4, 64))
        .expect("valid configuration")
        .fragment(PayloadId::new(id), Bytes::copy_from_slice(payload))
        .expect("fragment payload")
        .into_fragments()
}

fn raw(id: i32, sequence_num: i32, sequence_count: i32, data: &'static [u8]) -> Fragment {
    Fragment::new(
        FragmentHeader::new(PayloadId::new(id), sequence_num, sequence_count),
        Bytes::from_static(data),
    )
}

#[test]
fn reassembler_completes_hello_world_on_last_arrival() {
    let fragments = fragments(4, 1, b"HELLOWORLD");
    let mut reassembler = recording_reassembler(config(4, 4, 64));

    assert!(reassembler.accept(&fragments[2]).is_none());
    assert!(reassembler.accept(&fragments[0]).is_none());
    assert_eq!(
        reassembler.slot_state(PayloadId::new(1)),
        SlotState::Filling {
            payload_id: PayloadId::new(1),
            received: 2,
            expected: 3,
        }
    );

    let complete = reassembler
        .accept(&fragments[1])
        .expect("third fragment completes the payload");
    assert_eq!(complete.payload_id(), PayloadId::new(1));
    assert_eq!(complete.payload(), b"HELLOWORLD");

    assert_eq!(
        reassembler.observer().as_slice(),
        &[ReassemblyEvent::Completed {
            payload_id: PayloadId::new(1),
            len: 10,
        }]
    );
}

#[rstest]
#[case::empty(0)]
#[case::one(1)]
#[case::under_fragment(3)]
#[case::exact_fragment(4)]
#[case::over_fragment(5)]
#[case::max_payload(64)]
fn reassembler_round_trips_in_both_orders(#[case] len: usize) {
    let payload: Vec<u8> = (0..len).map(|i| u8::try_from(i % 251).expect("fits")).collect();
    let fragments = fragments(4, 3, &payload);

    for order in [false, true] {
        let mut reassembler = recording_reassembler(config(4, 4, 64));
        let mut completions = Vec::new();
        let ordered: Vec<&Fragment> = if order {
            fragments.iter().rev().collect()
        } else {
            fragments.iter().collect()
        };
        for fragment in ordered {
            if let Some(complete) = reassembler.accept(fragment) {
                completions.push(complete.to_vec());
            }
        }
        assert_eq!(completions, vec![payload.clone()], "reversed={order}");
    }
}

#[test]
fn reassembler_ignores_duplicates_after_completion() {
    let fragments = fragments(4, 2, b"HELLOWORLD");
    let mut reassembler = recording_reassembler(config(4, 4, 64));

    let mut completed = 0;
    for fragment in &fragments {
        completed += usize::from(reassembler.accept(fragment).is_some());
    }
    for fragment in fragments.iter().rev() {
        assert!(reassembler.accept(fragment).is_none());
    }

    assert_eq!(completed, 1);
    assert_eq!(
        reassembler.slot_state(PayloadId::new(2)),
        SlotState::Done {
            payload_id: PayloadId::new(2),
            len: 10,
        }
    );
    assert_eq!(reassembler.observer().len(), 1);
}

#[test]
fn reassembler_counts_duplicate_fragment_once() {
    let fragments = fragments(4, 5, b"HELLOWORLD");
    let mut reassembler = recording_reassembler(config(4, 4, 64));

    assert!(reassembler.accept(&fragments[0]).is_none());
    assert!(reassembler.accept(&fragments[0]).is_none());
    assert!(reassembler.accept(&fragments[2]).is_none());

    let complete = reassembler.accept(&fragments[1]).expect("complete");
    assert_eq!(complete.payload(), b"HELLOWORLD");
}

#[rstest]
#[case::index_equals_count(raw(1, 3, 3, b"HELL"), RejectReason::IndexOutOfRange { index: 3, count: 3 })]
#[case::index_claims_terminal_position(raw(1, 2, 3, b"HELL"), RejectReason::IndexOutOfRange { index: 2, count: 3 })]
#[case::terminal_length_mismatch(raw(1, -2, 3, b"LDX"), RejectReason::LengthMismatch { expected: 2, found: 3 })]
#[case::short_full_fragment(raw(1, 0, 3, b"HEL"), RejectReason::LengthMismatch { expected: 4, found: 3 })]
#[case::terminal_longer_than_fragment(raw(1, -5, 2, b"HELLO"), RejectReason::LengthMismatch { expected: 4, found: 5 })]
#[case::zero_count(raw(1, 0, 0, b""), RejectReason::InvalidSequenceCount { count: 0 })]
#[case::negative_count(raw(1, -1, -3, b"H"), RejectReason::InvalidSequenceCount { count: -3 })]
#[case::too_many_fragments(raw(1, 0, 17, b"HELL"), RejectReason::TooManyFragments { count: 17, limit: 16 })]
#[case::empty_terminal_of_multi_fragment(raw(1, 0, 2, b""), RejectReason::LengthMismatch { expected: 4, found: 0 })]
fn reassembler_rejects_malformed_fragments(
    #[case] fragment: Fragment,
    #[case] reason: RejectReason,
) {
    let mut reassembler = recording_reassembler(config(4, 4, 64));

    assert!(reassembler.accept(&fragment).is_none());

    assert_eq!(reassembler.slot_state(PayloadId::new(1)), SlotState::Empty);
    assert_eq!(reassembler.in_flight(), 0);
    assert_eq!(
        reassembler.observer().as_slice(),
        &[ReassemblyEvent::Rejected {
            header: Some(*fragment.header()),
            reason,
        }]
    );
}

#[test]
fn reassembler_rejects_terminal_beyond_max_payload() {
    // 10 fragments of 4 bytes may hold up to 40 bytes, but the limit is 38.
    let mut reassembler = recording_reassembler(config(4, 4, 38));

    assert!(reassembler.accept(&raw(1, -4, 10, b"WXYZ")).is_none());
    assert!(matches!(
        reassembler.observer().as_slice(),
        [ReassemblyEvent::Rejected {
            reason: RejectReason::PayloadTooLarge {
                attempted: 40,
                limit: 38,
            },
            ..
        }]
    ));
    assert!(reassembler.accept(&raw(1, -2, 10, b"WX")).is_none());
    assert_eq!(reassembler.in_flight(), 1);
}

#[test]
fn malformed_fragment_leaves_partial_slot_untouched() {
    let fragments = fragments(4, 1, b"HELLOWORLD");
    let mut reassembler = recording_reassembler(config(4, 4, 64));

    assert!(reassembler.accept(&fragments[0]).is_none());
    assert!(reassembler.accept(&raw(1, 3, 3, b"XXXX")).is_none());
    assert!(reassembler.accept(&raw(1, -2, 3, b"XXX")).is_none());
    assert!(reassembler.accept(&fragments[2]).is_none());

    let complete = reassembler.accept(&fragments[1]).expect("complete");
    assert_eq!(complete.payload(), b"HELLOWORLD");
}

#[test]
fn reassembler_rejects_sequence_count_change_within_payload() {
    let mut reassembler = recording_reassembler(config(4, 4, 64));

    assert!(reassembler.accept(&raw(1, 0, 3, b"HELL")).is_none());
    assert!(reassembler.accept(&raw(1, -2, 2, b"LD")).is_none());

    assert_eq!(
        reassembler.observer().last(),
        Some(&ReassemblyEvent::Rejected {
            header: Some(FragmentHeader::new(PayloadId::new(1), -2, 2)),
            reason: RejectReason::SequenceCountMismatch {
                payload_id: PayloadId::new(1),
                expected: 3,
                found: 2,
            },
        })
    );
    assert_eq!(
        reassembler.slot_state(PayloadId::new(1)),
        SlotState::Filling {
            payload_id: PayloadId::new(1),
            received: 1,
            expected: 3,
        }
    );
}

#[test]
fn reassembler_accepts_encoded_datagrams() {
    let fragments = fragments(4, 6, b"HELLOWORLD");
    let mut reassembler = recording_reassembler(config(4, 4, 64));

    let mut output = None;
    for fragment in fragments.iter().rev() {
        let datagram = fragment.encode().expect("encode");
        output = reassembler.accept_datagram(&datagram).map(|p| p.to_bytes());
    }
    assert_eq!(output, Some(Bytes::from_static(b"HELLOWORLD")));
}

#[test]
fn reassembler_reports_undecodable_datagram() {
    let mut reassembler = recording_reassembler(config(4, 4, 64));

    assert!(reassembler.accept_datagram(&[0, 1, 2]).is_none());
    assert!(matches!(
        reassembler.observer().as_slice(),
        [ReassemblyEvent::Rejected {
            header: None,
            reason: RejectReason::Undecodable(_),
        }]
    ));
    assert_eq!(reassembler.in_flight(), 0);
}

#[test]
fn observer_can_be_drained_between_fragments() {
    let fragments = fragments(4, 2, b"HELLOWORLD");
    let mut reassembler = recording_reassembler(config(4, 4, 64));

    assert!(reassembler.accept(&raw(2, 3, 3, b"HELL")).is_none());
    let drained: Vec<_> = reassembler.observer_mut().drain(..).collect();
    assert_eq!(drained.len(), 1);

    for fragment in &fragments {
        let _ = reassembler.accept(fragment);
    }
    assert_eq!(
        reassembler.into_observer(),
        vec![ReassemblyEvent::Completed {
            payload_id: PayloadId::new(2),
            len: 10,
        }]
    );
}

#[test]
fn boxed_observer_forwards_events() {
    let observer = Box::new(Vec::<ReassemblyEvent>::new());
    let mut reassembler =
        Reassembler::with_observer(config(4, 4, 64), observer).expect("valid configuration");

    for fragment in &fragments(4, 1, b"HI") {
        assert!(reassembler.accept(fragment).is_some());
    }
    assert!(reassembler.accept(&raw(1, 0, 0, b"")).is_none());

    let events = reassembler.into_observer();
    assert_eq!(
        events.as_slice(),
        &[
            ReassemblyEvent::Completed {
                payload_id: PayloadId::new(1),
                len: 2,
            },
            ReassemblyEvent::Rejected {
                header: Some(FragmentHeader::new(PayloadId::new(1), 0, 0)),
                reason: RejectReason::InvalidSequenceCount { count: 0 },
            },
        ]
    );
}
