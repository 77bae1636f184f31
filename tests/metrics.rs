#![cfg(feature = "metrics")]
//! Tests for `fragwire` metrics.
//!
//! These tests verify that counters update as expected using
//! `metrics_util::debugging::DebuggingRecorder`.

use fragwire::{
    Fragment,
    FragmentHeader,
    PayloadId,
    Reassembler,
    metrics::{FRAGMENTS_REJECTED, FRAGMENTS_SENT, PAYLOADS_REASSEMBLED, REASSEMBLIES_EVICTED},
};
use fragwire_testing::{counter_value, sample_payload, small_config, with_recorder};

fn fragment(id: i32, sequence_num: i32, sequence_count: i32, len: usize) -> Fragment {
    Fragment::new(
        FragmentHeader::new(PayloadId::new(id), sequence_num, sequence_count),
        sample_payload(len),
    )
}

#[test]
fn fragment_into_counts_sent_fragments() {
    let snapshot = with_recorder(|| {
        let fragmenter = fragwire::Fragmenter::new(small_config(4, 2, 64)).expect("config");
        let mut sink: Vec<Fragment> = Vec::new();
        fragmenter
            .fragment_into(PayloadId::new(1), sample_payload(10), &mut sink)
            .expect("fragment");
    });

    assert_eq!(counter_value(&snapshot, FRAGMENTS_SENT, None), 3);
}

#[test]
fn reassembler_counts_completions_rejections_and_evictions() {
    let snapshot = with_recorder(|| {
        let mut reassembler = Reassembler::new(small_config(4, 2, 64)).expect("config");
        assert!(reassembler.accept(&fragment(0, 0, 2, 4)).is_none());
        // Same slot as payload 0, so this evicts it before completing.
        assert!(reassembler.accept(&fragment(2, -1, 1, 1)).is_some());
        assert!(reassembler.accept(&fragment(3, -3, 1, 1)).is_none());
        assert!(reassembler.accept_datagram(&[1, 2]).is_none());
    });

    assert_eq!(counter_value(&snapshot, PAYLOADS_REASSEMBLED, None), 1);
    assert_eq!(
        counter_value(&snapshot, REASSEMBLIES_EVICTED, Some(("cause", "collision"))),
        1
    );
    assert_eq!(
        counter_value(&snapshot, FRAGMENTS_REJECTED, Some(("reason", "length_mismatch"))),
        1
    );
    assert_eq!(
        counter_value(&snapshot, FRAGMENTS_REJECTED, Some(("reason", "undecodable"))),
        1
    );
    assert_eq!(counter_value(&snapshot, FRAGMENTS_REJECTED, None), 2);
}
