//! Log output produced by the default observer.

use fragwire::{Fragment, FragmentHeader, PayloadId, Reassembler};
use fragwire_testing::{LoggerHandle, logger, sample_payload, small_config};
use rstest::rstest;
use serial_test::serial;

fn reassembler() -> Reassembler { Reassembler::new(small_config(4, 2, 64)).expect("valid config") }

#[rstest]
#[serial(logging)]
fn eviction_logs_dropped_packet_warning(mut logger: LoggerHandle) {
    let mut reassembler = reassembler();
    let first = Fragment::new(
        FragmentHeader::new(PayloadId::new(0), 0, 3),
        sample_payload(4),
    );
    let second = Fragment::new(
        FragmentHeader::new(PayloadId::new(2), 0, 3),
        sample_payload(4),
    );

    assert!(reassembler.accept(&first).is_none());
    assert!(reassembler.accept(&second).is_none());

    let records = logger.drain();
    let warning = records
        .iter()
        .find(|(level, _)| *level == log::Level::Warn)
        .expect("eviction must log a warning");
    assert!(
        warning.1.contains("dropped packet: payload_id=0"),
        "unexpected message: {}",
        warning.1
    );
    assert!(warning.1.contains("1/3 fragments"));
    assert!(warning.1.contains("reclaimed by payload_id=2"));
}

#[rstest]
#[serial(logging)]
fn malformed_fragment_logs_at_debug(mut logger: LoggerHandle) {
    let mut reassembler = reassembler();
    let malformed = Fragment::new(FragmentHeader::new(PayloadId::new(1), 3, 3), sample_payload(4));

    assert!(reassembler.accept(&malformed).is_none());

    let records = logger.drain();
    assert!(
        records.iter().any(|(level, message)| *level == log::Level::Debug
            && message.contains("discarding fragment: payload_id=1")
            && message.contains("out of range")),
        "expected debug rejection record, got {records:?}"
    );
    assert!(records.iter().all(|(level, _)| *level != log::Level::Warn));
}

#[rstest]
#[serial(logging)]
fn completion_is_silent(mut logger: LoggerHandle) {
    let mut reassembler = reassembler();
    let single = Fragment::new(FragmentHeader::new(PayloadId::new(1), -2, 1), sample_payload(2));

    assert!(reassembler.accept(&single).is_some());
    assert!(logger.drain().is_empty());
}
