//! Builders and drivers shared by `fragwire` integration tests.

use std::num::NonZeroUsize;

use fragwire::{
    Fragment,
    FragmentationConfig,
    Fragmenter,
    ReassemblyEvent,
    ReassemblyObserver,
    Reassembler,
};

/// Build a configuration from plain sizes.
///
/// # Panics
///
/// Panics if any size is zero or the configuration is not representable.
#[must_use]
pub fn small_config(
    fragment_size: usize,
    max_in_flight: usize,
    max_payload_size: usize,
) -> FragmentationConfig {
    let config = FragmentationConfig::new(
        NonZeroUsize::new(fragment_size).expect("fragment size must be non-zero"),
        NonZeroUsize::new(max_in_flight).expect("slot count must be non-zero"),
        NonZeroUsize::new(max_payload_size).expect("payload size must be non-zero"),
    );
    config.validate().expect("test configuration must be valid");
    config
}

/// Build a fragmenter and an event-recording reassembler sharing `config`.
///
/// # Panics
///
/// Panics if the configuration is rejected.
#[must_use]
pub fn recording_pair(
    config: FragmentationConfig,
) -> (Fragmenter, Reassembler<Vec<ReassemblyEvent>>) {
    let fragmenter = Fragmenter::new(config).expect("fragmenter config");
    let reassembler = Reassembler::with_observer(config, Vec::new()).expect("reassembler config");
    (fragmenter, reassembler)
}

/// Deterministic payload whose bytes identify their own offset.
#[must_use]
pub fn sample_payload(len: usize) -> Vec<u8> {
    (0..len)
        .map(|i| u8::try_from(i % 251).unwrap_or_default())
        .collect()
}

/// Feed `fragments` to `reassembler` in the given index `order`.
///
/// Returns every payload completed along the way, copied out.
///
/// # Panics
///
/// Panics if `order` names an index outside `fragments`.
pub fn feed<O: ReassemblyObserver>(
    reassembler: &mut Reassembler<O>,
    fragments: &[Fragment],
    order: impl IntoIterator<Item = usize>,
) -> Vec<Vec<u8>> {
    order
        .into_iter()
        .filter_map(|index| {
            let fragment = fragments.get(index).expect("order index out of range");
            reassembler.accept(fragment).map(|payload| payload.to_vec())
        })
        .collect()
}

/// Feed every fragment in slice order.
pub fn feed_all<O: ReassemblyObserver>(
    reassembler: &mut Reassembler<O>,
    fragments: &[Fragment],
) -> Vec<Vec<u8>> {
    feed(reassembler, fragments, 0..fragments.len())
}
