//! Utilities for exercising `fragwire` fragmenters and reassemblers in tests.
//!
//! The helpers build small configurations, generate recognisable payloads,
//! and feed fragment sequences to a reassembler in a chosen order while
//! collecting every completed payload.
//!
//! ```rust
//! use fragwire::PayloadId;
//! use fragwire_testing::{feed, recording_pair, sample_payload, small_config};
//!
//! let (fragmenter, mut reassembler) = recording_pair(small_config(4, 4, 64));
//! let payload = sample_payload(10);
//! let batch = fragmenter.fragment(PayloadId::new(1), payload.clone()).unwrap();
//! let completed = feed(&mut reassembler, batch.fragments(), [2, 0, 1]);
//! assert_eq!(completed, vec![payload]);
//! ```

pub mod helpers;
pub mod logging;
pub mod metrics;

pub use helpers::{feed, feed_all, recording_pair, sample_payload, small_config};
pub use logging::{LoggerHandle, logger};
pub use metrics::{MetricsSnapshot, counter_value, with_recorder};
