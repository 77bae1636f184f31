#![doc(html_root_url = "https://docs.rs/fragwire/latest")]
//! Public API for the `fragwire` library.
//!
//! This crate splits payloads into datagram-sized fragments and reassembles
//! them on the receiving side, tolerating reordering, duplication and loss.
//! It opens no sockets: callers feed it payloads and received datagrams and
//! hand the produced fragments to their own transport.
//!
//! ```
//! use std::num::NonZeroUsize;
//!
//! use fragwire::{FragmentationConfig, Fragmenter, PayloadId, Reassembler};
//!
//! let config = FragmentationConfig::new(
//!     NonZeroUsize::new(4).unwrap(),
//!     NonZeroUsize::new(8).unwrap(),
//!     NonZeroUsize::new(64).unwrap(),
//! );
//! let fragmenter = Fragmenter::new(config).unwrap();
//! let mut reassembler = Reassembler::new(config).unwrap();
//!
//! let batch = fragmenter.fragment(PayloadId::new(1), &b"HELLOWORLD"[..]).unwrap();
//! let mut output = None;
//! for fragment in batch.fragments().iter().rev() {
//!     output = reassembler.accept(fragment).map(|payload| payload.to_vec());
//! }
//! assert_eq!(output.as_deref(), Some(&b"HELLOWORLD"[..]));
//! ```

pub mod fragment;
pub mod metrics;

pub use fragment::{
    ConfigError,
    Eviction,
    EvictionCause,
    Fragment,
    FragmentBatch,
    FragmentHeader,
    FragmentKind,
    FragmentSink,
    FragmentationConfig,
    FragmentationError,
    Fragmenter,
    HEADER_LEN,
    LogObserver,
    PayloadId,
    ReassembledPayload,
    Reassembler,
    ReassemblyEvent,
    ReassemblyObserver,
    RejectReason,
    SharedReassembler,
    SlotState,
};
