//! Fragmentation and reassembly for unreliable datagram transports.
//!
//! Outbound payloads larger than a datagram are split by [`Fragmenter`] into
//! fragments of at most `fragment_size` bytes. Inbound fragments, in any
//! order, are fed to a [`Reassembler`] which reports each payload once all of
//! its fragments have arrived. Nothing is retransmitted: a payload missing a
//! fragment simply never completes and is eventually evicted.

mod bitmap;
pub mod config;
pub mod error;
pub mod fragmenter;
pub mod header;
pub mod id;
pub mod observer;
pub mod packet;
pub mod reassembler;
pub mod shared;
pub mod sink;
mod slot;

pub use config::FragmentationConfig;
pub use error::{ConfigError, FragmentationError, RejectReason};
pub use fragmenter::{FragmentBatch, FragmentCursor, Fragmenter};
pub use header::{FragmentHeader, FragmentKind, HEADER_LEN};
pub use id::PayloadId;
pub use observer::{Eviction, EvictionCause, LogObserver, ReassemblyEvent, ReassemblyObserver};
pub use packet::{Fragment, decode_datagram};
pub use reassembler::{ReassembledPayload, Reassembler};
pub use shared::SharedReassembler;
pub use sink::FragmentSink;
pub use slot::SlotState;
