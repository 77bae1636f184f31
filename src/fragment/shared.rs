//! Thread-safe wrapper for feeding one [`Reassembler`] from several receive loops.
//!
//! Slot eviction and bit updates are not independently atomic, so the whole
//! accept sequence runs under a single mutex. Completed payloads are copied
//! out before the lock is released.

#[cfg(not(loom))]
use std::sync::{Mutex, MutexGuard};
use std::sync::{Arc, PoisonError};

use bytes::Bytes;
#[cfg(loom)]
use loom::sync::{Mutex, MutexGuard};

use super::{
    ConfigError,
    Fragment,
    FragmentationConfig,
    LogObserver,
    PayloadId,
    Reassembler,
    ReassemblyObserver,
};

/// Cloneable handle to a mutex-protected [`Reassembler`].
#[derive(Debug)]
pub struct SharedReassembler<O = LogObserver> {
    inner: Arc<Mutex<Reassembler<O>>>,
}

impl<O> Clone for SharedReassembler<O> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl SharedReassembler {
    /// Create a shared re-assembler reporting through [`LogObserver`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the configuration is not representable.
    pub fn new(config: FragmentationConfig) -> Result<Self, ConfigError> {
        Reassembler::new(config).map(Self::from)
    }
}

impl<O: ReassemblyObserver> SharedReassembler<O> {
    /// Create a shared re-assembler reporting to `observer`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the configuration is not representable.
    pub fn with_observer(config: FragmentationConfig, observer: O) -> Result<Self, ConfigError> {
        Reassembler::with_observer(config, observer).map(Self::from)
    }

    /// Accept one fragment, returning an owned copy of a completed payload.
    #[must_use]
    pub fn accept(&self, fragment: &Fragment) -> Option<Bytes> {
        self.lock()
            .accept(fragment)
            .map(|payload| payload.to_bytes())
    }

    /// Decode and accept one datagram, returning an owned completed payload.
    #[must_use]
    pub fn accept_datagram(&self, datagram: &[u8]) -> Option<Bytes> {
        self.lock()
            .accept_datagram(datagram)
            .map(|payload| payload.to_bytes())
    }

    /// Evict stale partial payloads. See [`Reassembler::purge_stale`].
    pub fn purge_stale(&self) -> Vec<PayloadId> { self.lock().purge_stale() }

    /// Number of slots currently holding a partial payload.
    #[must_use]
    pub fn in_flight(&self) -> usize { self.lock().in_flight() }

    /// Run `f` with exclusive access to the underlying re-assembler.
    pub fn with_reassembler<R>(&self, f: impl FnOnce(&mut Reassembler<O>) -> R) -> R {
        f(&mut self.lock())
    }

    // A panic while holding the lock leaves slot state consistent at fragment
    // granularity, so poisoning is ignored.
    fn lock(&self) -> MutexGuard<'_, Reassembler<O>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<O> From<Reassembler<O>> for SharedReassembler<O> {
    fn from(reassembler: Reassembler<O>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(reassembler)),
        }
    }
}
