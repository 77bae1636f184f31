//! Configuration fixed at construction for fragmenters and reassemblers.

use std::{num::NonZeroUsize, time::Duration};

use super::{ConfigError, header::HEADER_LEN};

/// Default datagram budget the fragment size is derived from.
pub const DEFAULT_DATAGRAM_BUDGET: usize = 1200;
/// Default payload bytes per non-terminal fragment.
pub const DEFAULT_FRAGMENT_SIZE: usize = DEFAULT_DATAGRAM_BUDGET - HEADER_LEN;
/// Default number of payloads that may be mid-reassembly at once.
pub const DEFAULT_MAX_IN_FLIGHT: usize = 64;
/// Default upper bound on a reassembled payload.
pub const DEFAULT_MAX_PAYLOAD_SIZE: usize = 65_536;

/// Settings that bound fragment sizes and reassembly resource usage.
///
/// The reassembler preallocates `max_in_flight` slots of `max_payload_size`
/// bytes each, so these values directly determine its memory footprint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FragmentationConfig {
    /// Payload bytes carried by every non-terminal fragment.
    pub fragment_size: NonZeroUsize,
    /// Number of reassembly slots, bounding concurrently reassembling payloads.
    pub max_in_flight: NonZeroUsize,
    /// Hard cap on the size of a single payload.
    pub max_payload_size: NonZeroUsize,
    /// Age after which a partially filled slot may be purged.
    ///
    /// `None` keeps partial slots until a colliding payload evicts them.
    pub stale_after: Option<Duration>,
}

impl Default for FragmentationConfig {
    fn default() -> Self {
        Self {
            fragment_size: non_zero(DEFAULT_FRAGMENT_SIZE),
            max_in_flight: non_zero(DEFAULT_MAX_IN_FLIGHT),
            max_payload_size: non_zero(DEFAULT_MAX_PAYLOAD_SIZE),
            stale_after: None,
        }
    }
}

impl FragmentationConfig {
    /// Build a configuration from explicit bounds.
    #[must_use]
    pub const fn new(
        fragment_size: NonZeroUsize,
        max_in_flight: NonZeroUsize,
        max_payload_size: NonZeroUsize,
    ) -> Self {
        Self {
            fragment_size,
            max_in_flight,
            max_payload_size,
            stale_after: None,
        }
    }

    /// Derive a configuration from the largest datagram the transport sends.
    ///
    /// The fragment size is whatever remains of `datagram_budget` after the
    /// fixed header. Returns `None` when the budget cannot fit a header plus
    /// at least one payload byte.
    #[must_use]
    pub fn for_datagram_budget(
        datagram_budget: usize,
        max_in_flight: NonZeroUsize,
        max_payload_size: NonZeroUsize,
    ) -> Option<Self> {
        let fragment_size = NonZeroUsize::new(datagram_budget.checked_sub(HEADER_LEN)?)?;
        Some(Self::new(fragment_size, max_in_flight, max_payload_size))
    }

    /// Enable purging of partial reassemblies older than `stale_after`.
    #[must_use]
    pub const fn with_stale_after(mut self, stale_after: Duration) -> Self {
        self.stale_after = Some(stale_after);
        self
    }

    /// Maximum number of fragments a single payload may be split into.
    #[must_use]
    pub const fn max_fragments(&self) -> usize {
        self.max_payload_size.get().div_ceil(self.fragment_size.get())
    }

    /// Largest datagram a fragment produced under this configuration occupies.
    #[must_use]
    pub const fn encoded_fragment_ceiling(&self) -> usize { self.fragment_size.get() + HEADER_LEN }

    /// Check that every bound is representable in the `i32` wire fields.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] naming the first bound that does not fit.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let max = usize::try_from(i32::MAX).unwrap_or(usize::MAX);
        if self.fragment_size.get() > max {
            return Err(ConfigError::FragmentSizeTooLarge {
                fragment_size: self.fragment_size.get(),
            });
        }
        if self.max_payload_size.get() > max {
            return Err(ConfigError::PayloadSizeTooLarge {
                max_payload_size: self.max_payload_size.get(),
            });
        }
        Ok(())
    }
}

const fn non_zero(value: usize) -> NonZeroUsize {
    match NonZeroUsize::new(value) {
        Some(value) => value,
        None => panic!("default configuration values must be non-zero"),
    }
}
