use bincode::{Decode, Encode};
use derive_more::{Display, From, Into};

/// Caller-assigned identifier shared by every fragment of one payload.
///
/// The fragmentation layer never allocates identifiers itself; the session
/// layer above hands them out and is responsible for keeping them distinct
/// while a payload may still be in flight.
///
/// # Examples
///
/// ```
/// use fragwire::fragment::PayloadId;
/// let id = PayloadId::new(42);
/// assert_eq!(id.get(), 42);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Encode, Decode, Display, From, Into)]
#[display("{_0}")]
pub struct PayloadId(i32);

impl PayloadId {
    /// Create a new identifier.
    #[must_use]
    pub const fn new(value: i32) -> Self { Self(value) }

    /// Return the inner numeric identifier.
    #[must_use]
    pub const fn get(self) -> i32 { self.0 }

    /// Map the identifier onto a table of `capacity` slots.
    ///
    /// Negative identifiers wrap onto the table the same way positive ones
    /// do, so every identifier lands on a valid slot.
    #[must_use]
    pub fn slot_index(self, capacity: std::num::NonZeroUsize) -> usize {
        let capacity = i64::try_from(capacity.get()).unwrap_or(i64::MAX);
        let index = i64::from(self.0).rem_euclid(capacity);
        usize::try_from(index).unwrap_or_default()
    }
}
