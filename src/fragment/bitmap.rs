//! Fixed-capacity bitset recording which fragments of a slot have arrived.

const WORD_BITS: usize = u64::BITS as usize;

/// One bit per fragment index plus a running count of set bits.
///
/// The count makes the completion check O(1) regardless of how many
/// fragments a payload spans.
#[derive(Clone, Debug)]
pub(crate) struct AvailabilityBitmap {
    words: Box<[u64]>,
    set: usize,
}

impl AvailabilityBitmap {
    /// Allocate a cleared bitmap able to track `bits` fragments.
    pub(crate) fn new(bits: usize) -> Self {
        Self {
            words: vec![0; bits.div_ceil(WORD_BITS)].into_boxed_slice(),
            set: 0,
        }
    }

    /// Set bit `index`, returning `true` if it was previously clear.
    pub(crate) fn insert(&mut self, index: usize) -> bool {
        let mask = 1_u64 << (index % WORD_BITS);
        let word = &mut self.words[index / WORD_BITS];
        if *word & mask != 0 {
            return false;
        }
        *word |= mask;
        self.set += 1;
        true
    }

    /// Report whether bit `index` is set.
    #[cfg(test)]
    pub(crate) fn contains(&self, index: usize) -> bool {
        self.words
            .get(index / WORD_BITS)
            .is_some_and(|word| word & (1_u64 << (index % WORD_BITS)) != 0)
    }

    /// Number of set bits.
    pub(crate) const fn count(&self) -> usize { self.set }

    /// Clear every bit.
    pub(crate) fn clear(&mut self) {
        if self.set == 0 {
            return;
        }
        self.words.fill(0);
        self.set = 0;
    }
}
