//! Lane-interleaved packing of spectrum pairs.
//!
//! A 4-wide SIMD kernel finishes its last butterfly pass with each lane
//! holding a contiguous quarter of the spectrum. Writing the registers back
//! without a transpose interleaves those quarters: packed slot
//! `q * LANES + lane` holds ordered pair `lane * (pairs / LANES) + q`.
//!
//! Slot 0 always maps to pair 0, which keeps the real-domain DC/Nyquist
//! cells in place.

/// Number of interleaved lanes.
pub const LANES: usize = 4;

/// Permutation between packed slots and ordered pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LanePermutation {
    pairs: usize,
    stride: usize,
}

impl LanePermutation {
    /// Permutation over `pairs` complex pairs. `None` unless `pairs` is a
    /// non-zero multiple of [`LANES`].
    pub fn new(pairs: usize) -> Option<Self> {
        if pairs == 0 || pairs % LANES != 0 {
            return None;
        }
        Some(Self {
            pairs,
            stride: pairs / LANES,
        })
    }

    pub fn pairs(&self) -> usize {
        self.pairs
    }

    /// Ordered pair stored in packed `slot`.
    #[inline]
    pub fn pair_of_slot(&self, slot: usize) -> usize {
        (slot % LANES) * self.stride + slot / LANES
    }

    /// Packed slot holding ordered `pair`.
    #[inline]
    pub fn slot_of_pair(&self, pair: usize) -> usize {
        (pair % self.stride) * LANES + pair / self.stride
    }

    /// Packed to ordered. Both slices hold `2 * pairs` cells.
    pub fn unpack(&self, packed: &[f32], ordered: &mut [f32]) {
        for slot in 0..self.pairs {
            let pair = self.pair_of_slot(slot);
            ordered[2 * pair] = packed[2 * slot];
            ordered[2 * pair + 1] = packed[2 * slot + 1];
        }
    }

    /// Ordered to packed. Both slices hold `2 * pairs` cells.
    pub fn pack(&self, ordered: &[f32], packed: &mut [f32]) {
        for slot in 0..self.pairs {
            let pair = self.pair_of_slot(slot);
            packed[2 * slot] = ordered[2 * pair];
            packed[2 * slot + 1] = ordered[2 * pair + 1];
        }
    }
}
