use std::hash::Hash;

use crate::transform;

/// A totally-ordered numeric value the distribution engine can bucket.
///
/// NaN and other unordered values are outside the contract: feeding them
/// in is undefined behavior for the sort (the output is some permutation
/// of the input, but not necessarily ordered).
pub trait SortKey: Copy + PartialOrd {
    /// Identity key for frequency counting. Floats key by bit pattern so
    /// the table can hash them.
    type Bits: Copy + Eq + Hash;

    fn bits(self) -> Self::Bits;

    /// Raw-domain coordinate, used by the raw-value fallback map.
    fn as_scalar(self) -> f64;

    /// The default compressed-magnitude transform.
    #[inline]
    fn compressed_log(self) -> f32 {
        transform::compress(self.as_scalar() as f32)
    }
}

macro_rules! impl_sort_key_int {
    ($($t:ty),*) => {$(
        impl SortKey for $t {
            type Bits = $t;

            #[inline]
            fn bits(self) -> $t {
                self
            }

            #[inline]
            fn as_scalar(self) -> f64 {
                self as f64
            }
        }
    )*};
}

impl_sort_key_int!(i32, i64, u32, u64);

impl SortKey for f32 {
    type Bits = u32;

    #[inline]
    fn bits(self) -> u32 {
        self.to_bits()
    }

    #[inline]
    fn as_scalar(self) -> f64 {
        self as f64
    }
}

impl SortKey for f64 {
    type Bits = u64;

    #[inline]
    fn bits(self) -> u64 {
        self.to_bits()
    }

    #[inline]
    fn as_scalar(self) -> f64 {
        self
    }
}
