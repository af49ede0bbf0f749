//! Compressed-magnitude transform and the linear bucket-index map.
//!
//! The transform keeps small values linearly discriminated and compresses
//! large magnitudes into log space, so a bounded number of buckets spreads
//! values roughly evenly across many orders of magnitude. Only
//! monotonicity and a bounded relative error matter for bucket
//! assignment; exact logarithms are not required.

use crate::TUNED_PARAMS;
use crate::key::SortKey;

/// Low-precision base-2 logarithm: exponent extraction plus a quadratic
/// correction over the mantissa. Strictly increasing for finite `x >= 2`,
/// absolute error below 0.01.
#[inline]
pub fn fast_log2(x: f32) -> f32 {
    let bits = x.to_bits() as i32;
    let exponent = (((bits >> 23) & 255) - 128) as f32;
    let mantissa = f32::from_bits(((bits & !(255 << 23)) + (127 << 23)) as u32);
    exponent + (-0.335_828_78_f32 * mantissa + 2.0) * mantissa - 0.658_717_6
}

/// The compressed-magnitude transform `T`.
///
/// `|x| < 2` is passed through unchanged; larger magnitudes map to
/// `sign(x) * (fast_log2(|x|) + 1)`. The `+1` keeps `T` strictly
/// increasing across the identity/log seam at `|x| = 2`.
#[inline]
pub fn compress(x: f32) -> f32 {
    let magnitude = x.abs();
    if magnitude < 2.0 {
        return x;
    }
    let lg = fast_log2(magnitude) + 1.0;
    if x < 0.0 { -lg } else { lg }
}

/// Coefficients of `index(t) = a * t + b`, fitted through two points.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearMap {
    a: f64,
    b: f64,
}

impl LinearMap {
    /// Two-point form mapping `x1 -> y1` and `x2 -> y2`. A degenerate
    /// domain (`x1 == x2`) yields the identity-zero map.
    #[inline]
    pub fn two_point(x1: f64, x2: f64, y1: f64, y2: f64) -> Self {
        let dx = x1 - x2;
        if dx == 0.0 {
            return Self { a: 0.0, b: 0.0 };
        }
        let a = (y1 - y2) / dx;
        Self { a, b: y1 - a * x1 }
    }

    /// Applies the map and clamps into `[0, bucket_count - 1]`, absorbing
    /// floating-point rounding at the extremes.
    #[inline]
    pub fn index_of(&self, t: f64, bucket_count: usize) -> usize {
        let raw = (self.a * t + self.b) as isize;
        raw.clamp(0, bucket_count as isize - 1) as usize
    }
}

/// Mapping strategy chosen for one partition step: the usual log-domain
/// map over `T(x)`, or the raw-value-domain fallback for buckets whose
/// values cluster too closely in log space to discriminate.
pub(crate) enum BucketMap {
    Log(LinearMap),
    Raw(LinearMap),
}

impl BucketMap {
    #[inline]
    pub(crate) fn index_of<V, F>(&self, value: V, transform: &F, bucket_count: usize) -> usize
    where
        V: SortKey,
        F: Fn(V) -> f32,
    {
        match self {
            Self::Log(map) => map.index_of(transform(value) as f64, bucket_count),
            Self::Raw(map) => map.index_of(value.as_scalar(), bucket_count),
        }
    }
}

/// Picks the map for partitioning `[min, max]` into `bucket_count`
/// sub-buckets. Falls back to the raw value domain when the transformed
/// span is below the epsilon threshold.
pub(crate) fn choose_map<V, F>(min: V, max: V, transform: &F, bucket_count: usize) -> BucketMap
where
    V: SortKey,
    F: Fn(V) -> f32,
{
    let min_log = transform(min) as f64;
    let max_log = transform(max) as f64;
    let top = (bucket_count - 1) as f64;

    if max_log - min_log < TUNED_PARAMS.log_domain_epsilon as f64 {
        BucketMap::Raw(LinearMap::two_point(
            min.as_scalar(),
            max.as_scalar(),
            0.0,
            top,
        ))
    } else {
        BucketMap::Log(LinearMap::two_point(min_log, max_log, 0.0, top))
    }
}
