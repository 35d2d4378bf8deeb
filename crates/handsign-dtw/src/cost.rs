//! Alignment cost newtype wrapper.

use std::cmp::Ordering;
use std::fmt;

/// A non-negative DTW alignment cost, raw or length-normalized.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct AlignmentCost(f64);

impl AlignmentCost {
    /// Infinite cost, used when no admissible warping path exists.
    pub const INFINITY: Self = Self(f64::INFINITY);

    /// Zero cost, the alignment of a sequence with itself.
    pub const ZERO: Self = Self(0.0);

    /// Create a new alignment cost from a raw value.
    pub(crate) fn new(value: f64) -> Self {
        Self(value)
    }

    /// Return the raw cost value.
    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }

    /// Return true if no admissible warping path was found.
    #[must_use]
    pub fn is_infinite(self) -> bool {
        self.0.is_infinite()
    }

    /// Divide by the reference length.
    pub(crate) fn normalized_by(self, len: usize) -> Self {
        Self(self.0 / len as f64)
    }

    /// Total ordering comparison using [`f64::total_cmp`].
    #[must_use]
    pub fn total_cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl fmt::Display for AlignmentCost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}", self.0)
    }
}
