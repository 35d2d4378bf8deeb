//! Euclidean point distance.

use crate::error::MatchError;
use crate::sequence::Point;

/// Euclidean distance between two points of equal dimensionality.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`MatchError::DimensionMismatch`] | `b` has a different coordinate count than `a` |
pub fn euclidean(a: &Point, b: &Point) -> Result<f64, MatchError> {
    if a.dim() != b.dim() {
        return Err(MatchError::DimensionMismatch {
            expected: a.dim(),
            got: b.dim(),
            index: 0,
        });
    }
    Ok(euclidean_unchecked(a.coords(), b.coords()))
}

/// Euclidean distance over already-validated coordinate slices of equal length.
#[inline]
pub(crate) fn euclidean_unchecked(a: &[f64], b: &[f64]) -> f64 {
    debug_assert_eq!(a.len(), b.len());
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}
