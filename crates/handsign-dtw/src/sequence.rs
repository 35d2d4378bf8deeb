//! Point and sequence types with validation guarantees.

use std::ops::Index;

use crate::error::MatchError;

/// A single motion sample: a non-empty vector of finite coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Point(Vec<f64>);

impl Point {
    /// Create a new point, validating that it is non-empty and all coordinates are finite.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`MatchError::EmptySequence`] | `coords` is empty |
    /// | [`MatchError::NonFiniteCoordinate`] | Any coordinate is NaN or infinite |
    pub fn new(coords: Vec<f64>) -> Result<Self, MatchError> {
        if coords.is_empty() {
            return Err(MatchError::EmptySequence);
        }
        if let Some(index) = coords.iter().position(|v| !v.is_finite()) {
            return Err(MatchError::NonFiniteCoordinate { index });
        }
        Ok(Self(coords))
    }

    /// Return the number of coordinates.
    #[must_use]
    pub fn dim(&self) -> usize {
        self.0.len()
    }

    /// Return the coordinates as a slice.
    #[must_use]
    pub fn coords(&self) -> &[f64] {
        &self.0
    }
}

/// Owned, validated motion sample. Guaranteed non-empty, with every point
/// sharing the dimensionality of the first.
#[derive(Debug, Clone, PartialEq)]
pub struct Sequence {
    dim: usize,
    points: Vec<Point>,
}

impl Sequence {
    /// Create a new sequence from validated points.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`MatchError::EmptySequence`] | `points` is empty |
    /// | [`MatchError::DimensionMismatch`] | A point's dimensionality differs from the first point's |
    pub fn new(points: Vec<Point>) -> Result<Self, MatchError> {
        let dim = points.first().ok_or(MatchError::EmptySequence)?.dim();
        if let Some(index) = points.iter().position(|p| p.dim() != dim) {
            return Err(MatchError::DimensionMismatch {
                expected: dim,
                got: points[index].dim(),
                index,
            });
        }
        Ok(Self { dim, points })
    }

    /// Build a sequence straight from coordinate rows, one row per point.
    ///
    /// # Errors
    ///
    /// Returns the first [`MatchError`] raised by [`Point::new`] or [`Sequence::new`].
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, MatchError> {
        let points = rows
            .into_iter()
            .map(Point::new)
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(points)
    }

    /// Return the shared dimensionality of every point.
    #[must_use]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Return the number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Return true if the sequence has no points.
    ///
    /// A [`Sequence`] constructed via [`Sequence::new`] is always non-empty,
    /// so this always returns `false` for valid instances. Provided to satisfy
    /// the `len_without_is_empty` convention.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Return the points as a slice.
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Return the final point of the sequence (the end pose).
    #[must_use]
    pub fn last(&self) -> &Point {
        // Non-empty by construction.
        &self.points[self.points.len() - 1]
    }
}

impl Index<usize> for Sequence {
    type Output = Point;

    fn index(&self, index: usize) -> &Self::Output {
        &self.points[index]
    }
}

impl TryFrom<Vec<Vec<f64>>> for Sequence {
    type Error = MatchError;

    fn try_from(rows: Vec<Vec<f64>>) -> Result<Self, Self::Error> {
        Self::from_rows(rows)
    }
}
