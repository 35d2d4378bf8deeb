//! Slope-constrained DTW alignment.

use tracing::instrument;

use crate::cost::AlignmentCost;
use crate::distance::euclidean_unchecked;
use crate::error::MatchError;
use crate::sequence::{Point, Sequence};

/// Order in which the two sequences are fed into the cost matrix.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SequenceOrder {
    /// Both sequences are reversed first, so the alignment is anchored at the
    /// final samples and the reference may match any trailing part of the query.
    #[default]
    Reversed,

    /// Sequences are aligned in capture order, so the reference may match any
    /// leading part of the query.
    Forward,
}

/// Per-cell state of the cost matrix.
#[derive(Debug, Clone, Copy)]
struct Cell {
    cost: f64,
    /// Consecutive horizontal (reference-axis) steps ending here.
    horizontal: usize,
    /// Consecutive vertical (query-axis) steps ending here.
    vertical: usize,
}

impl Cell {
    const UNREACHED: Self = Self {
        cost: f64::INFINITY,
        horizontal: 0,
        vertical: 0,
    };

    const ORIGIN: Self = Self {
        cost: 0.0,
        horizontal: 0,
        vertical: 0,
    };
}

/// Immutable slope-constrained DTW calculator. Thread-safe and copyable.
///
/// The engine limits how many consecutive steps a warping path may take along
/// a single axis, rejecting alignments that stretch one sequence against a
/// nearly stationary stretch of the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlopeDtw {
    max_slope: usize,
    order: SequenceOrder,
}

impl SlopeDtw {
    /// Create a calculator allowing at most `max_slope` consecutive same-axis steps.
    #[must_use]
    pub fn new(max_slope: usize) -> Self {
        Self {
            max_slope,
            order: SequenceOrder::default(),
        }
    }

    /// Set the order in which sequences enter the cost matrix.
    #[must_use]
    pub fn with_order(mut self, order: SequenceOrder) -> Self {
        self.order = order;
        self
    }

    /// Return the maximum number of consecutive same-axis steps.
    #[must_use]
    pub fn max_slope(&self) -> usize {
        self.max_slope
    }

    /// Return the sequence order.
    #[must_use]
    pub fn order(&self) -> SequenceOrder {
        self.order
    }

    /// Compute the minimal slope-constrained warping cost of aligning `a`
    /// (the query) with `b` (the reference).
    ///
    /// The result is the minimum over the whole last column of the cost
    /// matrix, i.e. over every query position at which the reference may
    /// finish. Runs in O(|a| * |b|) time and O(|b|) space. Returns
    /// [`AlignmentCost::INFINITY`] when the slope constraint leaves no
    /// admissible path.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`MatchError::DimensionMismatch`] | `b` has a different point dimensionality than `a` |
    #[instrument(skip(a, b), fields(a_len = a.len(), b_len = b.len()))]
    pub fn align(&self, a: &Sequence, b: &Sequence) -> Result<AlignmentCost, MatchError> {
        if a.dim() != b.dim() {
            return Err(MatchError::DimensionMismatch {
                expected: a.dim(),
                got: b.dim(),
                index: 0,
            });
        }

        let a_rows: Vec<&[f64]> = ordered(a.points(), self.order);
        let b_rows: Vec<&[f64]> = ordered(b.points(), self.order);
        Ok(AlignmentCost::new(self.align_rolling(&a_rows, &b_rows)))
    }

    /// Rolling two-row fill of the `(|a|+1) x (|b|+1)` cost matrix.
    ///
    /// Slot 0 of each row is the "before start" column and always holds
    /// [`Cell::UNREACHED`]; `prev` starts as matrix row 0, where only the
    /// origin is reachable. For cell `(i, j)` the predecessors are
    /// `curr[j - 1]` (left), `prev[j]` (up) and `prev[j - 1]` (diagonal).
    ///
    /// Transitions are tried in a fixed order and the first admissible one wins:
    /// a horizontal step when the left cell is strictly cheapest and its
    /// horizontal run is below `max_slope`; a vertical step under the mirrored
    /// rule; otherwise the diagonal step.
    fn align_rolling(&self, a: &[&[f64]], b: &[&[f64]]) -> f64 {
        let m = b.len();

        let mut prev = vec![Cell::UNREACHED; m + 1];
        let mut curr = vec![Cell::UNREACHED; m + 1];
        prev[0] = Cell::ORIGIN;

        let mut best = f64::INFINITY;

        for &pa in a {
            curr[0] = Cell::UNREACHED;

            for j in 1..=m {
                let local = euclidean_unchecked(pa, b[j - 1]);
                let left = curr[j - 1];
                let up = prev[j];
                let diag = prev[j - 1];

                curr[j] = if left.cost < diag.cost
                    && left.cost < up.cost
                    && left.horizontal < self.max_slope
                {
                    // The horizontal run restarts from the left cell's vertical run.
                    Cell {
                        cost: local + left.cost,
                        horizontal: left.vertical + 1,
                        vertical: 0,
                    }
                } else if up.cost < diag.cost
                    && up.cost < left.cost
                    && up.vertical < self.max_slope
                {
                    Cell {
                        cost: local + up.cost,
                        horizontal: 0,
                        vertical: up.vertical + 1,
                    }
                } else {
                    Cell {
                        cost: local + diag.cost,
                        horizontal: 0,
                        vertical: 0,
                    }
                };
            }

            best = best.min(curr[m].cost);
            std::mem::swap(&mut prev, &mut curr);
        }

        best
    }
}

fn ordered(points: &[Point], order: SequenceOrder) -> Vec<&[f64]> {
    match order {
        SequenceOrder::Reversed => points.iter().rev().map(Point::coords).collect(),
        SequenceOrder::Forward => points.iter().map(Point::coords).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seq1(values: &[f64]) -> Sequence {
        Sequence::from_rows(values.iter().map(|&v| vec![v]).collect()).unwrap()
    }

    fn cost(dtw: SlopeDtw, a: &[f64], b: &[f64]) -> f64 {
        dtw.align(&seq1(a), &seq1(b)).unwrap().value()
    }

    #[test]
    fn identical_sequences_cost_zero() {
        let dtw = SlopeDtw::new(2);
        let s = Sequence::from_rows(vec![
            vec![0.0, 1.0],
            vec![2.0, 0.5],
            vec![-1.0, 4.0],
            vec![3.0, 3.0],
        ])
        .unwrap();
        assert_eq!(dtw.align(&s, &s).unwrap().value(), 0.0);
        let forward = dtw.with_order(SequenceOrder::Forward);
        assert_eq!(forward.align(&s, &s).unwrap().value(), 0.0);
    }

    #[test]
    fn single_point_sequences() {
        assert!((cost(SlopeDtw::new(2), &[5.0], &[3.0]) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn hand_computed_last_point_offset() {
        // Reversed: a=[2,1,0], b=[3,1,0]. Diagonal path costs 1 + 0 + 0.
        assert!((cost(SlopeDtw::new(2), &[0.0, 1.0, 2.0], &[0.0, 1.0, 3.0]) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn reversed_order_matches_query_suffix() {
        let dtw = SlopeDtw::new(2);
        assert_eq!(cost(dtw, &[0.0, 1.0, 2.0, 3.0], &[2.0, 3.0]), 0.0);
        assert!((cost(dtw, &[0.0, 1.0, 2.0, 3.0], &[0.0, 1.0]) - 3.0).abs() < 1e-12);
    }

    #[test]
    fn forward_order_matches_query_prefix() {
        let dtw = SlopeDtw::new(2).with_order(SequenceOrder::Forward);
        assert_eq!(cost(dtw, &[0.0, 1.0, 2.0, 3.0], &[0.0, 1.0]), 0.0);
        assert!((cost(dtw, &[0.0, 1.0, 2.0, 3.0], &[2.0, 3.0]) - 3.0).abs() < 1e-12);
    }

    #[test]
    fn pause_within_slope_limit_is_free() {
        // The query holds its second pose for two extra samples.
        let query = [0.0, 1.0, 1.0, 1.0, 2.0, 3.0];
        let reference = [0.0, 1.0, 2.0, 3.0];
        assert_eq!(cost(SlopeDtw::new(2), &query, &reference), 0.0);
    }

    #[test]
    fn pause_beyond_slope_limit_is_penalized() {
        let query = [0.0, 1.0, 1.0, 1.0, 2.0, 3.0];
        let reference = [0.0, 1.0, 2.0, 3.0];
        assert!((cost(SlopeDtw::new(1), &query, &reference) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn uniform_stretch_needs_matching_slope() {
        // Every reference sample repeated three times in the query: two extra
        // vertical steps per pose.
        let query = [0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 2.0, 2.0, 2.0, 3.0, 3.0, 3.0];
        let reference = [0.0, 1.0, 2.0, 3.0];
        assert_eq!(cost(SlopeDtw::new(2), &query, &reference), 0.0);
        assert!((cost(SlopeDtw::new(1), &query, &reference) - 4.0).abs() < 1e-12);
    }

    #[test]
    fn stretched_reference_with_tight_slope_has_no_path() {
        let query = [0.0, 1.0, 2.0, 3.0];
        let reference = [0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 2.0, 2.0, 2.0, 3.0, 3.0, 3.0];
        assert!(SlopeDtw::new(1)
            .align(&seq1(&query), &seq1(&reference))
            .unwrap()
            .is_infinite());
        assert_eq!(cost(SlopeDtw::new(2), &query, &reference), 0.0);
    }

    #[test]
    fn multidimensional_hand_computed() {
        let a = Sequence::from_rows(vec![
            vec![0.0, 0.0],
            vec![1.0, 1.0],
            vec![2.0, 2.0],
            vec![3.0, 3.0],
        ])
        .unwrap();
        let b = Sequence::from_rows(vec![
            vec![0.0, 0.0],
            vec![1.0, 0.0],
            vec![2.0, 2.0],
            vec![3.0, 4.0],
        ])
        .unwrap();
        let dtw = SlopeDtw::new(2);
        assert!((dtw.align(&a, &b).unwrap().value() - 2.0).abs() < 1e-12);
        assert!((dtw.align(&b, &a).unwrap().value() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn rejects_dimension_mismatch() {
        let a = seq1(&[0.0, 1.0]);
        let b = Sequence::from_rows(vec![vec![0.0, 0.0]]).unwrap();
        assert_eq!(
            SlopeDtw::new(2).align(&a, &b),
            Err(MatchError::DimensionMismatch {
                expected: 1,
                got: 2,
                index: 0,
            })
        );
    }

    #[test]
    fn default_order_is_reversed() {
        assert_eq!(SlopeDtw::new(3).order(), SequenceOrder::Reversed);
        assert_eq!(SlopeDtw::new(3).max_slope(), 3);
    }
}
