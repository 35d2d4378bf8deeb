//! Error types for sequence validation, matching, and configuration.

/// Errors from sequence validation, alignment, and recognition.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MatchError {
    /// Returned when a point has no coordinates or a sequence has no points.
    #[error("sequence must be non-empty")]
    EmptySequence,

    /// Returned when a point's coordinate count differs from the expected dimensionality.
    #[error("point {index} has {got} coordinates, expected {expected}")]
    DimensionMismatch {
        /// Expected number of coordinates per point.
        expected: usize,
        /// Actual number of coordinates found.
        got: usize,
        /// Position of the first offending point in its sequence.
        index: usize,
    },

    /// Returned when a coordinate is NaN, infinity, or negative infinity.
    #[error("point contains non-finite coordinate at index {index}")]
    NonFiniteCoordinate {
        /// Position of the first non-finite coordinate found.
        index: usize,
    },

    /// Returned when a [`CancelToken`](crate::CancelToken) fires during a scan.
    #[error("recognition cancelled")]
    Cancelled,
}

/// Errors from matcher configuration validation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// Returned when the point dimensionality is zero.
    #[error("point dimensionality must be at least 1")]
    ZeroDimension,

    /// Returned when a threshold or length parameter is NaN or negative.
    #[error("{name} must be a non-negative number, got {value}")]
    InvalidThreshold {
        /// Name of the offending parameter.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },
}
