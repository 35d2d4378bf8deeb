//! Matcher configuration.

use crate::dtw::{SequenceOrder, SlopeDtw};
use crate::error::ConfigError;

/// Immutable configuration for a [`Matcher`](crate::Matcher).
///
/// Construct via [`MatcherConfig::new`] or [`MatcherConfig::for_dimension`],
/// then chain `with_*` methods to override individual fields before handing
/// the config to a matcher.
///
/// # Defaults (`for_dimension`)
///
/// | Parameter         | Default                     |
/// |-------------------|-----------------------------|
/// | `dtw_threshold`   | 3.0                         |
/// | `first_threshold` | 5.0                         |
/// | `max_slope`       | 2                           |
/// | `minimum_length`  | 10.0                        |
/// | `order`           | `SequenceOrder::Reversed`   |
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatcherConfig {
    dim: usize,
    dtw_threshold: f64,
    first_threshold: f64,
    max_slope: usize,
    minimum_length: f64,
    order: SequenceOrder,
}

impl MatcherConfig {
    /// Create a fully specified configuration.
    ///
    /// `minimum_length` is stored but not consulted by recognition.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`ConfigError::ZeroDimension`] | `dim` is zero |
    /// | [`ConfigError::InvalidThreshold`] | A threshold or `minimum_length` is NaN or negative |
    pub fn new(
        dim: usize,
        dtw_threshold: f64,
        first_threshold: f64,
        max_slope: usize,
        minimum_length: f64,
    ) -> Result<Self, ConfigError> {
        if dim == 0 {
            return Err(ConfigError::ZeroDimension);
        }
        check_non_negative("dtw_threshold", dtw_threshold)?;
        check_non_negative("first_threshold", first_threshold)?;
        check_non_negative("minimum_length", minimum_length)?;
        Ok(Self {
            dim,
            dtw_threshold,
            first_threshold,
            max_slope,
            minimum_length,
            order: SequenceOrder::default(),
        })
    }

    /// Create a configuration with the stock thresholds for `dim`-dimensional points.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroDimension`] when `dim` is zero.
    pub fn for_dimension(dim: usize) -> Result<Self, ConfigError> {
        Self::new(dim, 3.0, 5.0, 2, 10.0)
    }

    /// Set the maximum normalized cost that still counts as a match.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidThreshold`] for NaN or negative values.
    pub fn with_dtw_threshold(mut self, dtw_threshold: f64) -> Result<Self, ConfigError> {
        check_non_negative("dtw_threshold", dtw_threshold)?;
        self.dtw_threshold = dtw_threshold;
        Ok(self)
    }

    /// Set the maximum endpoint distance for which full DTW is attempted.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidThreshold`] for NaN or negative values.
    pub fn with_first_threshold(mut self, first_threshold: f64) -> Result<Self, ConfigError> {
        check_non_negative("first_threshold", first_threshold)?;
        self.first_threshold = first_threshold;
        Ok(self)
    }

    /// Set the maximum number of consecutive same-axis warping steps.
    #[must_use]
    pub fn with_max_slope(mut self, max_slope: usize) -> Self {
        self.max_slope = max_slope;
        self
    }

    /// Set the order in which sequences enter the cost matrix.
    #[must_use]
    pub fn with_order(mut self, order: SequenceOrder) -> Self {
        self.order = order;
        self
    }

    /// Return the point dimensionality.
    #[must_use]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Return the maximum normalized cost accepted as a match (exclusive).
    #[must_use]
    pub fn dtw_threshold(&self) -> f64 {
        self.dtw_threshold
    }

    /// Return the maximum endpoint distance for which DTW is attempted.
    #[must_use]
    pub fn first_threshold(&self) -> f64 {
        self.first_threshold
    }

    /// Return the maximum number of consecutive same-axis warping steps.
    #[must_use]
    pub fn max_slope(&self) -> usize {
        self.max_slope
    }

    /// Return the configured minimum sequence length.
    ///
    /// Recognition never reads this value; it is carried for callers that
    /// gate captures on length themselves.
    #[must_use]
    pub fn minimum_length(&self) -> f64 {
        self.minimum_length
    }

    /// Return the sequence order used for alignment.
    #[must_use]
    pub fn order(&self) -> SequenceOrder {
        self.order
    }

    /// Build the DTW engine described by this configuration.
    #[must_use]
    pub fn engine(&self) -> SlopeDtw {
        SlopeDtw::new(self.max_slope).with_order(self.order)
    }
}

fn check_non_negative(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_nan() || value < 0.0 {
        return Err(ConfigError::InvalidThreshold { name, value });
    }
    Ok(())
}
