//! Thresholded nearest-reference classification.

use std::cmp::Ordering;

use rayon::prelude::*;
use tracing::{debug, info, instrument, warn};

use crate::cancel::CancelToken;
use crate::config::MatcherConfig;
use crate::cost::AlignmentCost;
use crate::distance::euclidean_unchecked;
use crate::dtw::SlopeDtw;
use crate::error::MatchError;
use crate::result::{MatchResult, Recognition, SkipReason, SkippedReference};
use crate::sequence::Sequence;
use crate::store::{LabeledSequence, ReferenceStore};

/// Per-call knobs for [`Matcher::recognize_with`].
#[derive(Debug, Clone, Copy, Default)]
pub struct RecognizeOptions<'a> {
    cancel: Option<&'a CancelToken>,
    parallel: bool,
}

impl<'a> RecognizeOptions<'a> {
    /// Serial scan without cancellation.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Poll `cancel` before every reference.
    #[must_use]
    pub fn with_cancel(mut self, cancel: &'a CancelToken) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// Spread the per-reference work over the rayon thread pool.
    #[must_use]
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    fn check_cancelled(&self) -> Result<(), MatchError> {
        if self.cancel.is_some_and(CancelToken::is_cancelled) {
            return Err(MatchError::Cancelled);
        }
        Ok(())
    }
}

/// Gesture classifier over an owned, insert-only reference store.
///
/// ```
/// use handsign_dtw::{Matcher, MatcherConfig, Sequence};
///
/// let config = MatcherConfig::new(1, 1.0, 5.0, 2, 0.0)?;
/// let mut matcher = Matcher::new(config);
/// matcher.add_rows(vec![vec![0.0], vec![1.0], vec![2.0]], "A")?;
///
/// let query = Sequence::from_rows(vec![vec![0.0], vec![1.0], vec![2.0]])?;
/// assert_eq!(matcher.recognize(&query)?.label(), "A");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct Matcher {
    config: MatcherConfig,
    engine: SlopeDtw,
    store: ReferenceStore,
}

impl Matcher {
    /// Create a matcher with an empty reference store.
    #[must_use]
    pub fn new(config: MatcherConfig) -> Self {
        Self::from_store(config, ReferenceStore::new())
    }

    /// Create a matcher over a store assembled elsewhere.
    ///
    /// The store is taken as-is. References whose dimensionality differs from
    /// the configuration are reported as skipped by every scan.
    #[must_use]
    pub fn from_store(config: MatcherConfig, store: ReferenceStore) -> Self {
        Self {
            engine: config.engine(),
            config,
            store,
        }
    }

    /// Return the configuration.
    #[must_use]
    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }

    /// Return the reference store.
    #[must_use]
    pub fn store(&self) -> &ReferenceStore {
        &self.store
    }

    /// Return the number of registered references.
    #[must_use]
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Return true if no reference has been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Register a labeled reference sequence.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`MatchError::DimensionMismatch`] | The sequence's points do not have `dim` coordinates |
    pub fn add(&mut self, sequence: Sequence, label: impl Into<String>) -> Result<(), MatchError> {
        check_dimension(&self.config, &sequence)?;
        let entry = LabeledSequence::new(sequence, label);
        debug!(
            label = %entry.label,
            len = entry.sequence.len(),
            index = self.store.len(),
            "reference registered"
        );
        self.store.push(entry);
        Ok(())
    }

    /// Register a labeled reference given as raw coordinate rows.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`MatchError::EmptySequence`] | `rows` is empty, or a row is empty |
    /// | [`MatchError::NonFiniteCoordinate`] | A coordinate is NaN or infinite |
    /// | [`MatchError::DimensionMismatch`] | A row does not have `dim` coordinates |
    pub fn add_rows(
        &mut self,
        rows: Vec<Vec<f64>>,
        label: impl Into<String>,
    ) -> Result<(), MatchError> {
        if let Some(index) = rows.iter().position(|r| r.len() != self.config.dim()) {
            return Err(MatchError::DimensionMismatch {
                expected: self.config.dim(),
                got: rows[index].len(),
                index,
            });
        }
        self.add(Sequence::from_rows(rows)?, label)
    }

    /// Classify `query` against every registered reference.
    ///
    /// An empty store yields [`MatchResult::NoMatch`].
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`MatchError::DimensionMismatch`] | The query's points do not have `dim` coordinates |
    pub fn recognize(&self, query: &Sequence) -> Result<MatchResult, MatchError> {
        Ok(self.recognize_with(query, &RecognizeOptions::default())?.result)
    }

    /// Classify `query` and return the full scan report.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`MatchError::DimensionMismatch`] | The query's points do not have `dim` coordinates |
    /// | [`MatchError::Cancelled`] | The options' cancel token fired before the scan finished |
    pub fn recognize_with(
        &self,
        query: &Sequence,
        options: &RecognizeOptions<'_>,
    ) -> Result<Recognition, MatchError> {
        scan(&self.config, &self.engine, &self.store, query, options)
    }
}

/// Verify that every point of `sequence` has the configured dimensionality.
pub(crate) fn check_dimension(config: &MatcherConfig, sequence: &Sequence) -> Result<(), MatchError> {
    if sequence.dim() != config.dim() {
        return Err(MatchError::DimensionMismatch {
            expected: config.dim(),
            got: sequence.dim(),
            index: 0,
        });
    }
    Ok(())
}

/// What happened to a single reference during a scan.
#[derive(Debug)]
enum Outcome {
    EarlyRejected,
    Scored(AlignmentCost),
    Skipped(MatchError),
}

/// Run the early-rejection filter and, if it passes, the DTW alignment of
/// `query` against one reference. Returns the length-normalized cost.
fn evaluate(
    config: &MatcherConfig,
    engine: &SlopeDtw,
    query: &Sequence,
    index: usize,
    entry: &LabeledSequence,
) -> Outcome {
    let reference = &entry.sequence;
    if reference.dim() != config.dim() {
        return Outcome::Skipped(MatchError::DimensionMismatch {
            expected: config.dim(),
            got: reference.dim(),
            index: 0,
        });
    }

    let endpoint = euclidean_unchecked(query.last().coords(), reference.last().coords());
    if endpoint > config.first_threshold() {
        debug!(index, label = %entry.label, endpoint, "early rejection");
        return Outcome::EarlyRejected;
    }

    match engine.align(query, reference) {
        Ok(raw) => Outcome::Scored(raw.normalized_by(reference.len())),
        Err(err) => Outcome::Skipped(err),
    }
}

/// Scan the whole store and reduce to the cheapest reference.
///
/// Every outcome keeps its insertion index, so the reduction picks the
/// earliest reference among exact ties no matter how the work was scheduled.
#[instrument(skip_all, fields(n_refs = store.len(), query_len = query.len(), parallel = options.parallel))]
pub(crate) fn scan(
    config: &MatcherConfig,
    engine: &SlopeDtw,
    store: &ReferenceStore,
    query: &Sequence,
    options: &RecognizeOptions<'_>,
) -> Result<Recognition, MatchError> {
    check_dimension(config, query)?;

    let entries = store.as_slice();
    let outcomes: Vec<(usize, Outcome)> = if options.parallel {
        entries
            .par_iter()
            .enumerate()
            .map(|(index, entry)| {
                options.check_cancelled()?;
                Ok((index, evaluate(config, engine, query, index, entry)))
            })
            .collect::<Result<Vec<_>, MatchError>>()?
    } else {
        let mut outcomes = Vec::with_capacity(entries.len());
        for (index, entry) in entries.iter().enumerate() {
            options.check_cancelled()?;
            outcomes.push((index, evaluate(config, engine, query, index, entry)));
        }
        outcomes
    };

    let mut best: Option<(usize, AlignmentCost)> = None;
    let mut early_rejected = 0;
    let mut aligned = 0;
    let mut skipped = Vec::new();

    for (index, outcome) in outcomes {
        match outcome {
            Outcome::EarlyRejected => early_rejected += 1,
            Outcome::Scored(cost) => {
                aligned += 1;
                // An unreachable alignment never becomes the best candidate.
                let improves = match best {
                    None => cost.total_cmp(&AlignmentCost::INFINITY) == Ordering::Less,
                    Some((best_index, best_cost)) => match cost.total_cmp(&best_cost) {
                        Ordering::Less => true,
                        Ordering::Equal => index < best_index,
                        Ordering::Greater => false,
                    },
                };
                if improves {
                    debug!(index, label = %entries[index].label, cost = cost.value(), "new best reference");
                    best = Some((index, cost));
                }
            }
            Outcome::Skipped(err) => {
                let label = entries[index].label.clone();
                warn!(index, label = %label, error = %err, "skipping malformed reference");
                skipped.push(SkippedReference {
                    index,
                    label,
                    reason: SkipReason::Malformed(err),
                });
            }
        }
    }

    let result = match best {
        Some((index, distance)) if distance.value() < config.dtw_threshold() => {
            MatchResult::Matched {
                label: entries[index].label.clone(),
                distance,
            }
        }
        _ => MatchResult::NoMatch,
    };

    info!(
        label = result.label(),
        distance = best.map(|(_, c)| c.value()),
        aligned,
        early_rejected,
        skipped = skipped.len(),
        "recognition complete"
    );

    Ok(Recognition {
        result,
        candidates_considered: entries.len(),
        early_rejected,
        aligned,
        skipped,
    })
}
