//! Thread-safe matcher with snapshot reads.

use std::sync::{Arc, PoisonError, RwLock};

use tracing::debug;

use crate::config::MatcherConfig;
use crate::dtw::SlopeDtw;
use crate::error::MatchError;
use crate::matcher::{RecognizeOptions, check_dimension, scan};
use crate::result::{MatchResult, Recognition};
use crate::sequence::Sequence;
use crate::store::{LabeledSequence, ReferenceStore};

/// A matcher that can register references and classify queries from many
/// threads at once.
///
/// Each scan runs against an immutable snapshot of the store taken when it
/// starts, so an insert racing with a scan is either fully visible to it or
/// not at all. Inserts copy the store only while a snapshot is still in use.
#[derive(Debug)]
pub struct SharedMatcher {
    config: MatcherConfig,
    engine: SlopeDtw,
    store: RwLock<Arc<ReferenceStore>>,
}

impl SharedMatcher {
    /// Create a shared matcher with an empty reference store.
    #[must_use]
    pub fn new(config: MatcherConfig) -> Self {
        Self::from_store(config, ReferenceStore::new())
    }

    /// Create a shared matcher over a store assembled elsewhere.
    #[must_use]
    pub fn from_store(config: MatcherConfig, store: ReferenceStore) -> Self {
        Self {
            engine: config.engine(),
            config,
            store: RwLock::new(Arc::new(store)),
        }
    }

    /// Return the configuration.
    #[must_use]
    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }

    /// Return the current store as a frozen snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Arc<ReferenceStore> {
        // Writers publish whole stores, so a poisoned lock still guards a consistent value.
        Arc::clone(&self.store.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Return the number of registered references.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    /// Return true if no reference has been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshot().is_empty()
    }

    /// Register a labeled reference sequence.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`MatchError::DimensionMismatch`] | The sequence's points do not have `dim` coordinates |
    pub fn add(&self, sequence: Sequence, label: impl Into<String>) -> Result<(), MatchError> {
        check_dimension(&self.config, &sequence)?;
        let entry = LabeledSequence::new(sequence, label);
        let mut guard = self.store.write().unwrap_or_else(PoisonError::into_inner);
        debug!(label = %entry.label, index = guard.len(), "reference published");
        Arc::make_mut(&mut guard).push(entry);
        Ok(())
    }

    /// Classify `query` against the current snapshot.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Matcher::recognize`](crate::Matcher::recognize).
    pub fn recognize(&self, query: &Sequence) -> Result<MatchResult, MatchError> {
        Ok(self.recognize_with(query, &RecognizeOptions::default())?.result)
    }

    /// Classify `query` against the current snapshot and return the full report.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Matcher::recognize_with`](crate::Matcher::recognize_with).
    pub fn recognize_with(
        &self,
        query: &Sequence,
        options: &RecognizeOptions<'_>,
    ) -> Result<Recognition, MatchError> {
        let store = self.snapshot();
        scan(&self.config, &self.engine, &store, query, options)
    }
}
