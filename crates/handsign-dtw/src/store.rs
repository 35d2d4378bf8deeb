//! Labeled reference sequences.

use std::collections::HashSet;

use crate::sequence::Sequence;

/// A reference motion sample and the label it stands for.
///
/// Several labeled sequences may share a label (multiple examples per gesture).
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledSequence {
    /// The reference motion.
    pub sequence: Sequence,
    /// Opaque display label.
    pub label: String,
}

impl LabeledSequence {
    /// Pair a sequence with its label.
    #[must_use]
    pub fn new(sequence: Sequence, label: impl Into<String>) -> Self {
        Self {
            sequence,
            label: label.into(),
        }
    }
}

/// Insert-only, ordered collection of labeled references.
///
/// Insertion order only matters for ties: when two references reach exactly
/// the same normalized cost, the earlier one wins. The store does not check
/// point dimensionality; [`Matcher::add`](crate::Matcher::add) does.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReferenceStore {
    entries: Vec<LabeledSequence>,
}

impl ReferenceStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a labeled reference.
    pub fn push(&mut self, entry: LabeledSequence) {
        self.entries.push(entry);
    }

    /// Return the number of references.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Return true if the store holds no references.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Return the reference at insertion position `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&LabeledSequence> {
        self.entries.get(index)
    }

    /// Iterate references in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, LabeledSequence> {
        self.entries.iter()
    }

    /// Return the references as a slice, in insertion order.
    #[must_use]
    pub fn as_slice(&self) -> &[LabeledSequence] {
        &self.entries
    }

    /// Return the distinct labels in order of first insertion.
    #[must_use]
    pub fn labels(&self) -> Vec<&str> {
        let mut seen: HashSet<&str> = HashSet::new();
        self.entries
            .iter()
            .map(|entry| entry.label.as_str())
            .filter(|label| seen.insert(*label))
            .collect()
    }
}

impl FromIterator<LabeledSequence> for ReferenceStore {
    fn from_iter<I: IntoIterator<Item = LabeledSequence>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a ReferenceStore {
    type Item = &'a LabeledSequence;
    type IntoIter = std::slice::Iter<'a, LabeledSequence>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
