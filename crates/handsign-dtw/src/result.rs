//! Recognition outcomes and scan reports.

use std::fmt;

use crate::cost::AlignmentCost;
use crate::error::MatchError;

/// Label reported when no reference is close enough.
pub const UNKNOWN_LABEL: &str = "UNKNOWN";

/// Outcome of classifying one query.
#[derive(Debug, Clone, PartialEq)]
pub enum MatchResult {
    /// The cheapest reference scored below the DTW threshold.
    Matched {
        /// Label of the winning reference.
        label: String,
        /// Length-normalized alignment cost of the winning reference.
        distance: AlignmentCost,
    },
    /// No reference qualified.
    NoMatch,
}

impl MatchResult {
    /// Return the matched label, or [`UNKNOWN_LABEL`] for [`MatchResult::NoMatch`].
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Matched { label, .. } => label,
            Self::NoMatch => UNKNOWN_LABEL,
        }
    }

    /// Return the normalized cost of the match, if any.
    #[must_use]
    pub fn distance(&self) -> Option<AlignmentCost> {
        match self {
            Self::Matched { distance, .. } => Some(*distance),
            Self::NoMatch => None,
        }
    }

    /// Return true for [`MatchResult::Matched`].
    #[must_use]
    pub fn is_match(&self) -> bool {
        matches!(self, Self::Matched { .. })
    }
}

impl fmt::Display for MatchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Matched { label, distance } => write!(f, "{label} ({distance})"),
            Self::NoMatch => f.write_str(UNKNOWN_LABEL),
        }
    }
}

/// Why a reference was left out of the arg-min.
#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    /// The reference could not be compared with the query.
    Malformed(MatchError),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed(err) => write!(f, "malformed reference: {err}"),
        }
    }
}

/// A reference skipped during a scan, with its position and label.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedReference {
    /// Insertion position in the store.
    pub index: usize,
    /// Label of the skipped reference.
    pub label: String,
    /// Why it was skipped.
    pub reason: SkipReason,
}

/// Full report of one recognition scan.
#[derive(Debug, Clone, PartialEq)]
pub struct Recognition {
    /// The classification outcome.
    pub result: MatchResult,
    /// Number of references in the scanned store.
    pub candidates_considered: usize,
    /// References dropped by the endpoint pre-filter.
    pub early_rejected: usize,
    /// References that went through full DTW.
    pub aligned: usize,
    /// References that could not be compared, in store order.
    pub skipped: Vec<SkippedReference>,
}
