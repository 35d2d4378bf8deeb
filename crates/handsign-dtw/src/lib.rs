//! Slope-constrained DTW gesture matching.
//!
//! Pure math library with zero I/O. Classifies a captured motion sample (an
//! ordered sequence of fixed-dimension points) against a labeled set of
//! reference sequences: an endpoint pre-filter rejects obviously dissimilar
//! references, a slope-constrained Dynamic Time Warping alignment scores the
//! rest, and the cheapest length-normalized reference below a global threshold
//! wins.

mod cancel;
mod capture;
mod config;
mod cost;
mod distance;
mod dtw;
mod error;
mod matcher;
mod result;
mod sequence;
mod shared;
mod store;

pub use cancel::CancelToken;
pub use capture::CaptureSession;
pub use config::MatcherConfig;
pub use cost::AlignmentCost;
pub use distance::euclidean;
pub use dtw::{SequenceOrder, SlopeDtw};
pub use error::{ConfigError, MatchError};
pub use matcher::{Matcher, RecognizeOptions};
pub use result::{MatchResult, Recognition, SkipReason, SkippedReference, UNKNOWN_LABEL};
pub use sequence::{Point, Sequence};
pub use shared::SharedMatcher;
pub use store::{LabeledSequence, ReferenceStore};
