//! Per-body frame accumulation between gesture start and end markers.

use tracing::debug;

use crate::error::MatchError;
use crate::sequence::{Point, Sequence};

#[derive(Debug, Clone, PartialEq, Eq)]
enum State {
    Idle,
    Recording { gesture: String },
}

/// Accumulates frames for one tracked body between an external recognizer's
/// start and end markers, producing the query sequence for a
/// [`Matcher`](crate::Matcher).
///
/// Keep one session per tracked body so concurrent captures stay independent.
#[derive(Debug, Clone)]
pub struct CaptureSession {
    dim: usize,
    state: State,
    frames: Vec<Point>,
}

impl CaptureSession {
    /// Create an idle session for `dim`-dimensional frames.
    #[must_use]
    pub fn new(dim: usize) -> Self {
        Self {
            dim,
            state: State::Idle,
            frames: Vec::new(),
        }
    }

    /// Return the frame dimensionality.
    #[must_use]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Return the gesture being recorded, if any.
    #[must_use]
    pub fn recording(&self) -> Option<&str> {
        match &self.state {
            State::Recording { gesture } => Some(gesture),
            State::Idle => None,
        }
    }

    /// Return the number of frames buffered so far.
    #[must_use]
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Start recording `gesture` with `frame` as its first sample.
    ///
    /// A start marker received mid-recording discards the frames in progress.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`MatchError::DimensionMismatch`] | `frame` does not have `dim` coordinates |
    pub fn mark_start(&mut self, gesture: impl Into<String>, frame: Point) -> Result<(), MatchError> {
        self.check(&frame)?;
        let gesture = gesture.into();
        debug!(gesture = %gesture, discarded = self.frames.len(), "capture started");
        self.frames.clear();
        self.frames.push(frame);
        self.state = State::Recording { gesture };
        Ok(())
    }

    /// Buffer `frame` if a gesture is being recorded.
    ///
    /// Returns `true` when the frame was stored, `false` when the session is idle.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`MatchError::DimensionMismatch`] | `frame` does not have `dim` coordinates |
    pub fn push_frame(&mut self, frame: Point) -> Result<bool, MatchError> {
        self.check(&frame)?;
        if self.state == State::Idle {
            return Ok(false);
        }
        self.frames.push(frame);
        Ok(true)
    }

    /// Close the recording of `gesture` with `frame` as its last sample.
    ///
    /// Returns the completed sequence and returns the session to idle. An end
    /// marker for a different gesture, or one received while idle, is ignored.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`MatchError::DimensionMismatch`] | `frame` does not have `dim` coordinates |
    pub fn mark_end(&mut self, gesture: &str, frame: Point) -> Result<Option<Sequence>, MatchError> {
        self.check(&frame)?;
        match &self.state {
            State::Recording { gesture: current } if current == gesture => {}
            _ => return Ok(None),
        }
        self.frames.push(frame);
        self.state = State::Idle;
        let frames = std::mem::take(&mut self.frames);
        debug!(gesture, frames = frames.len(), "capture complete");
        Sequence::new(frames).map(Some)
    }

    /// Drop any frames in progress and return to idle.
    pub fn reset(&mut self) {
        self.frames.clear();
        self.state = State::Idle;
    }

    fn check(&self, frame: &Point) -> Result<(), MatchError> {
        if frame.dim() != self.dim {
            return Err(MatchError::DimensionMismatch {
                expected: self.dim,
                got: frame.dim(),
                index: self.frames.len(),
            });
        }
        Ok(())
    }
}
