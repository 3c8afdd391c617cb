//! Incremental stroke engine
//!
//! Turns a sparse, jittery, unevenly spaced sequence of pointer samples
//! into a dense, evenly spaced sequence of stamp points:
//! 1. Input samples are exponentially smoothed and queued ([`StrokeEngine::add_point`])
//! 2. The retrieval state machine consumes queued points and walks
//!    Catmull-Rom segments (straight lines for degenerate spans) at exact
//!    arc-length intervals ([`StrokeEngine::retrieve_next_stamp_point`])
//! 3. [`StrokeEngine::finalize`] drains the smoothing lag so the stroke
//!    terminates at the true final input position

mod retrieval;

use tracing::debug;

use crate::constants::{ENDPOINT_EPSILON, ENDPOINT_SNAP_RATE};
use crate::queue::PointQueue;
use crate::sample::StrokeSample;
use crate::settings::StrokeSettings;
use crate::spline::SplineSegment;

/// Error type for stroke engine operations.
#[derive(Debug, thiserror::Error)]
pub enum StrokeEngineError {
    #[error("Stroke already finalized - no further input accepted")]
    AddAfterFinalize,
    #[error("Stroke already finalized - finalize() may only be called once")]
    AlreadyFinalized,
}

/// Traversal of the span between two collected points.
#[derive(Debug, Clone, Copy)]
enum Traversal {
    /// No span in progress; the next queued point starts one
    Idle,
    /// Walking a Catmull-Rom segment from `start` to `end`
    Curve {
        segment: SplineSegment,
        start: StrokeSample,
        end: StrokeSample,
    },
    /// Walking a straight line from `start` to `end`
    Line {
        start: StrokeSample,
        end: StrokeSample,
    },
}

/// Incremental stroke resampling engine
///
/// One instance owns all state for one in-progress stroke: the raw and
/// smoothed input cursors, the collected point queue, the retrieval window
/// history, and the travel accumulator that keeps stamp spacing uniform
/// across span boundaries. Created with the stroke's seed sample, fed with
/// `add_point`, drained with `retrieve_next_stamp_point` after every input,
/// finalized once, drained again, and discarded.
///
/// Every operation is synchronous and allocation-free in the steady state,
/// so the engine can be driven directly from an input-event callback.
#[derive(Debug)]
pub struct StrokeEngine {
    settings: StrokeSettings,
    /// Latest raw input sample
    raw: StrokeSample,
    /// Exponentially smoothed cursor; lags behind `raw`
    smoothed: StrokeSample,
    /// Smoothed points awaiting retrieval
    queue: PointQueue,
    /// Last collected point consumed by retrieval (span start)
    prev1: StrokeSample,
    /// Collected point consumed before `prev1` (shapes the entry tangent)
    prev0: StrokeSample,
    /// Span currently being walked
    traversal: Traversal,
    /// Arc-length remainder carried across span boundaries
    travel: f32,
    /// Most recent stamp handed to the caller
    last_emitted: Option<StrokeSample>,
    finalized: bool,
    endpoint_emitted: bool,
}

impl StrokeEngine {
    /// Create an engine for a stroke starting at `seed`
    pub fn new(settings: StrokeSettings, seed: StrokeSample) -> Self {
        debug!(
            "StrokeEngine::new: seed=({:.1}, {:.1}), smoothing={:.2}, spacing={:.2}",
            seed.x, seed.y, settings.smoothing, settings.spacing
        );
        Self {
            settings,
            raw: seed,
            smoothed: seed,
            queue: PointQueue::new(),
            prev1: seed,
            prev0: seed,
            traversal: Traversal::Idle,
            travel: 0.0,
            last_emitted: None,
            finalized: false,
            endpoint_emitted: false,
        }
    }

    /// Engine settings
    pub fn settings(&self) -> &StrokeSettings {
        &self.settings
    }

    /// Latest raw input sample
    pub fn last_raw(&self) -> StrokeSample {
        self.raw
    }

    /// Current smoothed cursor
    pub fn last_smoothed(&self) -> StrokeSample {
        self.smoothed
    }

    /// Number of collected points not yet consumed by retrieval
    pub fn pending_points(&self) -> usize {
        self.queue.pending()
    }

    /// Whether `finalize` has been called
    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    /// Feed one input sample
    ///
    /// The raw cursor follows the sample verbatim; the smoothed cursor
    /// moves toward it by the smoothing factor, and the smoothed value is
    /// queued for retrieval. The lag between the two cursors is what makes
    /// strokes stable against input noise; `finalize` drains it when the
    /// stroke ends.
    pub fn add_point(&mut self, sample: StrokeSample) -> Result<(), StrokeEngineError> {
        if self.finalized {
            return Err(StrokeEngineError::AddAfterFinalize);
        }

        self.raw = sample;
        self.smoothed.move_toward(&sample, self.settings.smoothing);
        self.queue.push(self.smoothed);
        Ok(())
    }

    /// End the stroke
    ///
    /// Steps the smoothed cursor toward the final raw sample, queueing a
    /// collected point per step, until both axes are within one pixel.
    /// Each step covers a fixed fraction of the remaining gap, so the
    /// number of queued points is logarithmic in the gap and the cursor
    /// converges without overshoot. Drain with `retrieve_next_stamp_point`
    /// afterwards; if stamping stopped short of the raw endpoint, the
    /// drain ends with a stamp exactly on it.
    pub fn finalize(&mut self) -> Result<(), StrokeEngineError> {
        if self.finalized {
            return Err(StrokeEngineError::AlreadyFinalized);
        }
        self.finalized = true;

        let endpoint = self.raw;
        let mut steps = 0usize;
        while (endpoint.x - self.smoothed.x).abs() > ENDPOINT_EPSILON
            || (endpoint.y - self.smoothed.y).abs() > ENDPOINT_EPSILON
        {
            self.smoothed.move_toward(&endpoint, ENDPOINT_SNAP_RATE);
            self.queue.push(self.smoothed);
            steps += 1;
        }

        debug!("StrokeEngine::finalize: {} trailing points queued", steps);
        Ok(())
    }

    /// Drain every currently available stamp point into a batch
    pub fn drain_stamps(&mut self) -> Vec<StrokeSample> {
        let mut stamps = Vec::new();
        while let Some(stamp) = self.retrieve_next_stamp_point() {
            stamps.push(stamp);
        }
        stamps
    }
}
