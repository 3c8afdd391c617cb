//! Retrieval state machine: consumes collected points, emits stamp points.

use glam::Vec2;
use tracing::debug;

use crate::constants::{ENDPOINT_EPSILON, MIN_CURVE_SPAN, MIN_STAMP_STEP};
use crate::sample::StrokeSample;
use crate::spline::SplineSegment;

use super::{StrokeEngine, Traversal};

impl StrokeEngine {
    /// Retrieve the next evenly spaced stamp point, if one is available
    ///
    /// Returns `None` once every queued point has been consumed and the
    /// current span is exhausted - the normal steady state between input
    /// events, not an error. Drive it in a loop after each `add_point`:
    ///
    /// ```ignore
    /// engine.add_point(sample)?;
    /// while let Some(stamp) = engine.retrieve_next_stamp_point() {
    ///     rasterizer.stamp(stamp);
    /// }
    /// ```
    ///
    /// After `finalize`, the drain ends with one stamp at the exact final
    /// raw sample whenever the stamped stroke stopped more than a pixel
    /// short of it.
    pub fn retrieve_next_stamp_point(&mut self) -> Option<StrokeSample> {
        loop {
            match self.traversal {
                Traversal::Idle => {
                    if !self.build_window() {
                        return self.take_endpoint();
                    }
                }
                Traversal::Line { start, end } => {
                    let length = start.distance_to(&end);
                    if self.travel > length {
                        // Span exhausted: keep the fractional remainder and
                        // build the next window on the following iteration
                        self.travel -= length;
                        self.traversal = Traversal::Idle;
                        continue;
                    }
                    let ratio = if length > 0.0 { self.travel / length } else { 0.0 };
                    let position = start.position().lerp(end.position(), ratio);
                    return Some(self.emit(start, end, position, ratio));
                }
                Traversal::Curve { segment, start, end } => {
                    let length = segment.length();
                    if self.travel > length {
                        self.travel -= length;
                        self.traversal = Traversal::Idle;
                        continue;
                    }
                    let ratio = if length > 0.0 { self.travel / length } else { 0.0 };
                    let position = segment
                        .position_at_parameter(segment.parameter_at_arc_length(self.travel));
                    return Some(self.emit(start, end, position, ratio));
                }
            }
        }
    }

    /// Consume the next queued point and set up the span toward it.
    ///
    /// Returns false when no point is waiting.
    fn build_window(&mut self) -> bool {
        let Some(p2) = self.queue.pop() else {
            return false;
        };

        let p0 = self.prev0;
        let p1 = self.prev1;

        if p1.x == p2.x && p1.y == p2.y {
            // Zero-length span (duplicate input): draw a straight line
            // through to the next queued point instead
            let target = self.queue.pop().unwrap_or(p2);
            self.prev0 = p2;
            self.prev1 = target;
            self.traversal = Traversal::Line {
                start: p1,
                end: target,
            };
            return true;
        }

        self.prev0 = p1;
        self.prev1 = p2;

        if p1.distance_to(&p2) <= MIN_CURVE_SPAN {
            // Too short for curvature to be distinguishable, and the
            // spline math is numerically unstable down here
            self.traversal = Traversal::Line { start: p1, end: p2 };
            return true;
        }

        // Look ahead one point for the exit tangent; at the leading edge
        // of the queue the end point doubles as its own look-ahead
        let p3 = self.queue.peek().unwrap_or(p2);
        let segment = SplineSegment::new(
            p0.position(),
            p1.position(),
            p2.position(),
            p3.position(),
        );
        debug!(
            "build_window: curve ({:.1}, {:.1}) -> ({:.1}, {:.1}), arc length {:.2}",
            p1.x,
            p1.y,
            p2.x,
            p2.y,
            segment.length()
        );
        self.traversal = Traversal::Curve {
            segment,
            start: p1,
            end: p2,
        };
        true
    }

    /// Build the outgoing stamp and advance the travel accumulator.
    fn emit(
        &mut self,
        start: StrokeSample,
        end: StrokeSample,
        position: Vec2,
        ratio: f32,
    ) -> StrokeSample {
        // TODO: interpolate tilt and twist between the span endpoints;
        // for now they hold the span start's values
        let mut stamp = start;
        stamp.x = position.x;
        stamp.y = position.y;
        stamp.size = start.size + (end.size - start.size) * ratio;

        self.travel += (stamp.size * self.settings.spacing).max(MIN_STAMP_STEP);
        self.last_emitted = Some(stamp);
        stamp
    }

    /// Terminal stamp at the exact raw endpoint, owed once after
    /// finalization whenever stamping stopped short of it.
    fn take_endpoint(&mut self) -> Option<StrokeSample> {
        if !self.finalized || self.endpoint_emitted {
            return None;
        }
        let settled = self
            .last_emitted
            .is_some_and(|stamp| stamp.distance_to(&self.raw) <= ENDPOINT_EPSILON);
        if settled {
            return None;
        }

        self.endpoint_emitted = true;
        // The one permitted reset; everywhere else the accumulator only
        // ever decreases by consumed span lengths
        self.travel = 0.0;
        self.last_emitted = Some(self.raw);
        Some(self.raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::StrokeSettings;

    fn sample(x: f32, y: f32, size: f32) -> StrokeSample {
        StrokeSample::new(x, y, size)
    }

    /// Unsmoothed engine so collected points equal raw input.
    fn passthrough_engine(seed: StrokeSample, spacing: f32) -> StrokeEngine {
        StrokeEngine::new(StrokeSettings::new(1.0, spacing), seed)
    }

    #[test]
    fn test_retrieve_on_fresh_engine_returns_none() {
        let mut engine = passthrough_engine(sample(0.0, 0.0, 10.0), 0.25);
        assert!(engine.retrieve_next_stamp_point().is_none());
    }

    #[test]
    fn test_straight_line_uniform_spacing() {
        // Step is max(1, 10 * 0.5) = 5, so a 20 px stroke stamps at
        // x = 0, 5, 10, 15, 20
        let mut engine = passthrough_engine(sample(0.0, 0.0, 10.0), 0.5);
        let mut stamps = Vec::new();

        engine.add_point(sample(10.0, 0.0, 10.0)).unwrap();
        stamps.extend(engine.drain_stamps());
        engine.add_point(sample(20.0, 0.0, 10.0)).unwrap();
        stamps.extend(engine.drain_stamps());
        engine.finalize().unwrap();
        stamps.extend(engine.drain_stamps());

        // Tolerance covers the 64-step arc table discretization
        let expected = [0.0, 5.0, 10.0, 15.0, 20.0];
        assert_eq!(stamps.len(), expected.len());
        for (stamp, x) in stamps.iter().zip(expected) {
            assert!((stamp.x - x).abs() < 0.01, "got x={}, want {}", stamp.x, x);
            assert!(stamp.y.abs() < 1e-3);
            assert!((stamp.size - 10.0).abs() < 0.01);
        }
    }

    #[test]
    fn test_spacing_carries_across_spans() {
        // 7 px spans with a 4 px step: the fractional remainder must carry
        // so global spacing stays uniform
        let mut engine = passthrough_engine(sample(0.0, 0.0, 8.0), 0.5);
        let mut stamps = Vec::new();

        for x in [7.0, 14.0, 21.0, 28.0] {
            engine.add_point(sample(x, 0.0, 8.0)).unwrap();
            stamps.extend(engine.drain_stamps());
        }
        engine.finalize().unwrap();
        stamps.extend(engine.drain_stamps());

        let expected = [0.0, 4.0, 8.0, 12.0, 16.0, 20.0, 24.0, 28.0];
        assert_eq!(stamps.len(), expected.len());
        for (stamp, x) in stamps.iter().zip(expected) {
            assert!((stamp.x - x).abs() < 0.01, "got x={}, want {}", stamp.x, x);
        }

        // Emission order is stroke order
        for pair in stamps.windows(2) {
            assert!(pair[1].x > pair[0].x);
        }
    }

    #[test]
    fn test_size_interpolates_along_span() {
        let mut engine = passthrough_engine(sample(0.0, 0.0, 4.0), 0.5);
        engine.add_point(sample(8.0, 0.0, 12.0)).unwrap();
        let stamps = engine.drain_stamps();

        assert!(stamps.len() >= 2);
        // Sizes grow monotonically from the span start's toward the end's
        for pair in stamps.windows(2) {
            assert!(pair[1].size >= pair[0].size);
        }
        assert!((stamps[0].size - 4.0).abs() < 1e-3);
        assert!(stamps.last().unwrap().size <= 12.0 + 1e-3);
    }

    #[test]
    fn test_duplicate_sample_is_bounded_and_finite() {
        let mut engine = passthrough_engine(sample(0.0, 0.0, 4.0), 0.25);
        engine.add_point(sample(0.0, 0.0, 4.0)).unwrap();

        let mut emitted = 0;
        for _ in 0..16 {
            match engine.retrieve_next_stamp_point() {
                Some(stamp) => {
                    emitted += 1;
                    assert!(stamp.x.is_finite() && stamp.y.is_finite());
                    assert!(stamp.x.abs() < 1e-3 && stamp.y.abs() < 1e-3);
                }
                None => break,
            }
        }

        // At most the one degenerate stamp, and the engine settles to None
        assert!(emitted <= 1);
        assert!(engine.retrieve_next_stamp_point().is_none());
    }

    #[test]
    fn test_jittery_cluster_stays_bounded() {
        let mut engine = StrokeEngine::new(StrokeSettings::new(0.7, 0.25), sample(5.0, 5.0, 3.0));
        let jitter = [
            (5.2, 4.9),
            (5.2, 4.9),
            (4.8, 5.1),
            (5.0, 5.0),
            (5.1, 5.2),
            (5.1, 5.2),
            (4.9, 4.8),
        ];

        let mut stamps = Vec::new();
        for (x, y) in jitter {
            engine.add_point(sample(x, y, 3.0)).unwrap();
            stamps.extend(engine.drain_stamps());
        }
        engine.finalize().unwrap();
        stamps.extend(engine.drain_stamps());

        for stamp in &stamps {
            assert!(stamp.x.is_finite() && stamp.y.is_finite());
            assert!((4.0..=6.0).contains(&stamp.x));
            assert!((4.0..=6.0).contains(&stamp.y));
        }
    }

    #[test]
    fn test_sharp_corner_overshoot_bounded() {
        // A zig-zag must curve smoothly through the corner without flying
        // past it; chordal parameterization keeps the bulge small
        let mut engine = passthrough_engine(sample(0.0, 0.0, 6.0), 0.5);
        let mut stamps = Vec::new();

        engine.add_point(sample(10.0, 0.0, 6.0)).unwrap();
        stamps.extend(engine.drain_stamps());
        engine.add_point(sample(10.0, 10.0, 6.0)).unwrap();
        stamps.extend(engine.drain_stamps());
        engine.finalize().unwrap();
        stamps.extend(engine.drain_stamps());

        assert!(!stamps.is_empty());
        for stamp in &stamps {
            assert!(stamp.x.is_finite() && stamp.y.is_finite());
            assert!(stamp.x <= 12.0, "overshoot past the corner: x={}", stamp.x);
            assert!((-2.0..=12.0).contains(&stamp.y));
        }
    }

    #[test]
    fn test_finalize_terminates_on_exact_endpoint() {
        let mut engine = passthrough_engine(sample(0.0, 0.0, 10.0), 0.25);
        engine.add_point(sample(10.0, 0.0, 10.0)).unwrap();
        let mut stamps = engine.drain_stamps();

        engine.finalize().unwrap();
        stamps.extend(engine.drain_stamps());

        // Step 2.5 over a 10 px stroke: five stamps, the last exactly on
        // the raw endpoint
        assert_eq!(stamps.len(), 5);
        assert_eq!(*stamps.last().unwrap(), sample(10.0, 0.0, 10.0));

        // Exhausted for good
        assert!(engine.retrieve_next_stamp_point().is_none());
    }

    #[test]
    fn test_finalize_drains_smoothing_lag() {
        let mut engine = StrokeEngine::new(StrokeSettings::new(0.1, 0.25), sample(0.0, 0.0, 10.0));
        for x in [50.0, 100.0, 150.0, 200.0] {
            engine.add_point(sample(x, 0.0, 10.0)).unwrap();
        }
        let before_finalize = engine.drain_stamps();

        // The smoothed cursor is far short of x = 200 at this point
        assert!(before_finalize.last().unwrap().x < 100.0);

        engine.finalize().unwrap();
        let tail = engine.drain_stamps();

        // The drain walks the lag down and terminates on the exact raw
        // endpoint
        let last = tail.last().expect("finalization emits trailing stamps");
        assert_eq!(*last, sample(200.0, 0.0, 10.0));
        assert!(tail.len() < 1000);
        assert!(engine.retrieve_next_stamp_point().is_none());
    }
}
