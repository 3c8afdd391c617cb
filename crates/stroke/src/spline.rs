use glam::Vec2;

use crate::constants::ARC_TABLE_STEPS;

/// One Catmull-Rom piece with chord-length parameterization and an
/// arc-length lookup table
///
/// The curve runs from `p1` to `p2`; `p0` and `p3` shape the entry and exit
/// tangents. Knots are spaced by chord length so unevenly spaced input does
/// not produce overshoot or loops the way uniform parameterization would.
/// The lookup table maps distance traveled along the curve back to the
/// spline parameter, which is what lets stamps be placed at exact
/// arc-length intervals.
///
/// Built fresh per segment and passed by value; holds no heap storage.
#[derive(Debug, Clone, Copy)]
pub struct SplineSegment {
    p0: Vec2,
    p1: Vec2,
    p2: Vec2,
    p3: Vec2,
    t0: f32,
    t1: f32,
    t2: f32,
    t3: f32,
    /// Cumulative arc length at uniform steps of the local parameter
    lengths: [f32; ARC_TABLE_STEPS + 1],
}

impl SplineSegment {
    /// Build the segment between `p1` and `p2`
    pub fn new(p0: Vec2, p1: Vec2, p2: Vec2, p3: Vec2) -> Self {
        let t0 = 0.0;
        let t1 = t0 + p0.distance(p1);
        let t2 = t1 + p1.distance(p2);
        let t3 = t2 + p2.distance(p3);

        let mut segment = Self {
            p0,
            p1,
            p2,
            p3,
            t0,
            t1,
            t2,
            t3,
            lengths: [0.0; ARC_TABLE_STEPS + 1],
        };

        let mut total = 0.0;
        let mut prev = segment.position_at_parameter(t1);
        for i in 1..=ARC_TABLE_STEPS {
            let local = i as f32 / ARC_TABLE_STEPS as f32;
            let pos = segment.position_at_parameter(t1 + (t2 - t1) * local);
            total += prev.distance(pos);
            segment.lengths[i] = total;
            prev = pos;
        }

        segment
    }

    /// Total arc length between the segment's anchors
    pub fn length(&self) -> f32 {
        self.lengths[ARC_TABLE_STEPS]
    }

    /// Evaluate the curve at global parameter `tt`
    ///
    /// Two passes of linear blending collapse the four control points down
    /// to a single position. Blends across a zero-width knot span return
    /// their earlier control point, so duplicate control points yield a
    /// defined position instead of NaN.
    pub fn position_at_parameter(&self, tt: f32) -> Vec2 {
        let a1 = blend(self.p0, self.p1, self.t0, self.t1, tt);
        let a2 = blend(self.p1, self.p2, self.t1, self.t2, tt);
        let a3 = blend(self.p2, self.p3, self.t2, self.t3, tt);
        let b1 = blend(a1, a2, self.t0, self.t2, tt);
        let b2 = blend(a2, a3, self.t1, self.t3, tt);
        blend(b1, b2, self.t1, self.t2, tt)
    }

    /// Parameter at the given arc-length distance from the segment start
    ///
    /// Clamps to `[0, length]`, binary-searches the lookup table for the
    /// bracketing entries, and linearly interpolates between them.
    pub fn parameter_at_arc_length(&self, distance: f32) -> f32 {
        let distance = distance.clamp(0.0, self.length());
        let idx = self.lengths.partition_point(|&len| len < distance);
        if idx == 0 {
            return self.t1;
        }

        let below = self.lengths[idx - 1];
        let above = self.lengths[idx];
        let span = above - below;
        let frac = if span > 0.0 { (distance - below) / span } else { 0.0 };
        let local = ((idx - 1) as f32 + frac) / ARC_TABLE_STEPS as f32;
        self.t1 + (self.t2 - self.t1) * local
    }
}

/// Linear blend of two control points over the knot span `[ta, tb]`.
/// A zero-width span returns `a` rather than dividing by zero.
fn blend(a: Vec2, b: Vec2, ta: f32, tb: f32, t: f32) -> Vec2 {
    let span = tb - ta;
    if span == 0.0 {
        return a;
    }
    a * ((tb - t) / span) + b * ((t - ta) / span)
}
