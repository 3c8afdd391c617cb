/// Arc-length table steps per spline segment (the table holds steps + 1 entries).
pub const ARC_TABLE_STEPS: usize = 64;

/// Spans with a chord at or below this many pixels are drawn as straight lines.
pub const MIN_CURVE_SPAN: f32 = 2.0;

/// Minimum distance between consecutive stamp points, in pixels.
pub const MIN_STAMP_STEP: f32 = 1.0;

/// Fraction of the remaining gap the smoothed cursor covers per finalization step.
pub const ENDPOINT_SNAP_RATE: f32 = 0.05;

/// Per-axis convergence threshold for finalization, in pixels.
pub const ENDPOINT_EPSILON: f32 = 1.0;
