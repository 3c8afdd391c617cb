use serde::{Deserialize, Serialize};

/// Default smoothing factor.
pub const DEFAULT_SMOOTHING: f32 = 0.5;

/// Default stamp spacing as a fraction of brush diameter.
pub const DEFAULT_SPACING: f32 = 0.25;

/// Tuning parameters for a stroke engine
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrokeSettings {
    /// Weight of the newest sample in the smoothing average, 0.0-1.0.
    /// 0.0 freezes the smoothed cursor in place, 1.0 disables smoothing
    pub smoothing: f32,
    /// Spacing between stamps as a fraction of brush diameter
    /// (e.g. 0.25 = 25% of diameter)
    pub spacing: f32,
}

impl Default for StrokeSettings {
    fn default() -> Self {
        Self {
            smoothing: DEFAULT_SMOOTHING,
            spacing: DEFAULT_SPACING,
        }
    }
}

impl StrokeSettings {
    /// Create settings with the given factors, clamped to valid ranges
    pub fn new(smoothing: f32, spacing: f32) -> Self {
        Self {
            smoothing: smoothing.clamp(0.0, 1.0),
            spacing: spacing.max(0.01), // Prevent zero spacing
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = StrokeSettings::default();
        assert_eq!(settings.smoothing, DEFAULT_SMOOTHING);
        assert_eq!(settings.spacing, DEFAULT_SPACING);
    }

    #[test]
    fn test_new_clamps_ranges() {
        let settings = StrokeSettings::new(1.5, -2.0);
        assert_eq!(settings.smoothing, 1.0);
        assert_eq!(settings.spacing, 0.01);

        let settings = StrokeSettings::new(-0.5, 0.5);
        assert_eq!(settings.smoothing, 0.0);
        assert_eq!(settings.spacing, 0.5);
    }
}
