use glam::Vec2;
use serde::{Deserialize, Serialize};

/// A single stroke sample
///
/// The same shape is used for raw pointer/stylus input and for the stamp
/// points the engine emits. This struct is designed for GPU compatibility
/// with bytemuck so stamp batches can be uploaded without conversion.
#[derive(
    Debug, Clone, Copy, PartialEq, Serialize, Deserialize, bytemuck::Pod, bytemuck::Zeroable,
)]
#[repr(C)]
pub struct StrokeSample {
    /// X position in surface coordinates
    pub x: f32,
    /// Y position in surface coordinates
    pub y: f32,
    /// Brush diameter in pixels
    pub size: f32,
    /// Stylus tilt along the x axis
    pub tilt_x: f32,
    /// Stylus tilt along the y axis
    pub tilt_y: f32,
    /// Stylus barrel rotation
    pub twist: f32,
}

impl StrokeSample {
    /// Create a sample with neutral stylus orientation
    pub fn new(x: f32, y: f32, size: f32) -> Self {
        Self {
            x,
            y,
            size,
            tilt_x: 0.0,
            tilt_y: 0.0,
            twist: 0.0,
        }
    }

    /// Position as a vector
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Euclidean distance to another sample's position
    pub fn distance_to(&self, other: &StrokeSample) -> f32 {
        self.position().distance(other.position())
    }

    /// Move every field a fraction of the way toward `target`
    ///
    /// `factor` 0.0 leaves the sample unchanged, 1.0 snaps it onto `target`.
    pub fn move_toward(&mut self, target: &StrokeSample, factor: f32) {
        self.x += (target.x - self.x) * factor;
        self.y += (target.y - self.y) * factor;
        self.size += (target.size - self.size) * factor;
        self.tilt_x += (target.tilt_x - self.tilt_x) * factor;
        self.tilt_y += (target.tilt_y - self.tilt_y) * factor;
        self.twist += (target.twist - self.twist) * factor;
    }
}
