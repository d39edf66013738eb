//! Synthetic wind sway.

use std::f32::consts::TAU;

use glam::Vec3;

/// Rotating lateral push whose strength grows with distance from the anchor.
#[derive(Debug, Clone, Copy)]
pub struct Wind {
    pub phase: f32,
    /// Phase advance per frame.
    pub frequency: f32,
    /// Offset per segment index.
    pub amplitude: f32,
    /// Keep `phase` in [0, 2π).
    pub wrap: bool,
}

impl Wind {
    pub fn new(frequency: f32, amplitude: f32) -> Self {
        Self {
            phase: 0.0,
            frequency,
            amplitude,
            wrap: true,
        }
    }

    /// Advance one frame.
    pub fn advance(&mut self) {
        self.phase += self.frequency;
        if self.wrap {
            self.phase = self.phase.rem_euclid(TAU);
        }
    }

    /// Lateral offset of segment `index`. Always zero for the anchor segment.
    pub fn offset(&self, index: usize) -> Vec3 {
        let reach = index as f32 * self.amplitude;
        Vec3::new(self.phase.sin() * reach, self.phase.cos() * reach, 0.0)
    }
}
