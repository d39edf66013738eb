//! Scripted vehicle path: a circle flown at constant height above the terrain.

use engine_core::GroundQuery;
use glam::Vec3;

#[derive(Debug, Clone, Copy)]
pub struct Orbit {
    pub center: Vec3,
    pub radius: f32,
    /// Radians per second.
    pub speed: f32,
    pub angle: f32,
    /// Height kept above the ground directly below.
    pub hover: f32,
}

impl Orbit {
    pub fn step(&mut self, dt: f32) {
        self.angle = (self.angle + self.speed * dt).rem_euclid(std::f32::consts::TAU);
    }

    pub fn position(&self, ground: &impl GroundQuery) -> Vec3 {
        let x = self.center.x + self.angle.cos() * self.radius;
        let y = self.center.y + self.angle.sin() * self.radius;
        Vec3::new(x, y, ground.ground_height(x, y) + self.hover)
    }
}
