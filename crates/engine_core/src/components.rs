//! ECS components stored in the host world.

use glam::Vec3;

use crate::host::ModelId;

/// World-space position (Z-up).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WorldPosition(pub Vec3);

/// Velocity component for moving entities.
#[derive(Debug, Clone, Copy, Default)]
pub struct Velocity {
    pub linear: Vec3,
}

/// What kind of thing an entity is, as far as host queries are concerned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EntityKind {
    #[default]
    Object,
    Vehicle,
    Character,
}

impl EntityKind {
    /// Vehicles and characters answer movable-entity queries; props do not.
    pub fn is_movable(self) -> bool {
        matches!(self, EntityKind::Vehicle | EntityKind::Character)
    }
}

/// Model an object was spawned from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectModel(pub ModelId);
