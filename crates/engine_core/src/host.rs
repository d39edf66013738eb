//! Host service interfaces consumed by gameplay systems.
//!
//! Gameplay code never owns engine objects directly. It holds `hecs::Entity`
//! handles (generational arena indices) and talks to the host through the
//! narrow traits below. Coordinates are Z-up: `Vec3.z` is height.

use std::fmt;

use glam::Vec3;
use hecs::Entity;

/// Handle to a spawned world object (segment, prop, vehicle, character).
pub type ObjectHandle = Entity;

/// Numeric model identifier derived from the model's asset name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModelId(pub u32);

impl ModelId {
    /// Hash an asset name into its model id (case-insensitive).
    pub fn from_name(name: &str) -> Self {
        Self(joaat(name))
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08X}", self.0)
    }
}

/// Jenkins one-at-a-time hash over the lowercased bytes of `name`.
fn joaat(name: &str) -> u32 {
    let mut hash: u32 = 0;
    for byte in name.bytes() {
        hash = hash.wrapping_add(byte.to_ascii_lowercase() as u32);
        hash = hash.wrapping_add(hash << 10);
        hash ^= hash >> 6;
    }
    hash = hash.wrapping_add(hash << 3);
    hash ^= hash >> 11;
    hash.wrapping_add(hash << 15)
}

/// Model residency (streaming) service.
pub trait ModelStreaming {
    /// Whether the model exists in the game's asset data at all.
    fn model_exists(&self, model: ModelId) -> bool;
    /// Whether the model is currently loaded in memory.
    fn is_model_resident(&self, model: ModelId) -> bool;
    /// Ask the streamer to load the model and keep it pinned.
    fn request_model(&mut self, model: ModelId);
    /// Drop our pin on the model; the streamer may evict it once unused.
    fn release_model(&mut self, model: ModelId);
    /// Bounding size of the model.
    fn model_extent(&self, model: ModelId) -> Vec3;
}

/// Spawning and moving plain world objects.
pub trait WorldObjects {
    fn spawn_object(&mut self, model: ModelId, position: Vec3) -> ObjectHandle;
    fn set_object_position(&mut self, handle: ObjectHandle, position: Vec3);
    /// `None` if the handle no longer refers to a live object.
    fn object_position(&self, handle: ObjectHandle) -> Option<Vec3>;
    fn destroy_object(&mut self, handle: ObjectHandle);
}

/// Terrain height lookups.
pub trait GroundQuery {
    /// Ground height under the point `(x, y)`.
    fn ground_height(&self, x: f32, y: f32) -> f32;
}

/// Position lookups for movable entities (vehicles, characters).
pub trait EntityQuery {
    /// `None` if the handle does not refer to a live vehicle or character.
    fn entity_position(&self, handle: ObjectHandle) -> Option<Vec3>;
}

/// Debug visualization. Hosts without a debug overlay keep the no-op default.
pub trait DebugDraw {
    fn draw_marker(&mut self, _position: Vec3) {}
}

/// Everything a gameplay system may ask of the host.
pub trait ScriptHost: ModelStreaming + WorldObjects + GroundQuery + EntityQuery + DebugDraw {}

impl<T> ScriptHost for T where T: ModelStreaming + WorldObjects + GroundQuery + EntityQuery + DebugDraw {}
