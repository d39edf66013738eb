//! In-memory host world implementing every host service over a `hecs::World`.
//! Used by headless runs and by tests of gameplay systems.

use std::collections::HashSet;

use glam::Vec3;
use hecs::{Entity, World};

use crate::assets::ModelCatalog;
use crate::components::{EntityKind, ObjectModel, Velocity, WorldPosition};
use crate::host::{DebugDraw, EntityQuery, GroundQuery, ModelId, ModelStreaming, WorldObjects};

/// Constant-height ground.
impl GroundQuery for f32 {
    fn ground_height(&self, _x: f32, _y: f32) -> f32 {
        *self
    }
}

/// Headless host: entities, model streaming, terrain and a debug marker list.
pub struct SandboxWorld {
    world: World,
    catalog: ModelCatalog,
    ground: Box<dyn GroundQuery>,
    /// Models currently loaded in memory.
    resident: HashSet<ModelId>,
    /// Models someone asked to keep loaded and hasn't released yet.
    pinned: HashSet<ModelId>,
    /// Debug markers drawn since the last `take_markers`.
    markers: Vec<Vec3>,
}

impl SandboxWorld {
    pub fn new(catalog: ModelCatalog, ground: impl GroundQuery + 'static) -> Self {
        Self {
            world: World::new(),
            catalog,
            ground: Box::new(ground),
            resident: HashSet::new(),
            pinned: HashSet::new(),
            markers: Vec::new(),
        }
    }

    pub fn spawn_vehicle(&mut self, position: Vec3) -> Entity {
        self.world.spawn((WorldPosition(position), EntityKind::Vehicle, Velocity::default()))
    }

    pub fn spawn_character(&mut self, position: Vec3) -> Entity {
        self.world.spawn((WorldPosition(position), EntityKind::Character, Velocity::default()))
    }

    /// Remove any entity. Returns false if it was already gone.
    pub fn despawn(&mut self, entity: Entity) -> bool {
        let model = self.world.get::<&ObjectModel>(entity).ok().map(|m| m.0);
        let removed = self.world.despawn(entity).is_ok();
        if let Some(model) = model {
            self.evict_if_unused(model);
        }
        removed
    }

    pub fn set_velocity(&mut self, entity: Entity, linear: Vec3) {
        if let Ok(mut velocity) = self.world.get::<&mut Velocity>(entity) {
            velocity.linear = linear;
        }
    }

    /// Integrate entity velocities over `dt`.
    pub fn advance_entities(&mut self, dt: f32) {
        for (_, (position, velocity)) in self.world.query_mut::<(&mut WorldPosition, &Velocity)>() {
            position.0 += velocity.linear * dt;
        }
    }

    /// Number of spawned props (entities carrying a model).
    pub fn object_count(&self) -> usize {
        self.world.query::<&ObjectModel>().iter().count()
    }

    /// Models requested and not yet released.
    pub fn pinned_models(&self) -> impl Iterator<Item = ModelId> + '_ {
        self.pinned.iter().copied()
    }

    pub fn take_markers(&mut self) -> Vec<Vec3> {
        std::mem::take(&mut self.markers)
    }

    fn model_in_use(&self, model: ModelId) -> bool {
        self.world
            .query::<&ObjectModel>()
            .iter()
            .any(|(_, object)| object.0 == model)
    }

    fn evict_if_unused(&mut self, model: ModelId) {
        if !self.pinned.contains(&model) && !self.model_in_use(model) && self.resident.remove(&model) {
            log::trace!("Evicted model {}", model);
        }
    }
}

impl ModelStreaming for SandboxWorld {
    fn model_exists(&self, model: ModelId) -> bool {
        self.catalog.contains(model)
    }

    fn is_model_resident(&self, model: ModelId) -> bool {
        self.resident.contains(&model)
    }

    fn request_model(&mut self, model: ModelId) {
        if !self.catalog.contains(model) {
            log::warn!("Requested unknown model {}", model);
            return;
        }
        self.resident.insert(model);
        self.pinned.insert(model);
    }

    fn release_model(&mut self, model: ModelId) {
        self.pinned.remove(&model);
        self.evict_if_unused(model);
    }

    fn model_extent(&self, model: ModelId) -> Vec3 {
        self.catalog.get(model).map(|entry| entry.extent).unwrap_or(Vec3::ZERO)
    }
}

impl WorldObjects for SandboxWorld {
    fn spawn_object(&mut self, model: ModelId, position: Vec3) -> Entity {
        if !self.resident.contains(&model) {
            log::warn!("Spawning object with non-resident model {}", model);
        }
        self.world.spawn((WorldPosition(position), EntityKind::Object, ObjectModel(model)))
    }

    fn set_object_position(&mut self, handle: Entity, position: Vec3) {
        if let Ok(mut current) = self.world.get::<&mut WorldPosition>(handle) {
            current.0 = position;
        }
    }

    fn object_position(&self, handle: Entity) -> Option<Vec3> {
        self.world.get::<&WorldPosition>(handle).ok().map(|p| p.0)
    }

    fn destroy_object(&mut self, handle: Entity) {
        if !self.despawn(handle) {
            log::trace!("Destroy of stale handle {:?}", handle);
        }
    }
}

impl GroundQuery for SandboxWorld {
    fn ground_height(&self, x: f32, y: f32) -> f32 {
        self.ground.ground_height(x, y)
    }
}

impl EntityQuery for SandboxWorld {
    fn entity_position(&self, handle: Entity) -> Option<Vec3> {
        let kind = self.world.get::<&EntityKind>(handle).ok().map(|k| *k)?;
        if !kind.is_movable() {
            return None;
        }
        self.object_position(handle)
    }
}

impl DebugDraw for SandboxWorld {
    fn draw_marker(&mut self, position: Vec3) {
        self.markers.push(position);
    }
}
