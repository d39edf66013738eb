//! Anchor tracking for ropes hung from vehicles or characters.

use engine_core::{EntityQuery, ObjectHandle};
use glam::Vec3;

/// Entity the anchor follows, if any.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Attachment {
    #[default]
    None,
    Vehicle(ObjectHandle),
    Character(ObjectHandle),
}

impl Attachment {
    pub fn handle(&self) -> Option<ObjectHandle> {
        match *self {
            Attachment::None => None,
            Attachment::Vehicle(handle) | Attachment::Character(handle) => Some(handle),
        }
    }

    pub fn is_attached(&self) -> bool {
        self.handle().is_some()
    }
}

/// Anchor for this frame.
///
/// An explicit override wins outright and the attachment is not consulted.
/// Otherwise a live attachment supplies the position, and a dead one yields
/// `None` so the caller skips the frame. With no attachment the fixed anchor
/// is used.
pub fn resolve_anchor(
    host: &impl EntityQuery,
    attachment: Attachment,
    fixed: Vec3,
    override_anchor: Option<Vec3>,
) -> Option<Vec3> {
    if let Some(anchor) = override_anchor {
        return Some(anchor);
    }
    match attachment.handle() {
        Some(handle) => host.entity_position(handle),
        None => Some(fixed),
    }
}
