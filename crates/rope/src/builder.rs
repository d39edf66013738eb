//! Builds the chain of segments from the anchor down to the ground.

use engine_core::{ModelId, ObjectHandle, ScriptHost};
use glam::Vec3;

use crate::error::RopeError;

/// Freshly spawned chain: segment 0 hangs just below the anchor.
#[derive(Debug)]
pub(crate) struct Chain {
    pub model: ModelId,
    pub extent: Vec3,
    pub segments: Vec<ObjectHandle>,
}

/// Fully extended position of segment `index` below `anchor`.
#[inline]
pub(crate) fn hang_position(anchor: Vec3, segment_height: f32, index: usize) -> Vec3 {
    anchor - Vec3::Z * (segment_height * (index + 1) as f32)
}

/// Spawn segments one extent apart, starting one extent below `anchor`,
/// until the next one would touch the ground.
pub(crate) fn build_chain<H: ScriptHost>(
    host: &mut H,
    anchor: Vec3,
    model_name: &str,
) -> Result<Chain, RopeError> {
    let model = ModelId::from_name(model_name);
    if !host.model_exists(model) {
        return Err(RopeError::InvalidModel {
            name: model_name.to_string(),
        });
    }

    let requested = !host.is_model_resident(model);
    if requested {
        host.request_model(model);
    }

    let extent = host.model_extent(model);
    if !(extent.z > 0.0 && extent.z.is_finite()) {
        // A flat or non-finite segment can never reach the ground.
        if requested {
            host.release_model(model);
        }
        return Err(RopeError::InvalidModel {
            name: model_name.to_string(),
        });
    }

    let ground_z = host.ground_height(anchor.x, anchor.y);
    let first = hang_position(anchor, extent.z, 0);
    if !(first.z > ground_z && first.z.is_finite() && ground_z.is_finite()) {
        if requested {
            host.release_model(model);
        }
        return Err(RopeError::InvalidAnchor {
            anchor_z: first.z,
            ground_z,
        });
    }

    let mut segments = Vec::new();
    loop {
        let position = hang_position(anchor, extent.z, segments.len());
        segments.push(host.spawn_object(model, position));
        if hang_position(anchor, extent.z, segments.len()).z <= ground_z {
            break;
        }
    }

    // Spawned segments keep the model alive from here on.
    if requested {
        host.release_model(model);
    }

    log::debug!(
        "Built chain of {} x {} from z={} to ground z={}",
        segments.len(),
        model_name,
        anchor.z,
        ground_z
    );

    Ok(Chain {
        model,
        extent,
        segments,
    })
}
