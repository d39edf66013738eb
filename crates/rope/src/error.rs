//! Construction failures.

use thiserror::Error;

/// Why a rope could not be built. No partial rope is ever returned.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RopeError {
    /// The model is not part of the game's asset data.
    #[error("model `{name}` does not exist")]
    InvalidModel { name: String },
    /// The first segment would touch or sit below the ground.
    #[error("anchor too low: first segment at z={anchor_z} but ground is at z={ground_z}")]
    InvalidAnchor { anchor_z: f32, ground_z: f32 },
}
