//! Core host-side types shared by the rope workspace.
//!
//! This crate provides:
//! - Model ids and the host service traits gameplay code talks through
//! - The read-only model asset table
//! - ECS components and an in-memory sandbox world implementing every service
//! - Time management

pub mod assets;
pub mod components;
pub mod host;
pub mod sandbox;
pub mod time;

pub use assets::*;
pub use components::*;
pub use host::*;
pub use sandbox::*;
pub use time::*;

// Re-export commonly used types
pub use glam::Vec3;
pub use hecs::{Entity, World};
