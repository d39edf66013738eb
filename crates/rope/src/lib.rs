//! Procedural rope/chain animator.
//!
//! A rope is a column of spawned segments hanging from an anchor (fixed, or
//! tracked from a vehicle or character) down to the ground. Each frame the
//! host calls [`Rope::process`]; segments are placed from a closed-form target
//! with synthetic wind sway, blended by an eased deploy/undeploy progress.
//! There is no physics: no tension, collision or constraint solving.

pub mod attachment;
mod builder;
pub mod config;
pub mod deployment;
pub mod error;
pub mod rope;
pub mod wind;

pub use attachment::*;
pub use config::*;
pub use deployment::*;
pub use error::*;
pub use rope::*;
pub use wind::*;
