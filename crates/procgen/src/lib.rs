//! Procedural terrain sources for the host world.

pub mod terrain;

pub use terrain::*;
