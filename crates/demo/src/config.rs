//! Demo configuration. Loaded from ropedemo.ron at startup.

use std::path::{Path, PathBuf};

use procgen::TerrainConfig;
use rope::RopeConfig;
use serde::{Deserialize, Serialize};

/// Settings for a headless rope run. Every field is optional in the file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemoConfig {
    /// Frames to simulate before the rope is deleted.
    #[serde(default = "default_frames")]
    pub frames: u32,
    /// Seconds per frame.
    #[serde(default = "default_fixed_step")]
    pub fixed_step: f32,
    /// Model every segment is spawned from.
    #[serde(default = "default_segment_model")]
    pub segment_model: String,
    /// Optional model table; the built-in one is used when absent.
    #[serde(default)]
    pub models_path: Option<PathBuf>,
    /// Vehicle height above the ground it flies over.
    #[serde(default = "default_hover_height")]
    pub hover_height: f32,
    #[serde(default = "default_orbit_radius")]
    pub orbit_radius: f32,
    /// Radians per second.
    #[serde(default = "default_orbit_speed")]
    pub orbit_speed: f32,
    /// Fraction of the run after which the rope is pulled back up.
    #[serde(default = "default_undeploy_at")]
    pub undeploy_at: f32,
    /// Seeds the vehicle's starting point on its orbit.
    #[serde(default)]
    pub seed: u64,
    #[serde(default)]
    pub terrain: TerrainConfig,
    #[serde(default)]
    pub rope: RopeConfig,
}

fn default_frames() -> u32 {
    600
}
fn default_fixed_step() -> f32 {
    1.0 / 60.0
}
fn default_segment_model() -> String {
    "prop_rope_seg".to_string()
}
fn default_hover_height() -> f32 {
    25.0
}
fn default_orbit_radius() -> f32 {
    12.0
}
fn default_orbit_speed() -> f32 {
    0.4
}
fn default_undeploy_at() -> f32 {
    0.6
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            frames: default_frames(),
            fixed_step: default_fixed_step(),
            segment_model: default_segment_model(),
            models_path: None,
            hover_height: default_hover_height(),
            orbit_radius: default_orbit_radius(),
            orbit_speed: default_orbit_speed(),
            undeploy_at: default_undeploy_at(),
            seed: 0,
            terrain: TerrainConfig::default(),
            rope: RopeConfig::default(),
        }
    }
}

impl DemoConfig {
    /// Load config from `path`, or `ropedemo.ron` in the current directory.
    /// If the file is missing or invalid, returns default config.
    pub fn load(path: Option<&Path>) -> Self {
        let path = path.map(Path::to_path_buf).unwrap_or_else(config_path);
        if let Ok(data) = std::fs::read_to_string(&path) {
            match ron::from_str(&data) {
                Ok(c) => return c,
                Err(e) => log::warn!("Invalid config at {:?}: {}, using defaults", path, e),
            }
        } else {
            log::info!("No config at {:?}, using defaults", path);
        }
        Self::default()
    }

    /// Frame on which undeploying starts.
    pub fn undeploy_frame(&self) -> u32 {
        (self.frames as f32 * self.undeploy_at.clamp(0.0, 1.0)) as u32
    }
}

fn config_path() -> PathBuf {
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join("ropedemo.ron")
}
