//! Rope tunables. Loadable from RON; missing fields take defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RopeConfig {
    /// Wind phase advance per frame (radians).
    #[serde(default = "default_wind_frequency")]
    pub wind_frequency: f32,
    /// Lateral sway per segment index.
    #[serde(default = "default_wind_amplitude")]
    pub wind_amplitude: f32,
    /// Exponent of the deploy/undeploy easing curves.
    #[serde(default = "default_easing_exponent")]
    pub easing_exponent: f32,
    /// Draw a debug marker on every segment each frame.
    #[serde(default)]
    pub show_debug_points: bool,
    /// How close the last segment must be to its target to count as deployed.
    #[serde(default = "default_deployed_tolerance")]
    pub deployed_tolerance: f32,
    /// How close the last segment must be to the anchor to count as undeployed.
    #[serde(default = "default_retracted_tolerance")]
    pub retracted_tolerance: f32,
    /// Keep the wind phase in [0, 2π).
    #[serde(default = "default_true")]
    pub wrap_wind_phase: bool,
}

fn default_wind_frequency() -> f32 {
    0.015
}
fn default_wind_amplitude() -> f32 {
    0.025
}
fn default_easing_exponent() -> f32 {
    1.5
}
fn default_deployed_tolerance() -> f32 {
    0.15
}
fn default_retracted_tolerance() -> f32 {
    0.1
}
fn default_true() -> bool {
    true
}

impl Default for RopeConfig {
    fn default() -> Self {
        Self {
            wind_frequency: default_wind_frequency(),
            wind_amplitude: default_wind_amplitude(),
            easing_exponent: default_easing_exponent(),
            show_debug_points: false,
            deployed_tolerance: default_deployed_tolerance(),
            retracted_tolerance: default_retracted_tolerance(),
            wrap_wind_phase: default_true(),
        }
    }
}

impl RopeConfig {
    /// Parse from a RON string.
    pub fn from_ron(data: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(data)
    }

    /// Load from a RON file. If the file is missing or invalid, returns the defaults.
    pub fn load(path: &Path) -> Self {
        if let Ok(data) = std::fs::read_to_string(path) {
            match Self::from_ron(&data) {
                Ok(c) => return c,
                Err(e) => log::warn!("Invalid rope config at {:?}: {}, using defaults", path, e),
            }
        }
        Self::default()
    }
}
