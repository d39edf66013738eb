//! Read-only model asset table. Loaded once at startup and handed to the host.

use std::collections::HashMap;
use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::host::ModelId;

/// Errors raised while loading the asset table.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("could not read asset table {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid asset table: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("model `{0}` is listed twice")]
    DuplicateModel(String),
    #[error("model `{name}` has invalid height {height}")]
    BadExtent { name: String, height: f32 },
}

/// One model as described on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelEntry {
    pub name: String,
    /// Bounding size (x, y, z); z is the vertical extent.
    pub extent: Vec3,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct CatalogFile {
    models: Vec<ModelEntry>,
}

/// Immutable lookup of known models by id.
#[derive(Debug, Clone, Default)]
pub struct ModelCatalog {
    entries: HashMap<ModelId, ModelEntry>,
}

impl ModelCatalog {
    /// Build a catalog from entries, rejecting duplicates and flat or non-finite models.
    pub fn from_entries(models: impl IntoIterator<Item = ModelEntry>) -> Result<Self, AssetError> {
        let mut entries = HashMap::new();
        for entry in models {
            if !(entry.extent.z > 0.0 && entry.extent.z.is_finite()) {
                return Err(AssetError::BadExtent {
                    name: entry.name,
                    height: entry.extent.z,
                });
            }
            let id = ModelId::from_name(&entry.name);
            if entries.contains_key(&id) {
                return Err(AssetError::DuplicateModel(entry.name));
            }
            entries.insert(id, entry);
        }
        Ok(Self { entries })
    }

    /// Parse a RON table of the form `(models: [(name: "...", extent: (x, y, z)), ...])`.
    pub fn from_ron(data: &str) -> Result<Self, AssetError> {
        let file: CatalogFile = ron::from_str(data)?;
        Self::from_entries(file.models)
    }

    pub fn load(path: &Path) -> Result<Self, AssetError> {
        let data = std::fs::read_to_string(path).map_err(|source| AssetError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let catalog = Self::from_ron(&data)?;
        log::info!("Loaded {} models from {:?}", catalog.len(), path);
        Ok(catalog)
    }

    pub fn get(&self, id: ModelId) -> Option<&ModelEntry> {
        self.entries.get(&id)
    }

    pub fn contains(&self, id: ModelId) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
