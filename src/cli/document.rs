//! Mesh document used by the headless driver
//!
//! A JSON snapshot of one mesh object: its attributes, its mask layers and
//! the current edit mode. Pending confirmations are never persisted.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::actions::{EditMode, MeshObject};
use crate::error::{MaskLayerError, Result};
use crate::store::MemoryStore;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeshDocument {
    pub object: MeshObject<MemoryStore>,
    #[serde(default)]
    pub mode: EditMode,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

impl MeshDocument {
    /// New document holding an empty mesh with `vertex_count` vertices
    pub fn new(name: &str, vertex_count: usize) -> Self {
        let now = Utc::now();
        Self {
            object: MeshObject::new(name, MemoryStore::new(vertex_count)),
            mode: EditMode::Sculpt,
            created_at: now,
            modified_at: now,
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(MaskLayerError::DocumentNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Write the document, stamping the modification time
    pub fn save(&mut self, path: &Path) -> Result<()> {
        self.modified_at = Utc::now();
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::add_layer;
    use crate::config::MaskConfig;
    use crate::store::AttributeStore;
    use tempfile::tempdir;

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cube.json");
        let config = MaskConfig::default();

        let mut doc = MeshDocument::new("Cube", 8);
        add_layer(Some(&mut doc.object), &config);
        doc.save(&path).unwrap();

        let loaded = MeshDocument::load(&path).unwrap();
        assert_eq!(loaded.object.name, "Cube");
        assert_eq!(loaded.object.layers, doc.object.layers);
        assert_eq!(loaded.object.mesh.vertex_count(), 8);
        assert!(loaded.object.mesh.contains("mask__mask_1"));
        assert_eq!(loaded.mode, EditMode::Sculpt);
    }

    #[test]
    fn test_load_missing() {
        let result = MeshDocument::load(Path::new("/nonexistent/doc.json"));
        assert!(matches!(
            result,
            Err(MaskLayerError::DocumentNotFound { .. })
        ));
    }
}
