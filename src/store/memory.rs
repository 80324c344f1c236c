//! In-memory attribute store
//!
//! Stands in for the host mesh in tests and in the headless driver.

use log::debug;
use serde::{Deserialize, Serialize};

use super::{AttributeInfo, AttributeStore, DataType, Domain, RenameOutcome};
use crate::error::{MaskLayerError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct StoredAttribute {
    name: String,
    data_type: DataType,
    domain: Domain,
    values: Vec<f32>,
}

impl StoredAttribute {
    fn info(&self) -> AttributeInfo {
        AttributeInfo {
            name: self.name.clone(),
            data_type: self.data_type,
            domain: self.domain,
            len: self.values.len(),
        }
    }
}

fn default_rename_supported() -> bool {
    true
}

/// Attribute store backed by plain vectors, in creation order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryStore {
    vertex_count: usize,
    attributes: Vec<StoredAttribute>,
    /// When false, `rename` reports `Unsupported` like a host that refuses
    /// to rename certain attributes.
    #[serde(default = "default_rename_supported")]
    rename_supported: bool,
}

impl MemoryStore {
    /// Create an empty mesh with the given vertex count
    pub fn new(vertex_count: usize) -> Self {
        Self {
            vertex_count,
            attributes: Vec::new(),
            rename_supported: true,
        }
    }

    /// Builder: add a float point attribute with explicit contents.
    ///
    /// The contents may differ in length from the vertex count, which is how
    /// stale snapshots from an older topology look.
    pub fn with_values(mut self, name: &str, values: Vec<f32>) -> Self {
        self.insert_values(name, values);
        self
    }

    /// Builder: toggle in-place rename support
    pub fn with_rename_supported(mut self, supported: bool) -> Self {
        self.rename_supported = supported;
        self
    }

    /// Insert or replace a float point attribute with explicit contents
    pub fn insert_values(&mut self, name: &str, values: Vec<f32>) {
        self.attributes.retain(|a| a.name != name);
        self.attributes.push(StoredAttribute {
            name: name.to_string(),
            data_type: DataType::Float,
            domain: Domain::Point,
            values,
        });
    }

    /// Change the vertex count without touching stored attributes
    pub fn set_vertex_count(&mut self, vertex_count: usize) {
        debug!(
            "vertex count {} -> {} ({} attributes keep their length)",
            self.vertex_count,
            vertex_count,
            self.attributes.len()
        );
        self.vertex_count = vertex_count;
    }

    /// Number of attributes on the mesh
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    fn find(&self, name: &str) -> Option<&StoredAttribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    fn find_mut(&mut self, name: &str) -> Option<&mut StoredAttribute> {
        self.attributes.iter_mut().find(|a| a.name == name)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(0)
    }
}

impl AttributeStore for MemoryStore {
    fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    fn get(&self, name: &str) -> Option<AttributeInfo> {
        self.find(name).map(StoredAttribute::info)
    }

    fn names(&self) -> Vec<String> {
        self.attributes.iter().map(|a| a.name.clone()).collect()
    }

    fn create(
        &mut self,
        name: &str,
        data_type: DataType,
        domain: Domain,
    ) -> Result<AttributeInfo> {
        if let Some(existing) = self.find(name) {
            return Err(MaskLayerError::AttributeTypeConflict {
                name: name.to_string(),
                data_type: existing.data_type,
                domain: existing.domain,
            });
        }

        let attribute = StoredAttribute {
            name: name.to_string(),
            data_type,
            domain,
            values: vec![0.0; self.vertex_count],
        };
        let info = attribute.info();
        self.attributes.push(attribute);
        debug!("created attribute '{}' ({}/{})", name, data_type, domain);
        Ok(info)
    }

    fn remove(&mut self, name: &str) -> bool {
        let before = self.attributes.len();
        self.attributes.retain(|a| a.name != name);
        let removed = self.attributes.len() != before;
        if removed {
            debug!("removed attribute '{}'", name);
        }
        removed
    }

    fn rename(&mut self, old_name: &str, new_name: &str) -> Result<RenameOutcome> {
        if !self.rename_supported || self.find(new_name).is_some() {
            return Ok(RenameOutcome::Unsupported);
        }
        let attribute = self
            .find_mut(old_name)
            .ok_or_else(|| MaskLayerError::AttributeNotFound {
                name: old_name.to_string(),
            })?;
        attribute.name = new_name.to_string();
        debug!("renamed attribute '{}' -> '{}'", old_name, new_name);
        Ok(RenameOutcome::Renamed)
    }

    fn read_all(&self, name: &str) -> Result<Vec<f32>> {
        self.find(name)
            .map(|a| a.values.clone())
            .ok_or_else(|| MaskLayerError::AttributeNotFound {
                name: name.to_string(),
            })
    }

    fn write_all(&mut self, name: &str, values: &[f32]) -> Result<()> {
        let vertex_count = self.vertex_count;
        let attribute = self
            .find_mut(name)
            .ok_or_else(|| MaskLayerError::AttributeNotFound {
                name: name.to_string(),
            })?;
        if attribute.values.len() != values.len() {
            return Err(MaskLayerError::TopologyMismatch {
                source_len: values.len(),
                destination_len: attribute.values.len(),
                vertex_count,
            });
        }
        attribute.values.copy_from_slice(values);
        Ok(())
    }
}
