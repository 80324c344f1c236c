//! Store-facing mask engine
//!
//! Resolves attributes in an [`AttributeStore`] and applies the value rules
//! from [`super::values`]. The vertex count is read from the store at the
//! start of each operation.

use log::{debug, warn};

use super::values::{self, BlendMode, CopyStatus};
use crate::config::MaskConfig;
use crate::error::{MaskLayerError, Result};
use crate::naming;
use crate::store::{AttributeInfo, AttributeStore, DataType, Domain, RenameOutcome};

/// Mask operations over one mesh's attribute store
pub struct MaskEngine<'a, S: AttributeStore + ?Sized> {
    store: &'a mut S,
    config: &'a MaskConfig,
}

impl<'a, S: AttributeStore + ?Sized> MaskEngine<'a, S> {
    pub fn new(store: &'a mut S, config: &'a MaskConfig) -> Self {
        Self { store, config }
    }

    /// Vertex count of the mesh right now
    pub fn vertex_count(&self) -> usize {
        self.store.vertex_count()
    }

    /// Get a per-vertex float attribute, creating it if absent.
    ///
    /// # Errors
    /// `AttributeTypeConflict` if `name` holds some other kind of attribute.
    pub fn ensure_scalar_attribute(&mut self, name: &str) -> Result<AttributeInfo> {
        match self.store.get(name) {
            Some(info) if info.is_scalar_point() => Ok(info),
            Some(info) => Err(MaskLayerError::AttributeTypeConflict {
                name: name.to_string(),
                data_type: info.data_type,
                domain: info.domain,
            }),
            None => self.store.create(name, DataType::Float, Domain::Point),
        }
    }

    /// Get the live sculpt mask, creating it zero-filled if absent
    pub fn ensure_live_mask(&mut self) -> Result<AttributeInfo> {
        let name = self.config.live_mask_name.clone();
        if let Some(info) = self.store.get(&name) {
            return self.check_scalar(info);
        }

        let info = self.ensure_scalar_attribute(&name)?;
        // Hosts do not always initialize new attributes.
        self.store.write_all(&name, &vec![0.0; info.len])?;
        debug!("created live mask '{}' with {} zeros", name, info.len);
        Ok(info)
    }

    /// Copy one attribute's values into another
    pub fn copy_values(
        &mut self,
        source: &str,
        destination: &str,
        allow_mismatch: bool,
    ) -> Result<CopyStatus> {
        let vertex_count = self.store.vertex_count();
        let src = self.store.read_all(source)?;
        let mut dst = self.store.read_all(destination)?;

        let status = values::copy_values(&src, &mut dst, vertex_count, allow_mismatch)?;
        self.store.write_all(destination, &dst)?;

        if status.is_mismatch() {
            warn!(
                "best-effort copy '{}' -> '{}': {} source, {} destination, {} vertices",
                source,
                destination,
                src.len(),
                dst.len(),
                vertex_count
            );
        }
        Ok(status)
    }

    /// Blend `source` into `destination` over the overlapping range
    pub fn blend(&mut self, destination: &str, source: &str, mode: BlendMode) -> Result<CopyStatus> {
        let vertex_count = self.store.vertex_count();
        let src = self.store.read_all(source)?;
        let mut dst = self.store.read_all(destination)?;

        let status = values::blend(&mut dst, &src, vertex_count, mode);
        self.store.write_all(destination, &dst)?;

        if status.is_mismatch() {
            warn!(
                "partial {} blend '{}' -> '{}': {} source, {} destination, {} vertices",
                mode,
                source,
                destination,
                src.len(),
                dst.len(),
                vertex_count
            );
        }
        Ok(status)
    }

    /// Invert an attribute in place. Returns the number of elements touched.
    pub fn invert(&mut self, name: &str) -> Result<usize> {
        let mut buf = self.store.read_all(name)?;
        if buf.is_empty() {
            return Ok(0);
        }
        values::invert(&mut buf);
        self.store.write_all(name, &buf)?;
        Ok(buf.len())
    }

    /// Zero every element of an attribute
    pub fn clear(&mut self, name: &str) -> Result<usize> {
        let len = self.store.read_all(name)?.len();
        self.store.write_all(name, &vec![0.0; len])?;
        Ok(len)
    }

    pub fn max_absolute(&self, name: &str) -> Result<f32> {
        Ok(values::max_absolute(&self.store.read_all(name)?))
    }

    pub fn values_equal(&self, a: &str, b: &str) -> Result<bool> {
        Ok(values::values_equal(
            &self.store.read_all(a)?,
            &self.store.read_all(b)?,
        ))
    }

    /// First attribute name derived from `base` that is neither in the store
    /// nor in `reserved`
    pub fn unique_name(&self, base: &str, reserved: &[&str]) -> String {
        let names = self.store.names();
        let taken = names
            .iter()
            .map(String::as_str)
            .chain(reserved.iter().copied());
        naming::unique_name(taken, base)
    }

    /// Rename an attribute, returning the name it ended up with.
    ///
    /// A collision with another attribute, or with a name in `reserved`, gets
    /// a numeric suffix. If the store cannot rename in place, the values move
    /// to a freshly created attribute and the old one is removed.
    ///
    /// # Errors
    /// `AttributeNotFound` if `old_name` is not in the store.
    pub fn rename_attribute(
        &mut self,
        old_name: &str,
        new_name: &str,
        reserved: &[&str],
    ) -> Result<String> {
        if !self.store.contains(old_name) {
            return Err(MaskLayerError::AttributeNotFound {
                name: old_name.to_string(),
            });
        }
        if old_name == new_name {
            return Ok(old_name.to_string());
        }

        let names = self.store.names();
        let taken: Vec<&str> = names
            .iter()
            .map(String::as_str)
            .chain(reserved.iter().copied())
            .filter(|n| *n != old_name)
            .collect();
        let final_name = if taken.contains(&new_name) {
            naming::unique_name(taken.iter().copied(), new_name)
        } else {
            new_name.to_string()
        };
        if final_name == old_name {
            return Ok(final_name);
        }

        match self.store.rename(old_name, &final_name)? {
            RenameOutcome::Renamed => {}
            RenameOutcome::Unsupported => {
                debug!(
                    "in-place rename '{}' -> '{}' unsupported, copying",
                    old_name, final_name
                );
                let buf = self.store.read_all(old_name)?;
                let info = self.ensure_scalar_attribute(&final_name)?;
                if info.len != buf.len() {
                    // Keep the old attribute rather than lose its data.
                    self.store.remove(&final_name);
                    return Err(MaskLayerError::TopologyMismatch {
                        source_len: buf.len(),
                        destination_len: info.len,
                        vertex_count: self.store.vertex_count(),
                    });
                }
                self.store.write_all(&final_name, &buf)?;
                self.store.remove(old_name);
            }
        }

        Ok(final_name)
    }

    fn check_scalar(&self, info: AttributeInfo) -> Result<AttributeInfo> {
        if info.is_scalar_point() {
            Ok(info)
        } else {
            Err(MaskLayerError::AttributeTypeConflict {
                name: info.name,
                data_type: info.data_type,
                domain: info.domain,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn test_ensure_scalar_creates_zeroed() {
        let config = MaskConfig::default();
        let mut store = MemoryStore::new(3);
        let mut engine = MaskEngine::new(&mut store, &config);
        let info = engine.ensure_scalar_attribute("mask__a").unwrap();
        assert_eq!(info.len, 3);
        assert_eq!(store.read_all("mask__a").unwrap(), vec![0.0; 3]);
    }

    #[test]
    fn test_ensure_scalar_type_conflict() {
        let config = MaskConfig::default();
        let mut store = MemoryStore::new(3);
        store.create("mask__a", DataType::Int, Domain::Point).unwrap();
        let mut engine = MaskEngine::new(&mut store, &config);
        let result = engine.ensure_scalar_attribute("mask__a");
        assert!(matches!(
            result,
            Err(MaskLayerError::AttributeTypeConflict { .. })
        ));
    }

    #[test]
    fn test_ensure_live_mask_keeps_existing_values() {
        let config = MaskConfig::default();
        let mut store = MemoryStore::new(2).with_values(".sculpt_mask", vec![0.3, 0.6]);
        MaskEngine::new(&mut store, &config).ensure_live_mask().unwrap();
        assert_eq!(store.read_all(".sculpt_mask").unwrap(), vec![0.3, 0.6]);
    }

    #[test]
    fn test_ensure_live_mask_rejects_wrong_domain() {
        let config = MaskConfig::default();
        let mut store = MemoryStore::new(2);
        store.create(".sculpt_mask", DataType::Float, Domain::Face).unwrap();
        let result = MaskEngine::new(&mut store, &config).ensure_live_mask();
        assert!(result.is_err());
    }

    #[test]
    fn test_copy_values_between_attributes() {
        let config = MaskConfig::default();
        let mut store = MemoryStore::new(5)
            .with_values("src", vec![0.1, 0.2, 0.3])
            .with_values("dst", vec![1.0; 5]);
        let status = MaskEngine::new(&mut store, &config)
            .copy_values("src", "dst", true)
            .unwrap();
        assert_eq!(status, CopyStatus::Mismatch);
        assert_eq!(
            store.read_all("dst").unwrap(),
            vec![0.1, 0.2, 0.3, 0.0, 0.0]
        );
    }

    #[test]
    fn test_rename_attribute_in_place() {
        let config = MaskConfig::default();
        let mut store = MemoryStore::new(2).with_values("mask__a", vec![0.4, 0.5]);
        let name = MaskEngine::new(&mut store, &config)
            .rename_attribute("mask__a", "mask__b", &[])
            .unwrap();
        assert_eq!(name, "mask__b");
        assert_eq!(store.read_all("mask__b").unwrap(), vec![0.4, 0.5]);
    }

    #[test]
    fn test_rename_attribute_collision_gets_suffix() {
        let config = MaskConfig::default();
        let mut store = MemoryStore::new(1)
            .with_values("mask__a", vec![0.4])
            .with_values("mask__b", vec![0.9]);
        let name = MaskEngine::new(&mut store, &config)
            .rename_attribute("mask__a", "mask__b", &[])
            .unwrap();
        assert_eq!(name, "mask__b_01");
        assert_eq!(store.read_all("mask__b").unwrap(), vec![0.9]);
        assert_eq!(store.read_all("mask__b_01").unwrap(), vec![0.4]);
    }

    #[test]
    fn test_rename_attribute_avoids_reserved_names() {
        let config = MaskConfig::default();
        let mut store = MemoryStore::new(1).with_values("mask__a", vec![0.4]);
        let name = MaskEngine::new(&mut store, &config)
            .rename_attribute("mask__a", "mask__b", &["mask__b"])
            .unwrap();
        assert_eq!(name, "mask__b_01");
        assert!(!store.contains("mask__b"));
    }

    #[test]
    fn test_unique_name_skips_reserved() {
        let config = MaskConfig::default();
        let mut store = MemoryStore::new(1).with_values("mask__a", vec![0.0]);
        let engine = MaskEngine::new(&mut store, &config);
        assert_eq!(engine.unique_name("mask__a", &[]), "mask__a_01");
        assert_eq!(engine.unique_name("mask__b", &["mask__b"]), "mask__b_01");
        assert_eq!(
            engine.unique_name("mask__a", &["mask__a_01"]),
            "mask__a_02"
        );
    }

    #[test]
    fn test_rename_attribute_keeps_own_suffix() {
        let config = MaskConfig::default();
        let mut store = MemoryStore::new(1)
            .with_values("mask__foo", vec![0.1])
            .with_values("mask__foo_01", vec![0.2]);
        let name = MaskEngine::new(&mut store, &config)
            .rename_attribute("mask__foo_01", "mask__foo", &[])
            .unwrap();
        assert_eq!(name, "mask__foo_01");
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_rename_attribute_fallback_copy() {
        let config = MaskConfig::default();
        let mut store = MemoryStore::new(2)
            .with_values("mask__a", vec![0.4, 0.5])
            .with_rename_supported(false);
        let name = MaskEngine::new(&mut store, &config)
            .rename_attribute("mask__a", "mask__c", &[])
            .unwrap();
        assert_eq!(name, "mask__c");
        assert!(!store.contains("mask__a"));
        assert_eq!(store.read_all("mask__c").unwrap(), vec![0.4, 0.5]);
    }

    #[test]
    fn test_rename_attribute_missing() {
        let config = MaskConfig::default();
        let mut store = MemoryStore::new(2);
        let result =
            MaskEngine::new(&mut store, &config).rename_attribute("mask__x", "mask__y", &[]);
        assert!(matches!(
            result,
            Err(MaskLayerError::AttributeNotFound { .. })
        ));
    }
}
