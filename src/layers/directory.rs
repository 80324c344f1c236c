//! Ordered layer list with an active cursor
//!
//! Every index taken from the outside is bounds-checked; a failed check
//! leaves the directory untouched.

use log::debug;
use serde::{Deserialize, Serialize};

use super::layer::MaskLayer;
use crate::config::MaskConfig;
use crate::engine::{CopyStatus, MaskEngine};
use crate::error::{MaskLayerError, Result};
use crate::naming;
use crate::store::AttributeStore;

/// Direction for [`LayerDirectory::move_layer`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    Up,
    Down,
}

/// The mask layers of one mesh object
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayerDirectory {
    layers: Vec<MaskLayer>,
    #[serde(default)]
    active_index: Option<usize>,
}

impl LayerDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn layers(&self) -> &[MaskLayer] {
        &self.layers
    }

    pub fn get(&self, index: usize) -> Option<&MaskLayer> {
        self.layers.get(index)
    }

    /// Selected index, `None` when nothing valid is selected
    pub fn active_index(&self) -> Option<usize> {
        self.active_index.filter(|&i| i < self.layers.len())
    }

    pub fn active_layer(&self) -> Option<&MaskLayer> {
        self.active_index().and_then(|i| self.layers.get(i))
    }

    /// Move the cursor to `index`
    pub fn select(&mut self, index: usize) -> Result<()> {
        self.check_index(index)?;
        self.active_index = Some(index);
        Ok(())
    }

    /// Clear the selection
    pub fn deselect(&mut self) {
        self.active_index = None;
    }

    /// Label for the next new layer: "Mask 1", "Mask 2", ...
    pub fn next_layer_name(&self, config: &MaskConfig) -> String {
        format!("{} {}", config.layer_label, self.layers.len() + 1)
    }

    /// Append a layer and select it. Storage is created on first resolve.
    pub fn add(&mut self, name: impl Into<String>) -> usize {
        self.layers.push(MaskLayer::new(name));
        let index = self.layers.len() - 1;
        self.active_index = Some(index);
        index
    }

    /// Remove a layer and delete its backing attribute from the store.
    ///
    /// The cursor stays on the same position, clamped to the new length.
    pub fn remove<S: AttributeStore + ?Sized>(
        &mut self,
        index: usize,
        store: &mut S,
    ) -> Result<MaskLayer> {
        self.check_index(index)?;

        let layer = self.layers.remove(index);
        self.active_index = if self.layers.is_empty() {
            None
        } else {
            Some(index.min(self.layers.len() - 1))
        };

        if let Some(attr) = layer.backing_attribute() {
            if store.remove(attr) {
                debug!("deleted backing attribute '{}'", attr);
            }
        }
        Ok(layer)
    }

    /// Swap a layer with its neighbour.
    ///
    /// Returns `Ok(false)` when the layer is already at that end of the list.
    /// The cursor follows the moved layer.
    pub fn move_layer(&mut self, index: usize, direction: MoveDirection) -> Result<bool> {
        self.check_index(index)?;

        let target = match direction {
            MoveDirection::Up if index > 0 => index - 1,
            MoveDirection::Down if index + 1 < self.layers.len() => index + 1,
            _ => return Ok(false),
        };

        self.layers.swap(index, target);
        self.active_index = Some(target);
        Ok(true)
    }

    /// Backing attribute of a layer, creating it on first use.
    ///
    /// Later calls return the recorded name, recreating the attribute if the
    /// host has deleted it in the meantime. A new name never matches one
    /// recorded by another layer, even if that attribute is currently gone.
    pub fn resolve<S: AttributeStore + ?Sized>(
        &mut self,
        index: usize,
        store: &mut S,
        config: &MaskConfig,
    ) -> Result<String> {
        self.check_index(index)?;
        let mut engine = MaskEngine::new(store, config);

        if let Some(attr) = self.layers[index].backing_attribute() {
            let attr = attr.to_string();
            engine.ensure_scalar_attribute(&attr)?;
            return Ok(attr);
        }

        let base = naming::backing_name(config, self.layers[index].display_name());
        let attr = engine.unique_name(&base, &self.reserved_names(index));
        engine.ensure_scalar_attribute(&attr)?;

        let layer = &mut self.layers[index];
        debug!("layer '{}' backed by '{}'", layer.display_name(), attr);
        layer.set_backing_attribute(attr.clone());
        Ok(attr)
    }

    /// Backing attribute of a layer if it is assigned and still in the store
    pub fn stored_attribute<S: AttributeStore + ?Sized>(
        &self,
        index: usize,
        store: &S,
    ) -> Result<String> {
        self.check_index(index)?;
        let layer = &self.layers[index];
        match layer.backing_attribute() {
            Some(attr) if store.contains(attr) => Ok(attr.to_string()),
            _ => Err(MaskLayerError::MissingBackingAttribute {
                layer: layer.display_name().to_string(),
            }),
        }
    }

    /// Change a layer's display name and follow it with the backing attribute.
    ///
    /// Returns the backing attribute name after the rename, or `None` if the
    /// layer has no storage yet.
    pub fn rename<S: AttributeStore + ?Sized>(
        &mut self,
        index: usize,
        new_name: &str,
        store: &mut S,
        config: &MaskConfig,
    ) -> Result<Option<String>> {
        self.check_index(index)?;

        let current = match self.layers[index].backing_attribute() {
            Some(attr) => attr.to_string(),
            None => {
                self.layers[index].set_display_name(new_name);
                return Ok(None);
            }
        };
        if !store.contains(&current) {
            return Err(MaskLayerError::MissingBackingAttribute {
                layer: self.layers[index].display_name().to_string(),
            });
        }

        let desired = naming::backing_name(config, new_name);
        let final_name = if desired == current {
            current
        } else {
            let reserved = self.reserved_names(index);
            MaskEngine::new(store, config).rename_attribute(&current, &desired, &reserved)?
        };

        let layer = &mut self.layers[index];
        layer.set_display_name(new_name);
        layer.set_backing_attribute(final_name.clone());
        Ok(Some(final_name))
    }

    /// Insert a copy of a layer right after it and select the copy.
    ///
    /// The source must have stored data. Values are copied with the
    /// best-effort rules, so a stale source still yields a usable copy.
    pub fn duplicate<S: AttributeStore + ?Sized>(
        &mut self,
        index: usize,
        store: &mut S,
        config: &MaskConfig,
    ) -> Result<(usize, CopyStatus)> {
        let source_attr = self.stored_attribute(index, &*store)?;
        let name = format!("{} copy", self.layers[index].display_name());

        let new_index = index + 1;
        self.layers.insert(new_index, MaskLayer::new(name));

        let result = self.resolve(new_index, store, config).and_then(|attr| {
            MaskEngine::new(&mut *store, config).copy_values(&source_attr, &attr, true)
        });
        match result {
            Ok(status) => {
                self.active_index = Some(new_index);
                Ok((new_index, status))
            }
            Err(e) => {
                let layer = self.layers.remove(new_index);
                if let Some(attr) = layer.backing_attribute() {
                    store.remove(attr);
                }
                Err(e)
            }
        }
    }

    /// Backing attributes recorded by every layer other than `index`
    fn reserved_names(&self, index: usize) -> Vec<&str> {
        self.layers
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != index)
            .filter_map(|(_, layer)| layer.backing_attribute())
            .collect()
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index < self.layers.len() {
            Ok(())
        } else {
            Err(MaskLayerError::InvalidLayerIndex {
                index,
                len: self.layers.len(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn directory_with(store: &mut MemoryStore, names: &[&str]) -> LayerDirectory {
        let config = MaskConfig::default();
        let mut dir = LayerDirectory::new();
        for name in names {
            let index = dir.add(*name);
            dir.resolve(index, store, &config).unwrap();
        }
        dir
    }

    #[test]
    fn test_add_selects_without_storage() {
        let mut dir = LayerDirectory::new();
        let index = dir.add("Mask 1");
        assert_eq!(index, 0);
        assert_eq!(dir.active_index(), Some(0));
        assert!(dir.layers()[0].backing_attribute().is_none());
    }

    #[test]
    fn test_next_layer_name() {
        let config = MaskConfig::default();
        let mut dir = LayerDirectory::new();
        assert_eq!(dir.next_layer_name(&config), "Mask 1");
        dir.add("x");
        assert_eq!(dir.next_layer_name(&config), "Mask 2");
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let config = MaskConfig::default();
        let mut store = MemoryStore::new(4);
        let mut dir = LayerDirectory::new();
        dir.add("My Mask");

        let first = dir.resolve(0, &mut store, &config).unwrap();
        let second = dir.resolve(0, &mut store, &config).unwrap();
        assert_eq!(first, "mask__my_mask");
        assert_eq!(first, second);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_resolve_avoids_collisions() {
        let mut store = MemoryStore::new(2);
        let dir = directory_with(&mut store, &["A", "a", "A"]);
        let names: Vec<_> = dir
            .layers()
            .iter()
            .map(|l| l.backing_attribute().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["mask__a", "mask__a_01", "mask__a_02"]);
    }

    #[test]
    fn test_resolve_skips_names_held_by_other_layers() {
        let config = MaskConfig::default();
        let mut store = MemoryStore::new(2);
        let mut dir = directory_with(&mut store, &["a"]);
        store.write_all("mask__a", &[0.9, 0.9]).unwrap();
        store.remove("mask__a");

        dir.add("a");
        let second = dir.resolve(1, &mut store, &config).unwrap();
        let first = dir.resolve(0, &mut store, &config).unwrap();
        assert_eq!(second, "mask__a_01");
        assert_eq!(first, "mask__a");

        store.write_all("mask__a_01", &[0.3, 0.3]).unwrap();
        assert_eq!(store.read_all("mask__a").unwrap(), vec![0.0, 0.0]);
    }

    #[test]
    fn test_remove_clamps_cursor_and_deletes_attribute() {
        let mut store = MemoryStore::new(2);
        let mut dir = directory_with(&mut store, &["A", "B", "C"]);
        dir.select(1).unwrap();

        let removed = dir.remove(1, &mut store).unwrap();
        assert_eq!(removed.display_name(), "B");
        assert_eq!(dir.len(), 2);
        assert_eq!(dir.active_index(), Some(1));
        assert!(!store.contains("mask__b"));

        dir.remove(1, &mut store).unwrap();
        assert_eq!(dir.active_index(), Some(0));
        dir.remove(0, &mut store).unwrap();
        assert_eq!(dir.active_index(), None);
    }

    #[test]
    fn test_remove_out_of_range_is_unchanged() {
        let mut store = MemoryStore::new(2);
        let mut dir = directory_with(&mut store, &["A"]);
        let result = dir.remove(3, &mut store);
        assert!(matches!(
            result,
            Err(MaskLayerError::InvalidLayerIndex { index: 3, len: 1 })
        ));
        assert_eq!(dir.len(), 1);
        assert!(store.contains("mask__a"));
    }

    #[test]
    fn test_move_layer() {
        let mut dir = LayerDirectory::new();
        dir.add("A");
        dir.add("B");
        dir.add("C");

        assert!(dir.move_layer(2, MoveDirection::Up).unwrap());
        assert_eq!(dir.active_index(), Some(1));
        assert_eq!(dir.layers()[1].display_name(), "C");

        assert!(!dir.move_layer(0, MoveDirection::Up).unwrap());
        assert!(!dir.move_layer(2, MoveDirection::Down).unwrap());
        assert!(dir.move_layer(9, MoveDirection::Down).is_err());
    }

    #[test]
    fn test_rename_without_storage_defers() {
        let config = MaskConfig::default();
        let mut store = MemoryStore::new(2);
        let mut dir = LayerDirectory::new();
        dir.add("A");

        let result = dir.rename(0, "Renamed", &mut store, &config).unwrap();
        assert!(result.is_none());
        assert_eq!(dir.layers()[0].display_name(), "Renamed");
        assert!(store.is_empty());
    }

    #[test]
    fn test_rename_round_trip_keeps_attribute() {
        let config = MaskConfig::default();
        let mut store = MemoryStore::new(2);
        let mut dir = directory_with(&mut store, &["foo"]);
        store.write_all("mask__foo", &[0.25, 0.75]).unwrap();

        let name = dir.rename(0, "  FOO ", &mut store, &config).unwrap();
        assert_eq!(name.as_deref(), Some("mask__foo"));
        assert_eq!(dir.layers()[0].display_name(), "  FOO ");
        assert_eq!(store.read_all("mask__foo").unwrap(), vec![0.25, 0.75]);
    }

    #[test]
    fn test_rename_moves_attribute() {
        let config = MaskConfig::default();
        let mut store = MemoryStore::new(1);
        let mut dir = directory_with(&mut store, &["left", "right"]);
        store.write_all("mask__left", &[0.5]).unwrap();

        let name = dir.rename(0, "Right", &mut store, &config).unwrap();
        assert_eq!(name.as_deref(), Some("mask__right_01"));
        assert!(!store.contains("mask__left"));
        assert_eq!(store.read_all("mask__right_01").unwrap(), vec![0.5]);
    }

    #[test]
    fn test_rename_skips_names_held_by_other_layers() {
        let config = MaskConfig::default();
        let mut store = MemoryStore::new(1);
        let mut dir = directory_with(&mut store, &["a", "b"]);
        store.remove("mask__a");

        let name = dir.rename(1, "A", &mut store, &config).unwrap();
        assert_eq!(name.as_deref(), Some("mask__a_01"));
        assert!(!store.contains("mask__a"));
        assert_eq!(dir.layers()[0].backing_attribute(), Some("mask__a"));
    }

    #[test]
    fn test_rename_missing_attribute_is_unchanged() {
        let config = MaskConfig::default();
        let mut store = MemoryStore::new(1);
        let mut dir = directory_with(&mut store, &["a"]);
        store.remove("mask__a");

        let result = dir.rename(0, "b", &mut store, &config);
        assert!(matches!(
            result,
            Err(MaskLayerError::MissingBackingAttribute { .. })
        ));
        assert_eq!(dir.layers()[0].display_name(), "a");
    }

    #[test]
    fn test_duplicate_copies_values() {
        let config = MaskConfig::default();
        let mut store = MemoryStore::new(2);
        let mut dir = directory_with(&mut store, &["Base", "Other"]);
        store.write_all("mask__base", &[0.1, 0.9]).unwrap();

        let (index, status) = dir.duplicate(0, &mut store, &config).unwrap();
        assert_eq!(index, 1);
        assert_eq!(status, CopyStatus::Exact);
        assert_eq!(dir.active_index(), Some(1));
        assert_eq!(dir.layers()[1].display_name(), "Base copy");
        assert_eq!(dir.layers()[2].display_name(), "Other");
        assert_eq!(store.read_all("mask__base_copy").unwrap(), vec![0.1, 0.9]);
    }

    #[test]
    fn test_duplicate_requires_stored_data() {
        let config = MaskConfig::default();
        let mut store = MemoryStore::new(2);
        let mut dir = LayerDirectory::new();
        dir.add("Empty");
        assert!(dir.duplicate(0, &mut store, &config).is_err());
        assert_eq!(dir.len(), 1);
    }
}
