//! A single saved mask slot

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One named mask snapshot.
///
/// The backing attribute is assigned lazily the first time the layer is
/// resolved and then follows the layer for its whole lifetime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaskLayer {
    id: Uuid,
    display_name: String,
    #[serde(default)]
    backing_attribute: Option<String>,
}

impl MaskLayer {
    /// Create a layer with no storage yet
    pub fn new(display_name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            display_name: display_name.into(),
            backing_attribute: None,
        }
    }

    /// Stable identity, unaffected by reordering or renaming
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Name of the attribute holding this layer's values, if assigned
    pub fn backing_attribute(&self) -> Option<&str> {
        self.backing_attribute.as_deref()
    }

    pub(crate) fn set_display_name(&mut self, name: impl Into<String>) {
        self.display_name = name.into();
    }

    pub(crate) fn set_backing_attribute(&mut self, name: String) {
        self.backing_attribute = Some(name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_layer_has_no_storage() {
        let layer = MaskLayer::new("Mask 1");
        assert_eq!(layer.display_name(), "Mask 1");
        assert!(layer.backing_attribute().is_none());
    }

    #[test]
    fn test_ids_are_unique() {
        assert_ne!(MaskLayer::new("a").id(), MaskLayer::new("a").id());
    }
}
