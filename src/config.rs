//! Process-wide mask layer configuration
//!
//! Values are immutable once loaded and are passed explicitly to the
//! operations that need them.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{MaskLayerError, Result};

/// Namespace tag prepended to every backing attribute name
pub const DEFAULT_ATTRIBUTE_PREFIX: &str = "mask__";

/// Attribute the host keeps its live sculpt mask in
pub const DEFAULT_LIVE_MASK_NAME: &str = ".sculpt_mask";

/// Token used when a display name sanitizes to nothing
pub const DEFAULT_FALLBACK_TOKEN: &str = "mask";

/// Label stem for new layers ("Mask 1", "Mask 2", ...)
pub const DEFAULT_LAYER_LABEL: &str = "Mask";

/// Threshold above which a stored layer counts as holding real data.
pub const DEFAULT_EPS: f32 = 1e-6;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaskConfig {
    /// Prefix for backing attribute names
    pub attribute_prefix: String,
    /// Name of the live sculpt mask attribute
    pub live_mask_name: String,
    /// Fallback for names that sanitize to an empty string
    pub fallback_token: String,
    /// Stem used when naming new layers
    pub layer_label: String,
    /// "Meaningfully nonzero" threshold for the overwrite prompt
    pub eps: f32,
}

impl Default for MaskConfig {
    fn default() -> Self {
        Self {
            attribute_prefix: DEFAULT_ATTRIBUTE_PREFIX.to_string(),
            live_mask_name: DEFAULT_LIVE_MASK_NAME.to_string(),
            fallback_token: DEFAULT_FALLBACK_TOKEN.to_string(),
            layer_label: DEFAULT_LAYER_LABEL.to_string(),
            eps: DEFAULT_EPS,
        }
    }
}

impl MaskConfig {
    /// Load a configuration file (JSON). Missing keys take their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(MaskLayerError::Config {
                reason: format!("config file not found: {}", path.display()),
            });
        }
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parse and validate a JSON configuration string
    pub fn from_json(content: &str) -> Result<Self> {
        let config: MaskConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every value is usable
    pub fn validate(&self) -> Result<()> {
        if self.attribute_prefix.is_empty() {
            return Err(MaskLayerError::Config {
                reason: "attribute_prefix must not be empty".to_string(),
            });
        }
        if self.live_mask_name.is_empty() {
            return Err(MaskLayerError::Config {
                reason: "live_mask_name must not be empty".to_string(),
            });
        }
        if self.live_mask_name.starts_with(&self.attribute_prefix) {
            return Err(MaskLayerError::Config {
                reason: format!(
                    "live_mask_name '{}' would collide with the layer prefix '{}'",
                    self.live_mask_name, self.attribute_prefix
                ),
            });
        }
        if self.fallback_token.is_empty() {
            return Err(MaskLayerError::Config {
                reason: "fallback_token must not be empty".to_string(),
            });
        }
        if !self.eps.is_finite() || self.eps < 0.0 {
            return Err(MaskLayerError::Config {
                reason: format!("eps must be finite and non-negative, got {}", self.eps),
            });
        }
        Ok(())
    }
}
