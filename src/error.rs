//! Error handling for mask layers
//!
//! Every error is recoverable at the action boundary: actions turn them into
//! a failed outcome carrying the display text.

use std::path::PathBuf;

use thiserror::Error;

use crate::store::{DataType, Domain};

/// Result type alias for mask layer operations
pub type Result<T> = std::result::Result<T, MaskLayerError>;

/// Main error type for mask layer operations
#[derive(Error, Debug)]
pub enum MaskLayerError {
    // Context Errors
    #[error("Select a mesh object.")]
    NoActiveMeshObject,

    #[error("No layer selected.")]
    NoLayerSelected,

    #[error("Invalid layer index {index} (directory has {len} layers).")]
    InvalidLayerIndex { index: usize, len: usize },

    #[error("Switch to {required} mode.")]
    WrongMode { required: String },

    // Attribute Errors
    #[error("Attribute '{name}' exists but is {data_type}/{domain}, not FLOAT/POINT.")]
    AttributeTypeConflict {
        name: String,
        data_type: DataType,
        domain: Domain,
    },

    #[error("Attribute '{name}' not found.")]
    AttributeNotFound { name: String },

    #[error(
        "Vertex count mismatch: source has {source_len}, destination has {destination_len}, mesh has {vertex_count}."
    )]
    TopologyMismatch {
        source_len: usize,
        destination_len: usize,
        vertex_count: usize,
    },

    #[error("Layer '{layer}' has no stored attribute (it may have been deleted).")]
    MissingBackingAttribute { layer: String },

    // Configuration Errors
    #[error("Invalid configuration: {reason}")]
    Config { reason: String },

    // Document Errors
    #[error("Document not found: {path}")]
    DocumentNotFound { path: PathBuf },

    // I/O Errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization Errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl MaskLayerError {
    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            MaskLayerError::NoActiveMeshObject => "NO_ACTIVE_MESH_OBJECT",
            MaskLayerError::NoLayerSelected => "NO_LAYER_SELECTED",
            MaskLayerError::InvalidLayerIndex { .. } => "INVALID_LAYER_INDEX",
            MaskLayerError::WrongMode { .. } => "WRONG_MODE",
            MaskLayerError::AttributeTypeConflict { .. } => "ATTRIBUTE_TYPE_CONFLICT",
            MaskLayerError::AttributeNotFound { .. } => "ATTRIBUTE_NOT_FOUND",
            MaskLayerError::TopologyMismatch { .. } => "TOPOLOGY_MISMATCH",
            MaskLayerError::MissingBackingAttribute { .. } => "MISSING_BACKING_ATTRIBUTE",
            MaskLayerError::Config { .. } => "CONFIG_ERROR",
            MaskLayerError::DocumentNotFound { .. } => "DOCUMENT_NOT_FOUND",
            MaskLayerError::Io(_) => "IO_ERROR",
            MaskLayerError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// Check if the user can fix this error from the UI and retry
    pub fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            MaskLayerError::Io(_) | MaskLayerError::Serialization(_) | MaskLayerError::Config { .. }
        )
    }

    /// Returns a user-friendly recovery suggestion.
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self {
            MaskLayerError::NoActiveMeshObject => Some("Make a mesh object active and try again."),
            MaskLayerError::NoLayerSelected | MaskLayerError::InvalidLayerIndex { .. } => {
                Some("Select a layer in the mask layer list.")
            }
            MaskLayerError::WrongMode { .. } => Some("Enter Sculpt mode first."),
            MaskLayerError::AttributeTypeConflict { .. } => {
                Some("Rename or remove the conflicting attribute on the mesh.")
            }
            MaskLayerError::TopologyMismatch { .. } => {
                Some("The mesh changed since the layer was stored; assign it again.")
            }
            MaskLayerError::MissingBackingAttribute { .. } => {
                Some("Use Assign to store the current mask into this layer first.")
            }
            _ => None,
        }
    }
}
