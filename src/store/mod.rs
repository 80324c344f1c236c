//! Attribute Store Module
//!
//! The host owns mesh attributes; this module describes the capability the
//! mask layer core needs from it:
//! - name-keyed lookup, creation, removal and rename
//! - bulk read/write of scalar values
//! - the mesh's current vertex count

mod memory;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Result;

pub use memory::MemoryStore;

/// Element type of an attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataType {
    Float,
    Int,
    Bool,
    Vector,
    Color,
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataType::Float => write!(f, "FLOAT"),
            DataType::Int => write!(f, "INT"),
            DataType::Bool => write!(f, "BOOLEAN"),
            DataType::Vector => write!(f, "FLOAT_VECTOR"),
            DataType::Color => write!(f, "FLOAT_COLOR"),
        }
    }
}

/// Mesh element an attribute is stored on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    Point,
    Edge,
    Face,
    Corner,
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Domain::Point => write!(f, "POINT"),
            Domain::Edge => write!(f, "EDGE"),
            Domain::Face => write!(f, "FACE"),
            Domain::Corner => write!(f, "CORNER"),
        }
    }
}

/// Snapshot of an attribute's metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeInfo {
    pub name: String,
    pub data_type: DataType,
    pub domain: Domain,
    /// Number of stored elements
    pub len: usize,
}

impl AttributeInfo {
    /// True for per-vertex float attributes, the only kind masks live in
    pub fn is_scalar_point(&self) -> bool {
        self.data_type == DataType::Float && self.domain == Domain::Point
    }
}

/// Result of asking the store to rename an attribute in place
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenameOutcome {
    /// The attribute now lives under the new name
    Renamed,
    /// The store cannot rename this attribute; nothing changed
    Unsupported,
}

/// Per-mesh attribute storage provided by the host
///
/// Values are exchanged as `f32` slices; `read_all` returns every element of
/// the attribute and `write_all` expects exactly that many.
pub trait AttributeStore {
    /// Current vertex count of the mesh
    fn vertex_count(&self) -> usize;

    /// Look up an attribute by name
    fn get(&self, name: &str) -> Option<AttributeInfo>;

    /// Names of every attribute on the mesh
    fn names(&self) -> Vec<String>;

    /// Create a zero-initialized attribute
    fn create(&mut self, name: &str, data_type: DataType, domain: Domain)
        -> Result<AttributeInfo>;

    /// Remove an attribute. Returns false if it did not exist.
    fn remove(&mut self, name: &str) -> bool;

    /// Rename in place, reporting whether the store supports it
    fn rename(&mut self, old_name: &str, new_name: &str) -> Result<RenameOutcome>;

    /// Read every element of a scalar attribute
    fn read_all(&self, name: &str) -> Result<Vec<f32>>;

    /// Overwrite every element of a scalar attribute
    fn write_all(&mut self, name: &str, values: &[f32]) -> Result<()>;

    /// Whether an attribute of any type exists under `name`
    fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }
}
