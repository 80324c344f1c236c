//! Layer Directory Module
//!
//! Named mask layers of a mesh object and how they map to backing
//! attributes in the mesh's attribute store.

mod directory;
mod layer;

pub use directory::{LayerDirectory, MoveDirection};
pub use layer::MaskLayer;
