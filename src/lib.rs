//! Mask Layers - named snapshots of a per-vertex sculpt mask
//!
//! Each layer stores one snapshot as a per-vertex float attribute on the
//! mesh, so it is saved with the host document.
//!
//! # Architecture
//!
//! - `store`: the host's attribute store, as a trait, plus an in-memory store
//! - `layers`: ordered layer directory mapping display names to attributes
//! - `engine`: copy, blend, invert and rename over store attributes
//! - `actions`: user-facing actions, including the assign confirmation flow
//! - `cli`: headless driver working on JSON mesh documents

pub mod actions;
pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod layers;
pub mod naming;
pub mod store;

pub use actions::{ActionOutcome, ActionStatus, AssignSession, EditMode, MeshObject};
pub use config::MaskConfig;
pub use engine::{BlendMode, CopyStatus, MaskEngine};
pub use error::{MaskLayerError, Result};
pub use layers::{LayerDirectory, MaskLayer, MoveDirection};
pub use store::{AttributeStore, MemoryStore};
