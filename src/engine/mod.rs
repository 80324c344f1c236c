//! Mask Store Engine
//!
//! Array-level mask work:
//! - Copy with topology-mismatch tolerance
//! - Replace/add/subtract blending and inversion
//! - Attribute creation and rename with copy fallback

mod attributes;
pub mod values;

pub use attributes::MaskEngine;
pub use values::{BlendMode, CopyStatus};
