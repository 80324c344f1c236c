//! Scalar mask value operations
//!
//! Pure slice-level copy, blend and invert rules. The store-facing engine
//! reads attributes into buffers, runs these, and writes the result back.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{MaskLayerError, Result};

/// Whether a copy or blend saw matching lengths
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CopyStatus {
    /// Source, destination and vertex count all agreed
    Exact,
    /// Lengths disagreed; only the overlap was transferred
    Mismatch,
}

impl CopyStatus {
    pub fn is_mismatch(self) -> bool {
        self == CopyStatus::Mismatch
    }
}

/// How a stored layer combines with the live mask
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlendMode {
    #[default]
    Replace,
    Add,
    Subtract,
}

impl fmt::Display for BlendMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlendMode::Replace => write!(f, "replace"),
            BlendMode::Add => write!(f, "add"),
            BlendMode::Subtract => write!(f, "subtract"),
        }
    }
}

impl FromStr for BlendMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "replace" | "set" => Ok(BlendMode::Replace),
            "add" => Ok(BlendMode::Add),
            "subtract" | "sub" => Ok(BlendMode::Subtract),
            other => Err(format!("unknown blend mode '{}'", other)),
        }
    }
}

/// Copy `source` into `destination` for a mesh with `vertex_count` vertices.
///
/// With matching lengths this is a straight copy. Otherwise, if
/// `allow_mismatch` is set, the overlap is copied positionally and every
/// destination element past it is zeroed; without it nothing is written.
pub fn copy_values(
    source: &[f32],
    destination: &mut [f32],
    vertex_count: usize,
    allow_mismatch: bool,
) -> Result<CopyStatus> {
    if source.len() == vertex_count && destination.len() == vertex_count {
        destination.copy_from_slice(source);
        return Ok(CopyStatus::Exact);
    }

    if !allow_mismatch {
        return Err(MaskLayerError::TopologyMismatch {
            source_len: source.len(),
            destination_len: destination.len(),
            vertex_count,
        });
    }

    let n = source.len().min(destination.len()).min(vertex_count);
    destination[..n].copy_from_slice(&source[..n]);
    destination[n..].fill(0.0);
    Ok(CopyStatus::Mismatch)
}

/// Combine `source` into `destination` over the first `n` shared elements.
///
/// Add and subtract clamp to `[0, 1]`. Elements past the overlap are left
/// as they were.
pub fn blend(destination: &mut [f32], source: &[f32], n: usize, mode: BlendMode) -> CopyStatus {
    let overlap = source.len().min(destination.len()).min(n);

    for (d, &s) in destination[..overlap].iter_mut().zip(&source[..overlap]) {
        *d = match mode {
            BlendMode::Replace => s,
            BlendMode::Add => (*d + s).clamp(0.0, 1.0),
            BlendMode::Subtract => (*d - s).clamp(0.0, 1.0),
        };
    }

    if source.len() == n && destination.len() == n {
        CopyStatus::Exact
    } else {
        CopyStatus::Mismatch
    }
}

/// `v -> clamp(1 - v, 0, 1)` for every element
pub fn invert(values: &mut [f32]) {
    for v in values.iter_mut() {
        *v = (1.0 - *v).clamp(0.0, 1.0);
    }
}

/// Largest absolute value, `0.0` for an empty slice
pub fn max_absolute(values: &[f32]) -> f32 {
    values.iter().map(|v| v.abs()).fold(0.0f32, f32::max)
}

/// Exact element-wise equality; no tolerance.
pub fn values_equal(a: &[f32], b: &[f32]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x == y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_copy_exact() {
        let source = [0.1, 0.2, 0.3, 0.4, 0.5];
        let mut destination = [0.0; 5];
        let status = copy_values(&source, &mut destination, 5, false).unwrap();
        assert_eq!(status, CopyStatus::Exact);
        assert_eq!(destination, source);
    }

    #[test]
    fn test_copy_mismatch_zero_fills_tail() {
        let source = [0.1, 0.2, 0.3];
        let mut destination = [0.9; 5];
        let status = copy_values(&source, &mut destination, 5, true).unwrap();
        assert_eq!(status, CopyStatus::Mismatch);
        assert_eq!(destination, [0.1, 0.2, 0.3, 0.0, 0.0]);
    }

    #[test]
    fn test_copy_mismatch_limited_by_vertex_count() {
        let source = [0.1, 0.2, 0.3, 0.4];
        let mut destination = [0.9; 4];
        let status = copy_values(&source, &mut destination, 2, true).unwrap();
        assert!(status.is_mismatch());
        assert_eq!(destination, [0.1, 0.2, 0.0, 0.0]);
    }

    #[test]
    fn test_copy_mismatch_disallowed() {
        let source = [0.1, 0.2, 0.3];
        let mut destination = [0.9; 5];
        let result = copy_values(&source, &mut destination, 5, false);
        assert!(matches!(
            result,
            Err(MaskLayerError::TopologyMismatch {
                source_len: 3,
                destination_len: 5,
                vertex_count: 5
            })
        ));
        assert_eq!(destination, [0.9; 5]);
    }

    #[test]
    fn test_blend_add_clamps() {
        let mut destination = [0.5, 0.9];
        blend(&mut destination, &[0.6, 0.6], 2, BlendMode::Add);
        assert_eq!(destination, [1.0, 1.0]);
    }

    #[test]
    fn test_blend_subtract_clamps() {
        let mut destination = [0.2, 0.9];
        blend(&mut destination, &[0.5, 0.1], 2, BlendMode::Subtract);
        assert_eq!(destination[0], 0.0);
        assert_relative_eq!(destination[1], 0.8, epsilon = 1e-6);
    }

    #[test]
    fn test_blend_leaves_tail_untouched() {
        let mut destination = [0.0, 0.0, 0.7, 0.7];
        let status = blend(&mut destination, &[1.0, 1.0], 4, BlendMode::Replace);
        assert_eq!(status, CopyStatus::Mismatch);
        assert_eq!(destination, [1.0, 1.0, 0.7, 0.7]);
    }

    #[test]
    fn test_invert() {
        let mut values = [0.0, 0.3, 1.0];
        invert(&mut values);
        assert_relative_eq!(values[0], 1.0);
        assert_relative_eq!(values[1], 0.7, epsilon = 1e-6);
        assert_relative_eq!(values[2], 0.0);
    }

    #[test]
    fn test_invert_clamps_out_of_range() {
        let mut values = [-0.5, 1.5];
        invert(&mut values);
        assert_eq!(values, [1.0, 0.0]);
    }

    #[test]
    fn test_max_absolute() {
        assert_eq!(max_absolute(&[]), 0.0);
        assert_eq!(max_absolute(&[0.2, -0.7, 0.5]), 0.7);
    }

    #[test]
    fn test_values_equal_is_exact() {
        assert!(values_equal(&[0.1, 0.2], &[0.1, 0.2]));
        assert!(!values_equal(&[0.1, 0.2], &[0.1, 0.2 + 1e-7]));
        assert!(!values_equal(&[0.1], &[0.1, 0.2]));
    }

    #[test]
    fn test_blend_mode_parse() {
        assert_eq!("add".parse::<BlendMode>().unwrap(), BlendMode::Add);
        assert_eq!("SUB".parse::<BlendMode>().unwrap(), BlendMode::Subtract);
        assert!("multiply".parse::<BlendMode>().is_err());
    }
}
