//! CLI Module
//!
//! Headless driver: runs one mask layer action against a JSON mesh
//! document, standing in for the host application.

pub mod commands;
pub mod document;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::actions::EditMode;
use crate::engine::BlendMode;
use crate::layers::MoveDirection;

pub use document::MeshDocument;

/// Sculpt mask layers - store and restore per-vertex mask snapshots
#[derive(Parser, Debug)]
#[command(name = "mask-layers")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file (JSON)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a new mesh document
    #[command(name = "init")]
    Init {
        /// Path for the new document
        path: PathBuf,

        /// Number of vertices in the mesh
        #[arg(short = 'n', long)]
        vertices: usize,

        /// Object name
        #[arg(long, default_value = "Mesh")]
        name: String,
    },

    /// List layers and attributes
    #[command(name = "list")]
    List {
        /// Path to the document
        path: PathBuf,
    },

    /// Add a new empty layer
    #[command(name = "add")]
    Add {
        /// Path to the document
        path: PathBuf,
    },

    /// Remove the selected layer
    #[command(name = "remove")]
    Remove {
        /// Path to the document
        path: PathBuf,
    },

    /// Select a layer
    #[command(name = "select")]
    Select {
        /// Path to the document
        path: PathBuf,

        /// Layer index
        index: usize,
    },

    /// Move the selected layer
    #[command(name = "move")]
    Move {
        /// Path to the document
        path: PathBuf,

        /// Direction to move in
        #[arg(value_enum)]
        direction: DirectionArg,
    },

    /// Rename a layer
    #[command(name = "rename")]
    Rename {
        /// Path to the document
        path: PathBuf,

        /// Layer index
        index: usize,

        /// New display name
        name: String,
    },

    /// Store the current mask into the selected layer
    #[command(name = "assign")]
    Assign {
        /// Path to the document
        path: PathBuf,

        /// Overwrite existing layer data without asking
        #[arg(short, long)]
        yes: bool,
    },

    /// Apply a layer to the current mask
    #[command(name = "apply")]
    Apply {
        /// Path to the document
        path: PathBuf,

        /// Layer index
        index: usize,

        /// Blend mode
        #[arg(short, long, value_enum, default_value_t = BlendArg::Replace)]
        mode: BlendArg,
    },

    /// Restore the selected layer into the current mask
    #[command(name = "set")]
    Set {
        /// Path to the document
        path: PathBuf,
    },

    /// Invert the current mask
    #[command(name = "invert")]
    Invert {
        /// Path to the document
        path: PathBuf,
    },

    /// Clear the current mask
    #[command(name = "clear")]
    Clear {
        /// Path to the document
        path: PathBuf,
    },

    /// Create a new layer from the current mask
    #[command(name = "new-from-mask")]
    NewFromMask {
        /// Path to the document
        path: PathBuf,
    },

    /// Duplicate the selected layer
    #[command(name = "duplicate")]
    Duplicate {
        /// Path to the document
        path: PathBuf,
    },

    /// Write values into the current mask
    #[command(name = "set-mask")]
    SetMask {
        /// Path to the document
        path: PathBuf,

        /// One value per vertex
        #[arg(required = true, num_args = 1..)]
        values: Vec<f32>,
    },

    /// Change the mesh vertex count, leaving stored attributes as they are
    #[command(name = "resize")]
    Resize {
        /// Path to the document
        path: PathBuf,

        /// New vertex count
        vertices: usize,
    },

    /// Switch the edit mode
    #[command(name = "mode")]
    Mode {
        /// Path to the document
        path: PathBuf,

        #[arg(value_enum)]
        mode: ModeArg,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectionArg {
    Up,
    Down,
}

impl From<DirectionArg> for MoveDirection {
    fn from(arg: DirectionArg) -> Self {
        match arg {
            DirectionArg::Up => MoveDirection::Up,
            DirectionArg::Down => MoveDirection::Down,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendArg {
    Replace,
    Add,
    Subtract,
}

impl From<BlendArg> for BlendMode {
    fn from(arg: BlendArg) -> Self {
        match arg {
            BlendArg::Replace => BlendMode::Replace,
            BlendArg::Add => BlendMode::Add,
            BlendArg::Subtract => BlendMode::Subtract,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeArg {
    Object,
    Sculpt,
}

impl From<ModeArg> for EditMode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Object => EditMode::Object,
            ModeArg::Sculpt => EditMode::Sculpt,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_apply() {
        let cli = Cli::parse_from(["mask-layers", "apply", "doc.json", "2", "--mode", "subtract"]);
        match cli.command {
            Commands::Apply { index, mode, .. } => {
                assert_eq!(index, 2);
                assert_eq!(BlendMode::from(mode), BlendMode::Subtract);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_set_mask_values() {
        let cli = Cli::parse_from(["mask-layers", "-v", "set-mask", "doc.json", "0.5", "1"]);
        assert!(cli.verbose);
        match cli.command {
            Commands::SetMask { values, .. } => assert_eq!(values, vec![0.5, 1.0]),
            other => panic!("unexpected command {:?}", other),
        }
    }
}
