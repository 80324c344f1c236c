//! User-facing mask layer actions
//!
//! Each action runs to completion against one mesh object and returns an
//! [`ActionOutcome`]. Errors never escape an action; they come back as a
//! failed outcome carrying the error text.

mod assign;
mod ops;

use std::fmt;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::error::{MaskLayerError, Result};
use crate::layers::LayerDirectory;
use crate::store::AttributeStore;

pub use assign::{assign_overwrite, AssignSession, AssignState, PendingAssign};
pub use ops::{
    add_layer, apply_layer, clear_mask, duplicate_layer, invert_mask, move_layer_down,
    move_layer_up, new_layer_from_mask, on_layer_renamed, remove_layer, select_layer,
    set_from_layer,
};

/// Host interaction mode; mask edits on the live mask need sculpt mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditMode {
    #[default]
    Object,
    Sculpt,
}

impl fmt::Display for EditMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditMode::Object => write!(f, "Object"),
            EditMode::Sculpt => write!(f, "Sculpt"),
        }
    }
}

/// A mesh-owning object: its layer directory plus the mesh attributes
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MeshObject<S> {
    pub name: String,
    pub layers: LayerDirectory,
    pub mesh: S,
}

impl<S: AttributeStore> MeshObject<S> {
    pub fn new(name: impl Into<String>, mesh: S) -> Self {
        Self {
            name: name.into(),
            layers: LayerDirectory::new(),
            mesh,
        }
    }
}

/// How an action ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionStatus {
    Finished,
    /// The action did nothing (boundary move, empty mask, user cancel)
    Cancelled,
    /// The action was aborted by an error; state is as before
    Failed,
    /// The user must confirm before anything is written
    ConfirmRequired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// Message for the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub severity: Severity,
    pub message: String,
}

/// Result of one action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionOutcome {
    pub status: ActionStatus,
    pub report: Option<Report>,
}

impl ActionOutcome {
    pub fn finished() -> Self {
        Self {
            status: ActionStatus::Finished,
            report: None,
        }
    }

    pub fn finished_with_warning(message: impl Into<String>) -> Self {
        Self {
            status: ActionStatus::Finished,
            report: Some(Report {
                severity: Severity::Warning,
                message: message.into(),
            }),
        }
    }

    pub fn cancelled() -> Self {
        Self {
            status: ActionStatus::Cancelled,
            report: None,
        }
    }

    pub fn cancelled_with(message: impl Into<String>) -> Self {
        Self {
            status: ActionStatus::Cancelled,
            report: Some(Report {
                severity: Severity::Info,
                message: message.into(),
            }),
        }
    }

    pub fn failed(error: &MaskLayerError) -> Self {
        Self {
            status: ActionStatus::Failed,
            report: Some(Report {
                severity: Severity::Error,
                message: error.to_string(),
            }),
        }
    }

    pub fn confirm_required(message: impl Into<String>) -> Self {
        Self {
            status: ActionStatus::ConfirmRequired,
            report: Some(Report {
                severity: Severity::Info,
                message: message.into(),
            }),
        }
    }

    pub fn is_finished(&self) -> bool {
        self.status == ActionStatus::Finished
    }

    pub fn message(&self) -> Option<&str> {
        self.report.as_ref().map(|r| r.message.as_str())
    }
}

/// Run an action body, turning an error into a failed outcome
pub(crate) fn run<F>(action: &str, body: F) -> ActionOutcome
where
    F: FnOnce() -> Result<ActionOutcome>,
{
    match body() {
        Ok(outcome) => {
            info!("{}: {:?}", action, outcome.status);
            outcome
        }
        Err(e) => {
            warn!("{} failed [{}]: {}", action, e.error_code(), e);
            ActionOutcome::failed(&e)
        }
    }
}

pub(crate) fn active_object<S>(object: Option<&mut MeshObject<S>>) -> Result<&mut MeshObject<S>> {
    object.ok_or(MaskLayerError::NoActiveMeshObject)
}

pub(crate) fn active_index<S>(object: &MeshObject<S>) -> Result<usize> {
    object
        .layers
        .active_index()
        .ok_or(MaskLayerError::NoLayerSelected)
}

pub(crate) fn require_mode(current: EditMode, required: EditMode) -> Result<()> {
    if current == required {
        Ok(())
    } else {
        Err(MaskLayerError::WrongMode {
            required: required.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_outcome_carries_message() {
        let outcome = ActionOutcome::failed(&MaskLayerError::NoLayerSelected);
        assert_eq!(outcome.status, ActionStatus::Failed);
        assert_eq!(outcome.message(), Some("No layer selected."));
        assert_eq!(outcome.report.unwrap().severity, Severity::Error);
    }

    #[test]
    fn test_run_converts_errors() {
        let outcome = run("test", || Err(MaskLayerError::NoActiveMeshObject));
        assert_eq!(outcome.status, ActionStatus::Failed);

        let outcome = run("test", || Ok(ActionOutcome::finished()));
        assert!(outcome.is_finished());
    }

    #[test]
    fn test_require_mode() {
        assert!(require_mode(EditMode::Sculpt, EditMode::Sculpt).is_ok());
        let err = require_mode(EditMode::Object, EditMode::Sculpt).unwrap_err();
        assert_eq!(err.to_string(), "Switch to Sculpt mode.");
    }
}
