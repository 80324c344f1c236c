//! Assign: store the live mask into a layer, with overwrite confirmation
//!
//! Writing over a layer that already holds different, non-zero data needs
//! an explicit confirmation:
//!
//! ```text
//! Idle --request--> (empty or equal) --> commit --> Idle
//!                   (otherwise)      --> ConfirmPending
//! ConfirmPending --confirm--> commit --> Idle
//! ConfirmPending --cancel---> Idle
//! ```
//!
//! The pending request only lives in the [`AssignSession`]; dropping the
//! session drops the request.

use log::debug;
use uuid::Uuid;

use super::{active_index, active_object, run, ActionOutcome, MeshObject};
use crate::config::MaskConfig;
use crate::engine::MaskEngine;
use crate::error::{MaskLayerError, Result};
use crate::store::AttributeStore;

const ASSIGN_MISMATCH_WARNING: &str =
    "Topology mismatch: assigned with best effort (extra verts set to 0).";

/// Overwrite waiting for the user's answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingAssign {
    pub layer_index: usize,
    /// Guards against the list changing between prompt and answer
    pub layer_id: Uuid,
    pub layer_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AssignState {
    #[default]
    Idle,
    ConfirmPending(PendingAssign),
}

/// Drives the assign protocol across the two user interactions
#[derive(Debug, Clone, Default)]
pub struct AssignSession {
    state: AssignState,
}

impl AssignSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &AssignState {
        &self.state
    }

    pub fn pending(&self) -> Option<&PendingAssign> {
        match &self.state {
            AssignState::ConfirmPending(pending) => Some(pending),
            AssignState::Idle => None,
        }
    }

    /// Assign the live mask to the selected layer.
    ///
    /// Commits straight away when the layer holds nothing meaningful or
    /// already equals the live mask; otherwise returns `ConfirmRequired`
    /// and waits for [`confirm`](Self::confirm) or [`cancel`](Self::cancel).
    pub fn request<S: AttributeStore>(
        &mut self,
        object: Option<&mut MeshObject<S>>,
        config: &MaskConfig,
    ) -> ActionOutcome {
        self.state = AssignState::Idle;
        let state = &mut self.state;

        run("assign", || {
            let obj = active_object(object)?;
            let index = active_index(obj)?;

            let source = MaskEngine::new(&mut obj.mesh, config)
                .ensure_live_mask()?
                .name;
            let destination = obj.layers.resolve(index, &mut obj.mesh, config)?;
            let engine = MaskEngine::new(&mut obj.mesh, config);

            let has_content = engine.max_absolute(&destination)? > config.eps;
            if has_content && !engine.values_equal(&source, &destination)? {
                let layer = &obj.layers.layers()[index];
                let pending = PendingAssign {
                    layer_index: index,
                    layer_id: layer.id(),
                    layer_name: layer.display_name().to_string(),
                };
                debug!("assign to '{}' waits for confirmation", pending.layer_name);
                let message = format!(
                    "Replace stored mask '{}' with current sculpt mask?",
                    pending.layer_name
                );
                *state = AssignState::ConfirmPending(pending);
                return Ok(ActionOutcome::confirm_required(message));
            }

            commit(obj, index, config)
        })
    }

    /// The user accepted the overwrite
    pub fn confirm<S: AttributeStore>(
        &mut self,
        object: Option<&mut MeshObject<S>>,
        config: &MaskConfig,
    ) -> ActionOutcome {
        match std::mem::take(&mut self.state) {
            AssignState::Idle => ActionOutcome::cancelled_with("Nothing to confirm."),
            AssignState::ConfirmPending(pending) => run("assign_overwrite", || {
                let obj = active_object(object)?;
                let still_there = obj
                    .layers
                    .get(pending.layer_index)
                    .is_some_and(|layer| layer.id() == pending.layer_id);
                if !still_there {
                    return Err(MaskLayerError::InvalidLayerIndex {
                        index: pending.layer_index,
                        len: obj.layers.len(),
                    });
                }
                commit(obj, pending.layer_index, config)
            }),
        }
    }

    /// The user declined or dismissed the prompt; nothing is written
    pub fn cancel(&mut self) -> ActionOutcome {
        match std::mem::take(&mut self.state) {
            AssignState::Idle => ActionOutcome::cancelled(),
            AssignState::ConfirmPending(pending) => {
                debug!("assign to '{}' cancelled", pending.layer_name);
                ActionOutcome::cancelled()
            }
        }
    }
}

/// Overwrite a layer with the live mask without asking
pub fn assign_overwrite<S: AttributeStore>(
    object: Option<&mut MeshObject<S>>,
    layer_index: usize,
    config: &MaskConfig,
) -> ActionOutcome {
    run("assign_overwrite", || {
        let obj = active_object(object)?;
        commit(obj, layer_index, config)
    })
}

/// Copy the live mask into a layer's storage
pub(crate) fn commit<S: AttributeStore>(
    obj: &mut MeshObject<S>,
    index: usize,
    config: &MaskConfig,
) -> Result<ActionOutcome> {
    let source = MaskEngine::new(&mut obj.mesh, config)
        .ensure_live_mask()?
        .name;
    let destination = obj.layers.resolve(index, &mut obj.mesh, config)?;

    let status =
        MaskEngine::new(&mut obj.mesh, config).copy_values(&source, &destination, true)?;
    if status.is_mismatch() {
        Ok(ActionOutcome::finished_with_warning(ASSIGN_MISMATCH_WARNING))
    } else {
        Ok(ActionOutcome::finished())
    }
}
