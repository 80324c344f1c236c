//! Layer management and mask actions

use log::debug;

use super::{active_index, active_object, require_mode, run, ActionOutcome, EditMode, MeshObject};
use crate::config::MaskConfig;
use crate::engine::{BlendMode, MaskEngine};
use crate::error::Result;
use crate::layers::MoveDirection;
use crate::store::AttributeStore;

const SET_MISMATCH_WARNING: &str = "Topology mismatch: set with best effort (extra verts set to 0).";
const APPLY_MISMATCH_WARNING: &str =
    "Topology mismatch: applied to overlapping verts only (others left unchanged).";
const DUPLICATE_MISMATCH_WARNING: &str =
    "Topology mismatch: duplicated with best effort (extra verts set to 0).";

/// Append a new layer named "Mask N" with zeroed storage and select it
pub fn add_layer<S: AttributeStore>(
    object: Option<&mut MeshObject<S>>,
    config: &MaskConfig,
) -> ActionOutcome {
    run("add_layer", || {
        let obj = active_object(object)?;
        let previous = obj.layers.active_index();
        let name = obj.layers.next_layer_name(config);
        let index = obj.layers.add(name);

        if let Err(e) = obj.layers.resolve(index, &mut obj.mesh, config) {
            discard_new_layer(obj, index, previous)?;
            return Err(e);
        }
        Ok(ActionOutcome::finished())
    })
}

/// Remove the selected layer and its stored mask
pub fn remove_layer<S: AttributeStore>(object: Option<&mut MeshObject<S>>) -> ActionOutcome {
    run("remove_layer", || {
        let obj = active_object(object)?;
        let index = active_index(obj)?;
        let removed = obj.layers.remove(index, &mut obj.mesh)?;
        debug!("removed layer '{}'", removed.display_name());
        Ok(ActionOutcome::finished())
    })
}

pub fn move_layer_up<S: AttributeStore>(object: Option<&mut MeshObject<S>>) -> ActionOutcome {
    move_selected("move_layer_up", object, MoveDirection::Up)
}

pub fn move_layer_down<S: AttributeStore>(object: Option<&mut MeshObject<S>>) -> ActionOutcome {
    move_selected("move_layer_down", object, MoveDirection::Down)
}

fn move_selected<S: AttributeStore>(
    action: &str,
    object: Option<&mut MeshObject<S>>,
    direction: MoveDirection,
) -> ActionOutcome {
    run(action, || {
        let obj = active_object(object)?;
        let index = active_index(obj)?;
        if obj.layers.move_layer(index, direction)? {
            Ok(ActionOutcome::finished())
        } else {
            Ok(ActionOutcome::cancelled())
        }
    })
}

/// Make `index` the selected layer
pub fn select_layer<S: AttributeStore>(
    object: Option<&mut MeshObject<S>>,
    index: usize,
) -> ActionOutcome {
    run("select_layer", || {
        active_object(object)?.layers.select(index)?;
        Ok(ActionOutcome::finished())
    })
}

/// Rename hook: the host calls this after a layer's display name changed
pub fn on_layer_renamed<S: AttributeStore>(
    object: Option<&mut MeshObject<S>>,
    index: usize,
    new_name: &str,
    config: &MaskConfig,
) -> ActionOutcome {
    run("rename_layer", || {
        let obj = active_object(object)?;
        let attr = obj.layers.rename(index, new_name, &mut obj.mesh, config)?;
        debug!("layer {} renamed to '{}' (attribute {:?})", index, new_name, attr);
        Ok(ActionOutcome::finished())
    })
}

/// Restore the selected layer into the live mask.
///
/// On a vertex count mismatch the overlap is copied and the rest of the live
/// mask is zeroed.
pub fn set_from_layer<S: AttributeStore>(
    object: Option<&mut MeshObject<S>>,
    config: &MaskConfig,
) -> ActionOutcome {
    run("set_from_layer", || {
        let obj = active_object(object)?;
        let index = active_index(obj)?;
        let source = obj.layers.stored_attribute(index, &obj.mesh)?;

        let mut engine = MaskEngine::new(&mut obj.mesh, config);
        let live = engine.ensure_live_mask()?.name;
        let status = engine.copy_values(&source, &live, true)?;

        if status.is_mismatch() {
            Ok(ActionOutcome::finished_with_warning(SET_MISMATCH_WARNING))
        } else {
            Ok(ActionOutcome::finished())
        }
    })
}

/// Apply the layer at `index` to the live mask with the given blend mode.
///
/// Only the overlapping vertices are touched.
pub fn apply_layer<S: AttributeStore>(
    object: Option<&mut MeshObject<S>>,
    index: usize,
    mode: BlendMode,
    config: &MaskConfig,
) -> ActionOutcome {
    run("apply_layer", || {
        let obj = active_object(object)?;
        let source = obj.layers.stored_attribute(index, &obj.mesh)?;

        let mut engine = MaskEngine::new(&mut obj.mesh, config);
        let live = engine.ensure_live_mask()?.name;
        let status = engine.blend(&live, &source, mode)?;

        if status.is_mismatch() {
            Ok(ActionOutcome::finished_with_warning(APPLY_MISMATCH_WARNING))
        } else {
            Ok(ActionOutcome::finished())
        }
    })
}

/// Invert the live mask. Sculpt mode only.
pub fn invert_mask<S: AttributeStore>(
    object: Option<&mut MeshObject<S>>,
    mode: EditMode,
    config: &MaskConfig,
) -> ActionOutcome {
    run("invert_mask", || {
        let obj = active_object(object)?;
        require_mode(mode, EditMode::Sculpt)?;

        let mut engine = MaskEngine::new(&mut obj.mesh, config);
        let live = engine.ensure_live_mask()?.name;
        if engine.invert(&live)? == 0 {
            return Ok(ActionOutcome::cancelled_with("Mask is empty."));
        }
        Ok(ActionOutcome::finished())
    })
}

/// Zero the live mask. Sculpt mode only.
pub fn clear_mask<S: AttributeStore>(
    object: Option<&mut MeshObject<S>>,
    mode: EditMode,
    config: &MaskConfig,
) -> ActionOutcome {
    run("clear_mask", || {
        let obj = active_object(object)?;
        require_mode(mode, EditMode::Sculpt)?;

        let mut engine = MaskEngine::new(&mut obj.mesh, config);
        let live = engine.ensure_live_mask()?.name;
        engine.clear(&live)?;
        Ok(ActionOutcome::finished())
    })
}

/// Capture the live mask into a brand new layer
pub fn new_layer_from_mask<S: AttributeStore>(
    object: Option<&mut MeshObject<S>>,
    config: &MaskConfig,
) -> ActionOutcome {
    run("new_layer_from_mask", || {
        let obj = active_object(object)?;
        let previous = obj.layers.active_index();
        let name = obj.layers.next_layer_name(config);
        let index = obj.layers.add(name);

        match super::assign::commit(obj, index, config) {
            Ok(outcome) => Ok(outcome),
            Err(e) => {
                discard_new_layer(obj, index, previous)?;
                Err(e)
            }
        }
    })
}

/// Drop a layer appended by a failed action and restore the selection
fn discard_new_layer<S: AttributeStore>(
    obj: &mut MeshObject<S>,
    index: usize,
    previous: Option<usize>,
) -> Result<()> {
    obj.layers.remove(index, &mut obj.mesh)?;
    match previous {
        Some(i) => obj.layers.select(i),
        None => {
            obj.layers.deselect();
            Ok(())
        }
    }
}

/// Copy the selected layer into a new layer right below it
pub fn duplicate_layer<S: AttributeStore>(
    object: Option<&mut MeshObject<S>>,
    config: &MaskConfig,
) -> ActionOutcome {
    run("duplicate_layer", || {
        let obj = active_object(object)?;
        let index = active_index(obj)?;
        let (_, status) = obj.layers.duplicate(index, &mut obj.mesh, config)?;

        if status.is_mismatch() {
            Ok(ActionOutcome::finished_with_warning(DUPLICATE_MISMATCH_WARNING))
        } else {
            Ok(ActionOutcome::finished())
        }
    })
}
