//! CLI Command Implementations
//!
//! Each command loads the document, runs one action, prints its report and
//! saves the document if the action finished.

use std::path::Path;

use log::info;

use super::document::MeshDocument;
use crate::actions::{self, ActionOutcome, ActionStatus, AssignSession, EditMode, Severity};
use crate::config::MaskConfig;
use crate::engine::{BlendMode, MaskEngine};
use crate::error::{MaskLayerError, Result};
use crate::layers::MoveDirection;
use crate::store::AttributeStore;

/// Load, run, report, save
fn with_document<F>(path: &Path, action: F) -> Result<ActionOutcome>
where
    F: FnOnce(&mut MeshDocument) -> ActionOutcome,
{
    let mut doc = MeshDocument::load(path)?;
    let outcome = action(&mut doc);
    print_outcome(&outcome);

    if outcome.is_finished() {
        doc.save(path)?;
    }
    Ok(outcome)
}

fn print_outcome(outcome: &ActionOutcome) {
    match &outcome.report {
        Some(report) => {
            let label = match report.severity {
                Severity::Info => "info",
                Severity::Warning => "warning",
                Severity::Error => "error",
            };
            match outcome.status {
                ActionStatus::Failed => eprintln!("{}: {}", label, report.message),
                _ => println!("{}: {}", label, report.message),
            }
        }
        None => {
            if outcome.status == ActionStatus::Cancelled {
                println!("Nothing to do.");
            }
        }
    }
}

/// Create a new mesh document.
pub fn init(path: &Path, name: &str, vertices: usize) -> Result<ActionOutcome> {
    info!("Creating mesh document at: {}", path.display());

    let mut doc = MeshDocument::new(name, vertices);
    doc.save(path)?;

    println!("Document created: {} ({} vertices)", path.display(), vertices);
    Ok(ActionOutcome::finished())
}

/// Print the layer list and mesh attributes.
pub fn list(path: &Path, config: &MaskConfig) -> Result<ActionOutcome> {
    let doc = MeshDocument::load(path)?;
    let obj = &doc.object;

    println!(
        "{} | {} vertices | {} mode | modified {}",
        obj.name,
        obj.mesh.vertex_count(),
        doc.mode,
        doc.modified_at.format("%Y-%m-%d %H:%M:%S")
    );
    println!("{:-<60}", "");

    if obj.layers.is_empty() {
        println!("No mask layers.");
    }
    for (i, layer) in obj.layers.layers().iter().enumerate() {
        let marker = if obj.layers.active_index() == Some(i) {
            ">>> "
        } else {
            "    "
        };
        let attr = layer.backing_attribute().unwrap_or("-");
        let status = match layer.backing_attribute().and_then(|a| obj.mesh.get(a)) {
            Some(info) if info.len != obj.mesh.vertex_count() => {
                format!("{} values, topology changed", info.len)
            }
            Some(info) => format!("{} values", info.len),
            None if layer.backing_attribute().is_some() => "missing".to_string(),
            None => "not stored".to_string(),
        };
        println!("{}{}: {} [{}] ({})", marker, i, layer.display_name(), attr, status);
    }

    println!("{:-<60}", "");
    let live = obj.mesh.read_all(&config.live_mask_name).ok();
    match live {
        Some(values) => println!("{}: {:?}", config.live_mask_name, values),
        None => println!("{}: not created", config.live_mask_name),
    }

    Ok(ActionOutcome::finished())
}

pub fn add(path: &Path, config: &MaskConfig) -> Result<ActionOutcome> {
    info!("Adding layer in: {}", path.display());
    with_document(path, |doc| actions::add_layer(Some(&mut doc.object), config))
}

pub fn remove(path: &Path) -> Result<ActionOutcome> {
    info!("Removing selected layer in: {}", path.display());
    with_document(path, |doc| actions::remove_layer(Some(&mut doc.object)))
}

pub fn select(path: &Path, index: usize) -> Result<ActionOutcome> {
    with_document(path, |doc| actions::select_layer(Some(&mut doc.object), index))
}

pub fn move_layer(path: &Path, direction: MoveDirection) -> Result<ActionOutcome> {
    with_document(path, |doc| match direction {
        MoveDirection::Up => actions::move_layer_up(Some(&mut doc.object)),
        MoveDirection::Down => actions::move_layer_down(Some(&mut doc.object)),
    })
}

pub fn rename(path: &Path, index: usize, name: &str, config: &MaskConfig) -> Result<ActionOutcome> {
    info!("Renaming layer {} to '{}' in: {}", index, name, path.display());
    with_document(path, |doc| {
        actions::on_layer_renamed(Some(&mut doc.object), index, name, config)
    })
}

/// Assign the current mask to the selected layer.
///
/// Without `yes`, an overwrite prompt ends the command with nothing written.
pub fn assign(path: &Path, yes: bool, config: &MaskConfig) -> Result<ActionOutcome> {
    info!("Assigning mask in: {}", path.display());
    with_document(path, |doc| {
        let mut session = AssignSession::new();
        let outcome = session.request(Some(&mut doc.object), config);
        if outcome.status != ActionStatus::ConfirmRequired {
            return outcome;
        }
        if yes {
            session.confirm(Some(&mut doc.object), config)
        } else {
            print_outcome(&outcome);
            session.cancel();
            ActionOutcome::cancelled_with("Re-run with --yes to overwrite.")
        }
    })
}

pub fn apply(path: &Path, index: usize, mode: BlendMode, config: &MaskConfig) -> Result<ActionOutcome> {
    info!("Applying layer {} ({}) in: {}", index, mode, path.display());
    with_document(path, |doc| {
        actions::apply_layer(Some(&mut doc.object), index, mode, config)
    })
}

pub fn set(path: &Path, config: &MaskConfig) -> Result<ActionOutcome> {
    with_document(path, |doc| actions::set_from_layer(Some(&mut doc.object), config))
}

pub fn invert(path: &Path, config: &MaskConfig) -> Result<ActionOutcome> {
    with_document(path, |doc| {
        actions::invert_mask(Some(&mut doc.object), doc.mode, config)
    })
}

pub fn clear(path: &Path, config: &MaskConfig) -> Result<ActionOutcome> {
    with_document(path, |doc| {
        actions::clear_mask(Some(&mut doc.object), doc.mode, config)
    })
}

pub fn new_from_mask(path: &Path, config: &MaskConfig) -> Result<ActionOutcome> {
    with_document(path, |doc| {
        actions::new_layer_from_mask(Some(&mut doc.object), config)
    })
}

pub fn duplicate(path: &Path, config: &MaskConfig) -> Result<ActionOutcome> {
    with_document(path, |doc| actions::duplicate_layer(Some(&mut doc.object), config))
}

/// Overwrite the live mask, as a sculpt stroke would.
pub fn set_mask(path: &Path, values: &[f32], config: &MaskConfig) -> Result<ActionOutcome> {
    with_document(path, |doc| {
        actions::run("set_mask", || {
            let mesh = &mut doc.object.mesh;
            let vertex_count = mesh.vertex_count();
            if values.len() != vertex_count {
                return Err(MaskLayerError::TopologyMismatch {
                    source_len: values.len(),
                    destination_len: vertex_count,
                    vertex_count,
                });
            }
            let mut engine = MaskEngine::new(&mut *mesh, config);
            let live = engine.ensure_live_mask()?;
            if live.len != vertex_count {
                // Stale live mask from an older topology: replace it.
                mesh.remove(&live.name);
                MaskEngine::new(&mut *mesh, config).ensure_live_mask()?;
            }
            mesh.write_all(&config.live_mask_name, values)?;
            Ok(ActionOutcome::finished())
        })
    })
}

/// Change the vertex count; stored attributes keep their old length.
pub fn resize(path: &Path, vertices: usize) -> Result<ActionOutcome> {
    with_document(path, |doc| {
        doc.object.mesh.set_vertex_count(vertices);
        ActionOutcome::finished()
    })
}

pub fn set_mode(path: &Path, mode: EditMode) -> Result<ActionOutcome> {
    with_document(path, |doc| {
        doc.mode = mode;
        ActionOutcome::finished()
    })
}
