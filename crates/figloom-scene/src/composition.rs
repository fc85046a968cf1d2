//! Layered-character behaviour lookup
//!
//! The root game object carries a `MonoBehaviour` with the composition map
//! and the default appearance; it is the entry point for key expansion.

use crate::tree::SceneTree;
use figloom_core::{FigloomError, Result};
use figloom_unity::{CompositionEntry, PrefabDocument, PrefabRecord};

/// The composition data of the root behaviour
#[derive(Clone, Debug)]
pub struct CompositionComponent {
    pub map: Vec<CompositionEntry>,
    pub default_appearance: String,
}

/// Find the root game object's behaviour holding a composition map.
pub fn composition_component(
    doc: &PrefabDocument,
    tree: &SceneTree,
) -> Result<CompositionComponent> {
    let transform = doc
        .get(&tree.root_id)
        .and_then(PrefabRecord::as_transform)
        .ok_or_else(|| {
            FigloomError::Scene("root transform record missing from prefab".to_string())
        })?;

    let game_object = doc
        .get(&transform.game_object.id())
        .and_then(PrefabRecord::as_game_object)
        .ok_or_else(|| {
            FigloomError::Scene("root game object record missing from prefab".to_string())
        })?;

    for slot in &game_object.components {
        if let Some(PrefabRecord::MonoBehaviour(mb)) = doc.get(&slot.component.id()) {
            if let Some(map) = &mb.composition_map {
                return Ok(CompositionComponent {
                    map: map.clone(),
                    default_appearance: mb.default_appearance.clone().unwrap_or_default(),
                });
            }
        }
    }

    Err(FigloomError::Scene(format!(
        "no composition map behaviour on root game object '{}'",
        game_object.name
    )))
}
