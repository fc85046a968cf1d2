//! Node selection by tree traversal
//!
//! Depth-first preorder from the scene root, consulting the action table by
//! node name. The returned order is the preorder; the caller reverses it
//! before blending so the first selected node ends up drawn on top.

use crate::dsl::{Action, ActionTable};
use figloom_core::{FigloomError, Result};
use figloom_scene::{Node, SceneTree};

/// Collect the ids of the nodes a figure is made of.
///
/// With `include_only` set, unnamed drawable nodes are not picked up
/// implicitly; only actioned nodes contribute. The driver never enables it,
/// but the hook is part of the traversal contract.
pub fn select_nodes(
    tree: &SceneTree,
    actions: &ActionTable,
    include_only: bool,
) -> Result<Vec<String>> {
    let mut selected = Vec::new();
    visit(tree.root(), tree, actions, include_only, &mut selected)?;
    Ok(selected)
}

fn visit(
    node: &Node,
    tree: &SceneTree,
    actions: &ActionTable,
    include_only: bool,
    selected: &mut Vec<String>,
) -> Result<()> {
    match actions.get(&node.name) {
        Some(Action::Exclude) => return Ok(()),
        Some(Action::Include) => {
            if node.has_sprite() {
                selected.push(node.id.clone());
            }
            for child_id in &node.children {
                if let Some(child) = tree.get(child_id) {
                    visit(child, tree, actions, false, selected)?;
                }
            }
            return Ok(());
        }
        Some(Action::SelectChild(child_name)) => {
            for child_id in &node.children {
                let Some(child) = tree.get(child_id) else {
                    continue;
                };
                if &child.name == child_name {
                    if !child.has_sprite() {
                        return Err(FigloomError::Composition(format!(
                            "selected child '{}' of node '{}' has no sprite",
                            child_name, node.name
                        )));
                    }
                    selected.push(child.id.clone());
                    return Ok(());
                }
            }
            // No child carries that name; fall through to normal traversal.
        }
        None => {
            if !include_only && node.has_sprite() && node.render_enabled() {
                selected.push(node.id.clone());
            }
        }
    }

    for child_id in &node.children {
        if let Some(child) = tree.get(child_id) {
            visit(child, tree, actions, include_only, selected)?;
        }
    }
    Ok(())
}
