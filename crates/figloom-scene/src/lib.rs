//! Figloom Scene - Scene tree derived from the prefab record map
//!
//! Nodes are keyed by their transform file id. The tree is built once per
//! run and immutable afterwards; global positions are memoized write-once.

mod composition;
mod tree;

pub use composition::{composition_component, CompositionComponent};
pub use tree::{Node, NodeMap, SceneTree, ROOT_FATHER_ID};
