//! Scene tree builder

use figloom_core::{FigloomError, Result, Vec2, Vec3};
use figloom_unity::{PrefabDocument, PrefabRecord, SpriteRenderer};
use std::collections::HashMap;
use std::sync::OnceLock;

/// The father id that marks the tree root
pub const ROOT_FATHER_ID: &str = "0";

/// One scene-graph element, keyed by its transform file id
#[derive(Debug)]
pub struct Node {
    pub id: String,
    pub name: String,
    /// Child transform ids; the order fixes traversal and thus render order.
    pub children: Vec<String>,
    pub father: String,
    local_position: Vec3,
    sprite_renderer: Option<SpriteRenderer>,
    global_position: OnceLock<Vec3>,
}

/// Flat map from transform id to node
pub type NodeMap = HashMap<String, Node>;

impl Node {
    pub fn local_position(&self) -> Vec3 {
        self.local_position
    }

    /// Local position summed along the parent chain, memoized write-once.
    pub fn global_position(&self, nodes: &NodeMap) -> Vec3 {
        *self.global_position.get_or_init(|| {
            if self.father == ROOT_FATHER_ID {
                return self.local_position;
            }
            match nodes.get(&self.father) {
                Some(father) => father.global_position(nodes) + self.local_position,
                None => self.local_position,
            }
        })
    }

    pub fn has_sprite(&self) -> bool {
        self.sprite_renderer.is_some()
    }

    pub fn render_enabled(&self) -> bool {
        self.sprite_renderer
            .as_ref()
            .is_some_and(|sr| sr.enabled == 1)
    }

    /// Renderer size in world units; `None` for grouping nodes.
    pub fn sprite_size(&self) -> Option<Vec2> {
        self.sprite_renderer.as_ref().map(|sr| sr.size)
    }

    /// The single material GUID of a drawable node.
    ///
    /// A renderer with any other material count is a fatal error: silently
    /// picking one would mis-color the figure.
    pub fn material_guid(&self) -> Result<&str> {
        let renderer = self.sprite_renderer.as_ref().ok_or_else(|| {
            FigloomError::Scene(format!("node '{}' has no sprite renderer", self.name))
        })?;
        if renderer.materials.len() != 1 {
            return Err(FigloomError::MaterialCount {
                name: self.name.clone(),
                count: renderer.materials.len(),
            });
        }
        renderer.materials[0].guid.as_deref().ok_or_else(|| {
            FigloomError::Scene(format!("material slot of node '{}' has no guid", self.name))
        })
    }
}

/// The rooted tree plus its flat node map
#[derive(Debug)]
pub struct SceneTree {
    pub root_id: String,
    pub nodes: NodeMap,
}

impl SceneTree {
    /// Build the tree from a prefab's record map.
    ///
    /// Fails on a game object without a transform, on zero or multiple
    /// roots, and on child or father ids that do not resolve.
    pub fn build(doc: &PrefabDocument) -> Result<Self> {
        let mut nodes = NodeMap::new();

        for (_, record) in doc.iter() {
            let Some(go) = record.as_game_object() else {
                continue;
            };

            let mut transform = None;
            let mut renderer: Option<&SpriteRenderer> = None;
            for slot in &go.components {
                let component_id = slot.component.id();
                match doc.get(&component_id) {
                    Some(PrefabRecord::Transform(tf)) => transform = Some((component_id, tf)),
                    Some(PrefabRecord::SpriteRenderer(sr)) => renderer = Some(sr),
                    _ => {}
                }
            }

            let (id, tf) = transform.ok_or_else(|| {
                FigloomError::Scene(format!("no transform found for game object '{}'", go.name))
            })?;

            let node = Node {
                id: id.clone(),
                name: go.name.clone(),
                children: tf.children.iter().map(|c| c.id()).collect(),
                father: tf.father.id(),
                local_position: tf.local_position,
                sprite_renderer: renderer.cloned(),
                global_position: OnceLock::new(),
            };
            nodes.insert(id, node);
        }

        let root_id = find_root(&nodes)?;

        for node in nodes.values() {
            for child in &node.children {
                if !nodes.contains_key(child) {
                    return Err(FigloomError::DanglingChild {
                        parent: node.name.clone(),
                        child: child.clone(),
                    });
                }
            }
            if node.father != ROOT_FATHER_ID && !nodes.contains_key(&node.father) {
                return Err(FigloomError::Scene(format!(
                    "father id {} of node '{}' does not resolve",
                    node.father, node.name
                )));
            }
        }

        Ok(Self { root_id, nodes })
    }

    pub fn root(&self) -> &Node {
        &self.nodes[&self.root_id]
    }

    pub fn get(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Indented listing of the tree, for debug output.
    pub fn format_tree(&self) -> String {
        fn walk(tree: &SceneTree, id: &str, depth: usize, out: &mut String) {
            if let Some(node) = tree.get(id) {
                out.push_str(&"  ".repeat(depth));
                out.push_str(&format!("- {} (id: {})\n", node.name, node.id));
                for child in &node.children {
                    walk(tree, child, depth + 1, out);
                }
            }
        }

        let mut out = String::new();
        walk(self, &self.root_id, 0, &mut out);
        out
    }
}

fn find_root(nodes: &NodeMap) -> Result<String> {
    let mut roots: Vec<&Node> = nodes
        .values()
        .filter(|n| n.father == ROOT_FATHER_ID)
        .collect();
    roots.sort_by(|a, b| a.id.cmp(&b.id));

    match roots.as_slice() {
        [] => Err(FigloomError::NoRoot),
        [root] => Ok(root.id.clone()),
        [first, second, ..] => Err(FigloomError::MultipleRoots(
            first.name.clone(),
            second.name.clone(),
        )),
    }
}
