//! Figure assembly driver
//!
//! Ties the composition engine together for one export: expand the keys,
//! traverse the tree, reverse the selection so the first preorder node lands
//! on top, lay the sprites out, and blend them one at a time.

use crate::atlas::AtlasCropper;
use crate::blend::ImageBlender;
use crate::dsl::ActionTable;
use crate::layout::layout_sprites;
use crate::material::{MaskRole, MaterialTable};
use crate::select::select_nodes;
use figloom_core::{FigloomError, Result, SpriteRect, Vec2, Vec3};
use figloom_scene::{Node, SceneTree};
use figloom_unity::CompositionEntry;
use image::RgbaImage;
use std::collections::HashMap;

/// Everything needed to composite figures from one export.
///
/// All fields are immutable; the assembler can be shared across figures
/// (the atlas buffer is read-only, each call owns its blender).
pub struct FigureAssembler<'a> {
    pub atlas: &'a AtlasCropper,
    /// Sprite rects keyed by node name
    pub sprite_rects: &'a HashMap<String, SpriteRect>,
    pub materials: &'a MaterialTable,
    pub tree: &'a SceneTree,
    pub composition_map: &'a [CompositionEntry],
}

impl FigureAssembler<'_> {
    /// Composite the figure selected by one composition-key list.
    pub fn assemble(&self, keys: &[String]) -> Result<RgbaImage> {
        let actions = ActionTable::from_keys(self.composition_map, keys)?;
        self.warn_unknown_names(&actions);

        let mut selected = select_nodes(self.tree, &actions, false)?;
        // First node in preorder is drawn last, i.e. ends up on top.
        selected.reverse();

        let layers = self.resolve_layers(&selected, keys)?;

        let sprites: Vec<(Vec3, Vec2)> = layers
            .iter()
            .map(|(node, _)| {
                (
                    node.global_position(&self.tree.nodes),
                    node.sprite_size().unwrap_or_default(),
                )
            })
            .collect();
        let layout = layout_sprites(&sprites)?;

        let mut blender = ImageBlender::new(layout.width, layout.height);
        for ((node, rect), position) in layers.iter().zip(&layout.positions) {
            let cropped = self.atlas.crop(rect);
            let spec = self.materials.spec(node.material_guid()?)?;
            let (set_mask, apply_mask) = match &spec.mask {
                MaskRole::Define(key) => (Some(key.as_str()), None),
                MaskRole::Consume(key) => (None, Some(key.as_str())),
                MaskRole::None => (None, None),
            };
            log::debug!(
                "compositing node '{}' ({:?}, set_mask {:?}, apply_mask {:?})",
                node.name,
                spec.blend,
                set_mask,
                apply_mask
            );
            blender.blend(&cropped, *position, spec.blend, set_mask, apply_mask)?;
        }

        Ok(blender.into_image())
    }

    /// Resolve selected ids to nodes and sprite rects, dropping empty rects.
    fn resolve_layers(&self, selected: &[String], keys: &[String]) -> Result<Vec<(&Node, SpriteRect)>> {
        let mut layers = Vec::with_capacity(selected.len());
        for id in selected {
            let Some(node) = self.tree.get(id) else {
                continue;
            };
            let rect = self
                .sprite_rects
                .get(&node.name)
                .copied()
                .ok_or_else(|| FigloomError::MissingSprite(node.name.clone()))?;
            if rect.is_empty() {
                log::warn!("skipping node '{}' with an empty sprite rect", node.name);
                continue;
            }
            layers.push((node, rect));
        }
        if layers.is_empty() {
            return Err(FigloomError::EmptySelection(keys.join(",")));
        }
        Ok(layers)
    }

    fn warn_unknown_names(&self, actions: &ActionTable) {
        for (name, _) in actions.iter() {
            if !self.tree.nodes.values().any(|node| node.name == name) {
                log::warn!("composition names '{}' but no node carries that name", name);
            }
        }
    }
}

/// Output file name for one figure: keys joined by `_`, slashes flattened.
pub fn figure_file_name(figure: &str, keys: &[String]) -> String {
    let tags = keys.join("_").replace('/', "_");
    format!("{figure}_{tags}.png")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blend::BlendMode;
    use figloom_scene::SceneTree;
    use figloom_unity::{parse_document_str, PrefabDocument};
    use image::Rgba;

    // Root with two stacked drawable children, both 1x1 units at the origin:
    // "Top" comes first in preorder and must end up drawn on top.
    const PREFAB: &str = "\
%YAML 1.1
--- !u!1 &1
GameObject:
  m_Name: Root
  m_Component:
  - component: {fileID: 10}
--- !u!4 &10
Transform:
  m_GameObject: {fileID: 1}
  m_LocalPosition: {x: 0, y: 0, z: 0}
  m_Children:
  - {fileID: 20}
  - {fileID: 30}
  m_Father: {fileID: 0}
--- !u!1 &2
GameObject:
  m_Name: Top
  m_Component:
  - component: {fileID: 20}
  - component: {fileID: 21}
--- !u!4 &20
Transform:
  m_GameObject: {fileID: 2}
  m_LocalPosition: {x: 0, y: 0, z: 0}
  m_Children: []
  m_Father: {fileID: 10}
--- !u!212 &21
SpriteRenderer:
  m_Enabled: 1
  m_Materials:
  - {fileID: 2100000, guid: aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa, type: 2}
  m_Size: {x: 1, y: 1}
--- !u!1 &3
GameObject:
  m_Name: Bottom
  m_Component:
  - component: {fileID: 30}
  - component: {fileID: 31}
--- !u!4 &30
Transform:
  m_GameObject: {fileID: 3}
  m_LocalPosition: {x: 0, y: 0, z: 0}
  m_Children: []
  m_Father: {fileID: 10}
--- !u!212 &31
SpriteRenderer:
  m_Enabled: 1
  m_Materials:
  - {fileID: 2100000, guid: bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb, type: 2}
  m_Size: {x: 1, y: 1}
";

    fn tree() -> SceneTree {
        let doc = PrefabDocument::from_values(&parse_document_str(PREFAB).unwrap()).unwrap();
        SceneTree::build(&doc).unwrap()
    }

    fn materials() -> MaterialTable {
        let mut names = HashMap::new();
        names.insert("a".repeat(32), "Naninovel_Default".to_string());
        names.insert("b".repeat(32), "Naninovel_Default".to_string());
        MaterialTable::from_names(names).unwrap()
    }

    #[test]
    fn test_assemble_draws_preorder_head_on_top() {
        // 200x200 atlas: bottom half red, top half blue.
        let atlas_image = RgbaImage::from_fn(200, 200, |_, y| {
            if y < 100 {
                Rgba([0, 0, 255, 255])
            } else {
                Rgba([255, 0, 0, 255])
            }
        });
        let atlas = AtlasCropper::from_image(atlas_image);

        let mut sprite_rects = HashMap::new();
        // "Top" samples the blue region, "Bottom" the red one.
        sprite_rects.insert("Top".to_string(), SpriteRect::new(0, 100, 100, 100));
        sprite_rects.insert("Bottom".to_string(), SpriteRect::new(0, 0, 100, 100));

        let tree = tree();
        let materials = materials();
        let assembler = FigureAssembler {
            atlas: &atlas,
            sprite_rects: &sprite_rects,
            materials: &materials,
            tree: &tree,
            composition_map: &[],
        };

        let out = assembler.assemble(&[]).unwrap();
        assert_eq!(out.dimensions(), (101, 101));
        // Both sprites overlap fully; "Top" is first in preorder, so after
        // the reversal it is blended last and wins.
        assert_eq!(out.get_pixel(50, 50).0, [0, 0, 255, 255]);
    }

    #[test]
    fn test_empty_rects_are_skipped_and_empty_selection_fails() {
        let atlas = AtlasCropper::from_image(RgbaImage::new(8, 8));
        let mut sprite_rects = HashMap::new();
        sprite_rects.insert("Top".to_string(), SpriteRect::new(0, 0, 0, 0));
        sprite_rects.insert("Bottom".to_string(), SpriteRect::new(0, 0, 0, 0));

        let tree = tree();
        let materials = materials();
        let assembler = FigureAssembler {
            atlas: &atlas,
            sprite_rects: &sprite_rects,
            materials: &materials,
            tree: &tree,
            composition_map: &[],
        };

        assert!(matches!(
            assembler.assemble(&[]),
            Err(FigloomError::EmptySelection(_))
        ));
    }

    #[test]
    fn test_missing_sprite_descriptor_fails() {
        let atlas = AtlasCropper::from_image(RgbaImage::new(8, 8));
        let sprite_rects = HashMap::new();
        let tree = tree();
        let materials = materials();
        let assembler = FigureAssembler {
            atlas: &atlas,
            sprite_rects: &sprite_rects,
            materials: &materials,
            tree: &tree,
            composition_map: &[],
        };

        assert!(matches!(
            assembler.assemble(&[]),
            Err(FigloomError::MissingSprite(_))
        ));
    }

    #[test]
    fn test_figure_file_name() {
        let keys = vec!["Normal1".to_string(), "Eyes>Wink".to_string(), "a/b".to_string()];
        assert_eq!(
            figure_file_name("Chara", &keys),
            "Chara_Normal1_Eyes>Wink_a_b.png"
        );
    }

    #[test]
    fn test_blend_mode_reexported() {
        // Material decoding and blending agree on the mode enum.
        let spec = crate::material::parse_material_name("Naninovel_Multiply").unwrap();
        assert_eq!(spec.blend, BlendMode::Multiply);
    }
}
