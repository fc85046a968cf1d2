//! Figure assembly stage: one composited PNG per composition-key list

use crate::config::Config;
use anyhow::{bail, Result};
use figloom_compose::{figure_file_name, AtlasCropper, FigureAssembler, MaterialTable};
use figloom_core::Stopwatch;
use figloom_scene::{composition_component, SceneTree};
use figloom_unity::{analyse_export, load_sprite_rect, PrefabDocument};
use std::collections::HashMap;
use std::fs;

pub fn run(config: &Config) -> Result<()> {
    let mut watch = Stopwatch::new();

    let export = analyse_export(&config.export_dir)?;
    let doc = PrefabDocument::load(&export.prefab_path)?;
    let tree = SceneTree::build(&doc)?;
    log::debug!("scene tree:\n{}", tree.format_tree());
    let component = composition_component(&doc, &tree)?;

    let mut sprite_rects = HashMap::new();
    for (name, path) in &export.sprite_paths {
        sprite_rects.insert(name.clone(), load_sprite_rect(path)?);
    }
    let materials = MaterialTable::from_names(export.materials.clone())?;
    watch.checkpoint("Prefab parsing");

    let atlas = AtlasCropper::load(&export.texture_path)?;
    watch.checkpoint("Atlas decoding");

    let assembler = FigureAssembler {
        atlas: &atlas,
        sprite_rects: &sprite_rects,
        materials: &materials,
        tree: &tree,
        composition_map: &component.map,
    };

    let figure = export.character_name();
    fs::create_dir_all(&config.output_dir_figure)?;

    let mut failures = 0usize;
    for keys in &config.composite_keys_list {
        let mut watch = Stopwatch::new();
        match assembler.assemble(keys) {
            Ok(image) => {
                watch.checkpoint("Sprites compositing");
                let output_path = config
                    .output_dir_figure
                    .join(figure_file_name(&figure, keys));
                match image.save(&output_path) {
                    Ok(()) => {
                        println!("Composited figure saved at {}", output_path.display());
                        watch.checkpoint("Image saving");
                    }
                    Err(e) => {
                        log::error!("cannot write figure {}: {}", output_path.display(), e);
                        failures += 1;
                    }
                }
            }
            // A failed figure does not stop the remaining ones.
            Err(e) => {
                log::error!("figure {:?} failed: {}", keys, e);
                failures += 1;
            }
        }
    }

    if failures > 0 {
        bail!("{failures} figure(s) failed");
    }
    Ok(())
}
