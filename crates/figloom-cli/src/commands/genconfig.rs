//! Config generation stage
//!
//! Derives a run config from the export itself: output directories named
//! after the character, and one composition-key list per top-level
//! appearance key of the composition map.

use crate::config::Config;
use anyhow::Result;
use figloom_scene::{composition_component, CompositionComponent, SceneTree};
use figloom_unity::{analyse_export, PrefabDocument};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

pub fn run(export_dir: &Path, output_dir: &Path) -> Result<PathBuf> {
    let export = analyse_export(export_dir)?;
    let doc = PrefabDocument::load(&export.prefab_path)?;
    let tree = SceneTree::build(&doc)?;
    let component = composition_component(&doc, &tree)?;

    let character = export.character_name();
    let config = Config {
        export_dir: export_dir.to_path_buf(),
        output_dir_figure: Path::new("output").join(&character),
        output_dir_sprite: Path::new("output").join(&character).join("sprite"),
        composite_keys_list: derive_key_lists(&component),
    };

    let path = output_dir.join(format!("{character}_config.json"));
    config.save(&path)?;
    println!("Config file saved to {}", path.display());
    Ok(path)
}

/// Top-level appearance keys: map entries from `Normal1` onward, minus every
/// key that also occurs as a token inside some composition. Each surviving
/// key yields the default appearance (without its last token) plus the key.
fn derive_key_lists(component: &CompositionComponent) -> Vec<Vec<String>> {
    let mut keys: Vec<String> = Vec::new();
    let mut key_set: HashSet<String> = HashSet::new();

    let mut started = false;
    for entry in &component.map {
        if entry.key == "Normal1" {
            started = true;
        }
        if started && key_set.insert(entry.key.clone()) {
            keys.push(entry.key.clone());
        }
    }

    for entry in &component.map {
        for token in entry.composition.split(',') {
            let clean = token.trim_end_matches(['+', '-']);
            if key_set.remove(clean) {
                keys.retain(|key| key != clean);
            }
        }
    }

    log::info!("remaining appearance keys: {keys:?}");

    let default_appearance: Vec<String> = component
        .default_appearance
        .split(',')
        .map(str::to_string)
        .collect();
    let prefix = &default_appearance[..default_appearance.len().saturating_sub(1)];

    keys.into_iter()
        .map(|key| {
            let mut list = prefix.to_vec();
            list.push(key);
            list
        })
        .collect()
}
