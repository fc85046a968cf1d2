//! Export-layout discovery
//!
//! Locates the atlas texture, sprite descriptors, prefab, and material metas
//! under `<export_dir>/ExportedProject/Assets`, or the diced-atlas layout
//! when no `Sprite/` directory exists.

use figloom_core::{FigloomError, Result};
use serde_yaml::Value;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

const PREFAB_SUBDIR: &str = "#WitchTrials/Prefabs/Naninovel/Characters/LayeredCharacters";
const DICED_SUBDIR: &str = "#WitchTrials/Textures/Naninovel/Characters/DicedSpriteAtlases";

/// The files a layered-character export is made of
#[derive(Clone, Debug)]
pub struct ExportStructure {
    /// The atlas PNG
    pub texture_path: PathBuf,
    /// Sprite name to descriptor path
    pub sprite_paths: HashMap<String, PathBuf>,
    /// The layered-character prefab
    pub prefab_path: PathBuf,
    /// Material GUID to material name
    pub materials: HashMap<String, String>,
}

impl ExportStructure {
    /// The character name, taken from the prefab file stem.
    pub fn character_name(&self) -> String {
        self.prefab_path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("figure")
            .to_string()
    }
}

/// The files a diced export is made of
#[derive(Clone, Debug)]
pub struct DicedExportStructure {
    /// The atlas PNG
    pub texture_path: PathBuf,
    /// Mesh buffer assets, one reassembled image each
    pub mesh_paths: Vec<PathBuf>,
    /// The figure name, taken from the one asset not starting with a digit
    pub name: String,
}

/// A diced export has no `Sprite/` directory.
pub fn is_diced_export(export_dir: &Path) -> bool {
    !assets_dir(export_dir).join("Sprite").exists()
}

/// Discover the layered-character export layout.
pub fn analyse_export(export_dir: &Path) -> Result<ExportStructure> {
    let assets = assets_dir(export_dir);

    let texture_path = first_with_extension(&assets.join("Texture2D"), "png")?;
    let prefab_path = first_with_extension(&assets.join(PREFAB_SUBDIR), "prefab")?;

    let sprite_dir = assets.join("Sprite");
    let mut sprite_paths = HashMap::new();
    for path in list_dir(&sprite_dir)? {
        if path.extension().and_then(|e| e.to_str()) == Some("asset") {
            if let Some(name) = path.file_stem().and_then(|s| s.to_str()) {
                sprite_paths.insert(name.to_string(), path.clone());
            }
        }
    }

    let material_dir = assets.join("Material");
    let mut materials = HashMap::new();
    for path in list_dir(&material_dir)? {
        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let Some(name) = file_name.strip_suffix(".mat.meta") else {
            continue;
        };
        let guid = parse_material_guid(&path)?;
        materials.insert(guid, name.to_string());
    }

    Ok(ExportStructure {
        texture_path,
        sprite_paths,
        prefab_path,
        materials,
    })
}

/// Discover the diced export layout.
pub fn analyse_diced_export(export_dir: &Path) -> Result<DicedExportStructure> {
    let assets = assets_dir(export_dir);
    let texture_path = first_with_extension(&assets.join("Texture2D"), "png")?;

    let mut mesh_paths = Vec::new();
    let mut name = None;
    for path in list_dir(&assets.join(DICED_SUBDIR))? {
        if path.extension().and_then(|e| e.to_str()) != Some("asset") {
            continue;
        }
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_string();
        if stem.chars().next().is_some_and(|c| c.is_ascii_digit()) {
            mesh_paths.push(path.clone());
        } else {
            name = Some(stem);
        }
    }

    let name = name.ok_or_else(|| {
        FigloomError::Export("diced export has no name asset (all filenames start with a digit)".into())
    })?;

    Ok(DicedExportStructure {
        texture_path,
        mesh_paths,
        name,
    })
}

fn assets_dir(export_dir: &Path) -> PathBuf {
    export_dir.join("ExportedProject").join("Assets")
}

/// Sorted directory listing; a missing directory is a structural error.
fn list_dir(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir)
        .map_err(|e| FigloomError::Export(format!("cannot read {}: {}", dir.display(), e)))?;
    let mut paths: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .collect();
    paths.sort();
    Ok(paths)
}

fn first_with_extension(dir: &Path, ext: &str) -> Result<PathBuf> {
    list_dir(dir)?
        .into_iter()
        .find(|p| p.extension().and_then(|e| e.to_str()) == Some(ext))
        .ok_or_else(|| {
            FigloomError::Export(format!("no .{} file under {}", ext, dir.display()))
        })
}

fn parse_material_guid(meta_path: &Path) -> Result<String> {
    let content = fs::read_to_string(meta_path)?;
    let value: Value = serde_yaml::from_str(&content)
        .map_err(|e| FigloomError::Parse(format!("{}: {}", meta_path.display(), e)))?;
    value
        .get("guid")
        .and_then(|g| g.as_str())
        .map(str::to_string)
        .ok_or_else(|| {
            FigloomError::Parse(format!("{}: no guid field", meta_path.display()))
        })
}
