//! Diced-export stage: reassemble each mesh asset into a flat PNG

use anyhow::{Context, Result};
use figloom_compose::{reassemble_quads, AtlasCropper};
use figloom_unity::{analyse_diced_export, parse_mesh_asset};
use std::fs;
use std::path::Path;

pub fn run(export_dir: &Path, output: &Path) -> Result<()> {
    let export = analyse_diced_export(export_dir)?;
    let atlas = AtlasCropper::load(&export.texture_path)?;

    let output_dir = output.join(&export.name);
    fs::create_dir_all(&output_dir)?;

    for mesh_path in &export.mesh_paths {
        let quads = parse_mesh_asset(mesh_path)?;
        log::info!("{}: {} quads", mesh_path.display(), quads.len());

        let image = reassemble_quads(&quads, &atlas)?;

        let stem = mesh_path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("mesh");
        let output_path = output_dir.join(format!("{stem}.png"));
        image
            .save(&output_path)
            .with_context(|| format!("cannot write {}", output_path.display()))?;
        println!("Saved assembled image to {}", output_path.display());
    }

    Ok(())
}
