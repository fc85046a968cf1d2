//! Sprite breakup stage: crop every named sprite out of the atlas

use crate::config::Config;
use anyhow::{Context, Result};
use figloom_compose::AtlasCropper;
use figloom_unity::{analyse_export, load_sprite_rect};
use std::fs;

pub fn run(config: &Config) -> Result<()> {
    let export = analyse_export(&config.export_dir)?;
    fs::create_dir_all(&config.output_dir_sprite)?;

    let cropper = AtlasCropper::load(&export.texture_path)?;

    let mut names: Vec<&String> = export.sprite_paths.keys().collect();
    names.sort();

    let mut written = 0usize;
    for name in names {
        let path = &export.sprite_paths[name];
        let rect = load_sprite_rect(path)?;
        if rect.is_empty() {
            log::warn!("skipping empty sprite {}", path.display());
            continue;
        }

        let output_path = config.output_dir_sprite.join(format!("{name}.png"));
        cropper
            .crop(&rect)
            .save(&output_path)
            .with_context(|| format!("cannot write sprite {}", output_path.display()))?;
        log::debug!("cropped sprite saved to {}", output_path.display());
        written += 1;
    }

    println!(
        "{} sprite(s) written to {}",
        written,
        config.output_dir_sprite.display()
    );
    Ok(())
}
