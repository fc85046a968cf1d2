//! JSON run configuration

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// One run's inputs and outputs, as generated by the genconfig stage
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// Export root; the parent directory of ExportedProject
    pub export_dir: PathBuf,
    /// Where composited figures are written
    pub output_dir_figure: PathBuf,
    /// Where individual cropped sprites are written
    pub output_dir_sprite: PathBuf,
    /// One figure is assembled per key list
    pub composite_keys_list: Vec<Vec<String>>,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("cannot read config {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("cannot parse config {}", path.display()))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)
            .with_context(|| format!("cannot write config {}", path.display()))
    }
}
