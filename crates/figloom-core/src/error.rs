//! Error types for figloom

use thiserror::Error;

/// The main error type for figloom operations
#[derive(Debug, Error)]
pub enum FigloomError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Export layout error: {0}")]
    Export(String),

    #[error("Scene error: {0}")]
    Scene(String),

    #[error("No root node found in prefab")]
    NoRoot,

    #[error("Multiple root nodes found in prefab: '{0}' and '{1}'")]
    MultipleRoots(String, String),

    #[error("Child id {child} of node '{parent}' does not resolve")]
    DanglingChild { parent: String, child: String },

    #[error("Composition error: {0}")]
    Composition(String),

    #[error("Composition map cycles through key '{0}'")]
    CyclicComposition(String),

    #[error("Unsupported material name: {0}")]
    UnknownMaterial(String),

    #[error("Node '{name}' must carry exactly one material, found {count}")]
    MaterialCount { name: String, count: usize },

    #[error("Mask '{0}' applied before any layer defined it")]
    UndefinedMask(String),

    #[error("Sprite descriptor not found for node '{0}'")]
    MissingSprite(String),

    #[error("Composition [{0}] selected no drawable nodes")]
    EmptySelection(String),
}

/// Result type alias for figloom operations
pub type Result<T> = std::result::Result<T, FigloomError>;
