//! Figloom Unity - Loading of unpacked engine exports
//!
//! The export tree contains Unity-flavoured YAML documents: a prefab holding
//! many `&fileID`-anchored records, single-record sprite descriptors and mesh
//! assets with a three-line header, and material `.meta` sidecars. This crate
//! turns those files into typed values and discovers the on-disk layout.

mod dice;
mod doc;
mod export;
mod records;
mod sprite;

pub use dice::{parse_mesh_asset, MeshVertex, QuadBounds};
pub use doc::{load_asset_value, parse_document_str};
pub use export::{
    analyse_diced_export, analyse_export, is_diced_export, DicedExportStructure, ExportStructure,
};
pub use records::{
    ComponentRef, CompositionEntry, FileRef, GameObject, MaterialSlot, MonoBehaviour,
    PrefabDocument, PrefabRecord, SpriteRenderer, TransformRecord,
};
pub use sprite::load_sprite_rect;
