//! Typed prefab records
//!
//! Each record in a prefab document carries exactly one component under its
//! top-level key. Only the component kinds the scene tree cares about are
//! parsed; everything else becomes `Other`.

use crate::doc;
use figloom_core::{FigloomError, Result, Vec2, Vec3};
use serde::Deserialize;
use serde_yaml::Value;
use std::collections::HashMap;
use std::path::Path;

/// Reference to another record by file id
#[derive(Clone, Copy, Debug, Deserialize)]
pub struct FileRef {
    #[serde(rename = "fileID")]
    pub file_id: i64,
}

impl FileRef {
    /// File ids are used as string keys throughout the tree.
    pub fn id(&self) -> String {
        self.file_id.to_string()
    }
}

/// A component slot on a game object
#[derive(Clone, Copy, Debug, Deserialize)]
pub struct ComponentRef {
    pub component: FileRef,
}

/// A named scene-graph element owning a list of components
#[derive(Clone, Debug, Deserialize)]
pub struct GameObject {
    #[serde(rename = "m_Name")]
    pub name: String,
    #[serde(rename = "m_Component", default)]
    pub components: Vec<ComponentRef>,
}

/// Local placement plus the parent/child wiring of one node
#[derive(Clone, Debug, Deserialize)]
pub struct TransformRecord {
    #[serde(rename = "m_GameObject")]
    pub game_object: FileRef,
    #[serde(rename = "m_LocalPosition")]
    pub local_position: Vec3,
    #[serde(rename = "m_Children", default)]
    pub children: Vec<FileRef>,
    #[serde(rename = "m_Father")]
    pub father: FileRef,
}

/// One entry of a renderer's material list
#[derive(Clone, Debug, Deserialize)]
pub struct MaterialSlot {
    #[serde(default)]
    pub guid: Option<String>,
}

/// The drawable component of a node
#[derive(Clone, Debug, Deserialize)]
pub struct SpriteRenderer {
    #[serde(rename = "m_Enabled", default)]
    pub enabled: i64,
    #[serde(rename = "m_Materials", default)]
    pub materials: Vec<MaterialSlot>,
    #[serde(rename = "m_Size", default)]
    pub size: Vec2,
}

/// One `Key -> Composition` macro of the layered-character behaviour
#[derive(Clone, Debug, Default, Deserialize)]
pub struct CompositionEntry {
    #[serde(rename = "Key", default)]
    pub key: String,
    #[serde(rename = "Composition", default)]
    pub composition: String,
}

/// Script component; only the layered-character fields are read
#[derive(Clone, Debug, Deserialize)]
pub struct MonoBehaviour {
    #[serde(rename = "compositionMap", default)]
    pub composition_map: Option<Vec<CompositionEntry>>,
    #[serde(rename = "defaultAppearance", default)]
    pub default_appearance: Option<String>,
}

/// Tagged variant over the record kinds a prefab may hold
#[derive(Clone, Debug)]
pub enum PrefabRecord {
    GameObject(GameObject),
    Transform(TransformRecord),
    SpriteRenderer(SpriteRenderer),
    MonoBehaviour(MonoBehaviour),
    Other,
}

impl PrefabRecord {
    /// Classify a raw record value by its single top-level key.
    pub fn from_value(value: &Value) -> Result<Self> {
        let Some(mapping) = value.as_mapping() else {
            return Ok(Self::Other);
        };

        for (key, body) in mapping {
            let record = match key.as_str() {
                Some("GameObject") => Self::GameObject(from_body(body, "GameObject")?),
                Some("Transform") => Self::Transform(from_body(body, "Transform")?),
                Some("SpriteRenderer") => Self::SpriteRenderer(from_body(body, "SpriteRenderer")?),
                Some("MonoBehaviour") => Self::MonoBehaviour(from_body(body, "MonoBehaviour")?),
                _ => continue,
            };
            return Ok(record);
        }

        Ok(Self::Other)
    }

    pub fn as_game_object(&self) -> Option<&GameObject> {
        match self {
            Self::GameObject(go) => Some(go),
            _ => None,
        }
    }

    pub fn as_transform(&self) -> Option<&TransformRecord> {
        match self {
            Self::Transform(tf) => Some(tf),
            _ => None,
        }
    }

    pub fn as_sprite_renderer(&self) -> Option<&SpriteRenderer> {
        match self {
            Self::SpriteRenderer(sr) => Some(sr),
            _ => None,
        }
    }

    pub fn as_mono_behaviour(&self) -> Option<&MonoBehaviour> {
        match self {
            Self::MonoBehaviour(mb) => Some(mb),
            _ => None,
        }
    }
}

fn from_body<T: serde::de::DeserializeOwned>(body: &Value, kind: &str) -> Result<T> {
    serde_yaml::from_value(body.clone())
        .map_err(|e| FigloomError::Parse(format!("malformed {kind} record: {e}")))
}

/// A parsed prefab: flat map from file id to typed record
#[derive(Clone, Debug, Default)]
pub struct PrefabDocument {
    records: HashMap<String, PrefabRecord>,
}

impl PrefabDocument {
    /// Load and type every record of a prefab file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = doc::parse_document(path)?;
        log::debug!("{}: {} prefab records", path.display(), raw.len());
        Self::from_values(&raw)
    }

    /// Type a pre-split `fileID -> value` map.
    pub fn from_values(raw: &HashMap<String, Value>) -> Result<Self> {
        let mut records = HashMap::with_capacity(raw.len());
        for (id, value) in raw {
            records.insert(id.clone(), PrefabRecord::from_value(value)?);
        }
        Ok(Self { records })
    }

    pub fn get(&self, id: &str) -> Option<&PrefabRecord> {
        self.records.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &PrefabRecord)> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
