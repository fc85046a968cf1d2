//! Material name decoding
//!
//! Material names have the shape `Naninovel_<Kind>[#<Role>_<Key>]`: the kind
//! selects the blend mode, the optional `#` suffix declares a mask role.
//! Names are parsed into enums once at load time.

use crate::blend::BlendMode;
use figloom_core::{FigloomError, Result};
use std::collections::HashMap;

/// Whether a layer defines a named alpha mask, consumes one, or neither
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum MaskRole {
    #[default]
    None,
    /// `Mask_<K>`: record this layer's alpha plane under key `K`
    Define(String),
    /// `Masked_<K>`: clip this layer's alpha by the plane under key `K`
    Consume(String),
}

/// Decoded blend mode and mask role of one material
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MaterialSpec {
    pub blend: BlendMode,
    pub mask: MaskRole,
}

/// Decode a material name into its spec.
pub fn parse_material_name(name: &str) -> Result<MaterialSpec> {
    let blend = if name.starts_with("Naninovel_Default") {
        BlendMode::Alpha
    } else if name.starts_with("Naninovel_Multiply") {
        BlendMode::Multiply
    } else if name.starts_with("Naninovel_Overlay") {
        BlendMode::Overlay
    } else if name.starts_with("Naninovel_Softlight") {
        BlendMode::Softlight
    } else {
        return Err(FigloomError::UnknownMaterial(name.to_string()));
    };

    Ok(MaterialSpec {
        blend,
        mask: parse_mask_role(name)?,
    })
}

fn parse_mask_role(name: &str) -> Result<MaskRole> {
    // The role lives after the last '#'; a name without '#' yields its own
    // underscore parts here, which never start with Mask/Masked.
    let tag = name.rsplit('#').next().unwrap_or(name);
    let mut parts = tag.split('_');
    let role = match parts.next() {
        Some("Mask") => MaskRole::Define(mask_key(name, parts.next())?),
        Some("Masked") => MaskRole::Consume(mask_key(name, parts.next())?),
        _ => MaskRole::None,
    };
    Ok(role)
}

fn mask_key(name: &str, key: Option<&str>) -> Result<String> {
    key.map(str::to_string).ok_or_else(|| {
        FigloomError::Parse(format!("material '{name}' has a mask tag without a key"))
    })
}

/// Material specs keyed by GUID
#[derive(Debug, Default)]
pub struct MaterialTable {
    specs: HashMap<String, MaterialSpec>,
    names: HashMap<String, String>,
}

impl MaterialTable {
    /// Decode every known material name upfront.
    ///
    /// Materials outside the `Naninovel_` namespace are kept undecoded; a
    /// renderer referencing one fails at lookup.
    pub fn from_names(names: HashMap<String, String>) -> Result<Self> {
        let mut specs = HashMap::new();
        for (guid, name) in &names {
            if name.starts_with("Naninovel_") {
                specs.insert(guid.clone(), parse_material_name(name)?);
            }
        }
        Ok(Self { specs, names })
    }

    /// The decoded spec for a renderer's material GUID.
    pub fn spec(&self, guid: &str) -> Result<&MaterialSpec> {
        self.specs.get(guid).ok_or_else(|| match self.names.get(guid) {
            Some(name) => FigloomError::UnknownMaterial(name.clone()),
            None => FigloomError::UnknownMaterial(format!("<unregistered guid {guid}>")),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_modes() {
        assert_eq!(
            parse_material_name("Naninovel_Default").unwrap(),
            MaterialSpec { blend: BlendMode::Alpha, mask: MaskRole::None }
        );
        assert_eq!(
            parse_material_name("Naninovel_Multiply").unwrap().blend,
            BlendMode::Multiply
        );
        assert_eq!(
            parse_material_name("Naninovel_Overlay").unwrap().blend,
            BlendMode::Overlay
        );
        assert_eq!(
            parse_material_name("Naninovel_Softlight").unwrap().blend,
            BlendMode::Softlight
        );
    }

    #[test]
    fn test_mask_roles() {
        assert_eq!(
            parse_material_name("Naninovel_Default#Mask_head").unwrap().mask,
            MaskRole::Define("head".to_string())
        );
        assert_eq!(
            parse_material_name("Naninovel_Multiply#Masked_head").unwrap().mask,
            MaskRole::Consume("head".to_string())
        );
        // Extra underscore parts beyond the key are dropped.
        assert_eq!(
            parse_material_name("Naninovel_Default#Mask_a_b").unwrap().mask,
            MaskRole::Define("a".to_string())
        );
    }

    #[test]
    fn test_unknown_prefix_fails() {
        assert!(matches!(
            parse_material_name("Naninovel_Screen"),
            Err(FigloomError::UnknownMaterial(_))
        ));
        assert!(parse_material_name("Sprites_Default").is_err());
    }

    #[test]
    fn test_table_lookup() {
        let mut names = HashMap::new();
        names.insert("a".repeat(32), "Naninovel_Default#Mask_A".to_string());
        names.insert("b".repeat(32), "Some_Other_Material".to_string());
        let table = MaterialTable::from_names(names).unwrap();

        let spec = table.spec(&"a".repeat(32)).unwrap();
        assert_eq!(spec.blend, BlendMode::Alpha);
        assert_eq!(spec.mask, MaskRole::Define("A".to_string()));

        assert!(matches!(
            table.spec(&"b".repeat(32)),
            Err(FigloomError::UnknownMaterial(_))
        ));
        assert!(table.spec("missing").is_err());
    }
}
