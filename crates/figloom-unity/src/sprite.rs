//! Sprite descriptor loading

use crate::doc;
use figloom_core::{FigloomError, Result, SpriteRect};
use serde::Deserialize;
use serde_yaml::Value;
use std::path::Path;

#[derive(Debug, Default, Deserialize)]
struct RawRect {
    #[serde(default)]
    x: f32,
    #[serde(default)]
    y: f32,
    #[serde(default)]
    width: f32,
    #[serde(default)]
    height: f32,
}

/// Load `Sprite.m_Rect` from a sprite descriptor asset.
///
/// The rectangle is in atlas pixel coordinates, origin bottom-left. Missing
/// fields default to zero, which marks the sprite empty.
pub fn load_sprite_rect<P: AsRef<Path>>(path: P) -> Result<SpriteRect> {
    let path = path.as_ref();
    let value = doc::load_asset_value(path)?;
    rect_from_value(&value)
        .map_err(|e| FigloomError::Parse(format!("{}: {}", path.display(), e)))
}

fn rect_from_value(value: &Value) -> Result<SpriteRect> {
    let raw: RawRect = match value.get("Sprite").and_then(|s| s.get("m_Rect")) {
        Some(rect) => serde_yaml::from_value(rect.clone())
            .map_err(|e| FigloomError::Parse(format!("malformed m_Rect: {e}")))?,
        None => RawRect::default(),
    };

    Ok(SpriteRect::new(
        to_pixel(raw.x),
        to_pixel(raw.y),
        to_pixel(raw.width),
        to_pixel(raw.height),
    ))
}

fn to_pixel(v: f32) -> u32 {
    v.max(0.0).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_from_value() {
        let value: Value =
            serde_yaml::from_str("Sprite:\n  m_Rect: {x: 4, y: 8.0, width: 120, height: 256}\n")
                .unwrap();
        assert_eq!(rect_from_value(&value).unwrap(), SpriteRect::new(4, 8, 120, 256));
    }

    #[test]
    fn test_missing_rect_is_empty() {
        let value: Value = serde_yaml::from_str("Sprite:\n  m_Name: x\n").unwrap();
        assert!(rect_from_value(&value).unwrap().is_empty());
    }
}
