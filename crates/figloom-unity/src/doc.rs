//! Structured-document splitting and loading
//!
//! Prefabs are a sequence of YAML records separated by `--- !u!<class> &<fileID>`
//! lines, preceded by `%YAML`/`%TAG` directives. Sprite and mesh assets are a
//! single record behind a three-line header.

use figloom_core::{FigloomError, Result};
use serde_yaml::Value;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Split a multi-record document into a `fileID -> value` map.
///
/// Everything before the first `---` line (the `%YAML`/`%TAG` header) is
/// discarded. Each record id is the token following `&` on its separator line.
pub fn parse_document_str(content: &str) -> Result<HashMap<String, Value>> {
    let mut records = HashMap::new();
    let mut current: Option<(String, String)> = None;

    for line in content.lines() {
        if line.starts_with("---") {
            if let Some((id, body)) = current.take() {
                records.insert(id, parse_body(&body)?);
            }
            current = Some((record_id(line)?, String::new()));
        } else if let Some((_, body)) = current.as_mut() {
            body.push_str(line);
            body.push('\n');
        }
    }

    if let Some((id, body)) = current {
        records.insert(id, parse_body(&body)?);
    }

    Ok(records)
}

/// Read and split a multi-record document from disk.
pub fn parse_document<P: AsRef<Path>>(path: P) -> Result<HashMap<String, Value>> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;
    parse_document_str(&content).map_err(|e| {
        FigloomError::Parse(format!("{}: {}", path.display(), e))
    })
}

/// Load a single-record `.asset` payload, discarding the three header lines.
pub fn load_asset_value<P: AsRef<Path>>(path: P) -> Result<Value> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;
    let payload = skip_header_lines(&content, 3);
    serde_yaml::from_str(payload)
        .map_err(|e| FigloomError::Parse(format!("{}: {}", path.display(), e)))
}

fn skip_header_lines(content: &str, count: usize) -> &str {
    let mut rest = content;
    for _ in 0..count {
        match rest.find('\n') {
            Some(pos) => rest = &rest[pos + 1..],
            None => return "",
        }
    }
    rest
}

fn record_id(separator: &str) -> Result<String> {
    let anchor = separator
        .split('&')
        .nth(1)
        .ok_or_else(|| FigloomError::Parse(format!("record separator without &id: {separator}")))?;
    let id = anchor.split_whitespace().next().unwrap_or("");
    if id.is_empty() {
        return Err(FigloomError::Parse(format!(
            "record separator with empty id: {separator}"
        )));
    }
    Ok(id.to_string())
}

fn parse_body(body: &str) -> Result<Value> {
    serde_yaml::from_str(body).map_err(|e| FigloomError::Parse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PREFAB: &str = "\
%YAML 1.1
%TAG !u! tag:unity3d.com,2011:
--- !u!1 &100
GameObject:
  m_Name: Root
--- !u!4 &400
Transform:
  m_Father: {fileID: 0}
  m_LocalPosition: {x: 1, y: 2, z: 3}
";

    #[test]
    fn test_split_records() {
        let records = parse_document_str(PREFAB).unwrap();
        assert_eq!(records.len(), 2);

        let go = &records["100"]["GameObject"];
        assert_eq!(go["m_Name"].as_str(), Some("Root"));

        // The final line of the file belongs to the last record.
        let tf = &records["400"]["Transform"];
        assert_eq!(tf["m_LocalPosition"]["z"].as_f64(), Some(3.0));
    }

    #[test]
    fn test_separator_without_id_fails() {
        assert!(parse_document_str("--- !u!1\nGameObject:\n  m_Name: X\n").is_err());
    }

    #[test]
    fn test_skip_header_lines() {
        let content = "a\nb\nc\nSprite:\n  m_Rect: {x: 1}\n";
        let value: Value = serde_yaml::from_str(skip_header_lines(content, 3)).unwrap();
        assert_eq!(value["Sprite"]["m_Rect"]["x"].as_u64(), Some(1));
    }
}
