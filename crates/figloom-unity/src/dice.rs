//! Diced-mesh vertex decoding
//!
//! Diced exports replace sprite descriptors with mesh assets. Each mesh
//! carries a `_typelessdata` hex blob: first `V` position triples
//! `(x, y, pad)` of little-endian f32 words (the pad word must be zero),
//! then `V` texture-coordinate pairs `(u, v)`. Every 4 consecutive vertices
//! form one axis-aligned quad.

use crate::doc;
use figloom_core::{FigloomError, Result};
use serde_yaml::Value;
use std::path::Path;

/// One decoded mesh vertex
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MeshVertex {
    pub x: f32,
    pub y: f32,
    pub u: f32,
    pub v: f32,
}

/// Axis-aligned bounds of one quad, in world units and normalized UVs
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QuadBounds {
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
    pub min_u: f32,
    pub min_v: f32,
    pub max_u: f32,
    pub max_v: f32,
}

/// Load a mesh asset and fold its vertex buffer into quad bounds.
pub fn parse_mesh_asset<P: AsRef<Path>>(path: P) -> Result<Vec<QuadBounds>> {
    let path = path.as_ref();
    let value = doc::load_asset_value(path)?;
    let vertices = decode_vertices(&value)
        .map_err(|e| FigloomError::Parse(format!("{}: {}", path.display(), e)))?;
    Ok(quads_from_vertices(&vertices))
}

fn decode_vertices(value: &Value) -> Result<Vec<MeshVertex>> {
    let rd = value
        .get("Sprite")
        .and_then(|s| s.get("m_RD"))
        .ok_or_else(|| FigloomError::Parse("mesh asset has no Sprite.m_RD".into()))?;

    let hex = rd
        .get("m_VertexData")
        .and_then(|v| v.get("_typelessdata"))
        .and_then(|d| d.as_str())
        .ok_or_else(|| FigloomError::Parse("mesh asset has no _typelessdata".into()))?;

    let vertex_count = rd
        .get("m_SubMeshes")
        .and_then(|s| s.get(0))
        .and_then(|s| s.get("vertexCount"))
        .and_then(|c| c.as_u64())
        .ok_or_else(|| FigloomError::Parse("mesh asset has no vertexCount".into()))?
        as usize;

    let bytes = decode_hex(hex)?;
    if bytes.len() % 4 != 0 {
        return Err(FigloomError::Parse(format!(
            "vertex buffer length {} is not word-aligned",
            bytes.len()
        )));
    }
    let words: Vec<f32> = bytemuck::pod_collect_to_vec(&bytes);

    // Position section: V triples of (x, y, pad).
    if words.len() < vertex_count * 3 {
        return Err(FigloomError::Parse(format!(
            "vertex buffer holds {} words, expected at least {} positions",
            words.len(),
            vertex_count * 3
        )));
    }
    let (position_words, uv_words) = words.split_at(vertex_count * 3);

    let mut positions = Vec::with_capacity(vertex_count);
    for triple in position_words.chunks_exact(3) {
        if triple[2].to_bits() != 0 {
            return Err(FigloomError::Parse(
                "expected zero padding word in position data".into(),
            ));
        }
        positions.push((triple[0], triple[1]));
    }

    let uvs: Vec<(f32, f32)> = uv_words
        .chunks_exact(2)
        .map(|pair| (pair[0], pair[1]))
        .collect();
    if uvs.len() != vertex_count {
        return Err(FigloomError::Parse(format!(
            "expected {} uv pairs, got {}",
            vertex_count,
            uvs.len()
        )));
    }

    Ok(positions
        .into_iter()
        .zip(uvs)
        .map(|((x, y), (u, v))| MeshVertex { x, y, u, v })
        .collect())
}

/// Fold every run of 4 vertices into its axis-aligned bounds.
fn quads_from_vertices(vertices: &[MeshVertex]) -> Vec<QuadBounds> {
    vertices
        .chunks(4)
        .map(|quad| {
            let mut bounds = QuadBounds {
                min_x: f32::INFINITY,
                min_y: f32::INFINITY,
                max_x: f32::NEG_INFINITY,
                max_y: f32::NEG_INFINITY,
                min_u: f32::INFINITY,
                min_v: f32::INFINITY,
                max_u: f32::NEG_INFINITY,
                max_v: f32::NEG_INFINITY,
            };
            for vertex in quad {
                bounds.min_x = bounds.min_x.min(vertex.x);
                bounds.min_y = bounds.min_y.min(vertex.y);
                bounds.max_x = bounds.max_x.max(vertex.x);
                bounds.max_y = bounds.max_y.max(vertex.y);
                bounds.min_u = bounds.min_u.min(vertex.u);
                bounds.min_v = bounds.min_v.min(vertex.v);
                bounds.max_u = bounds.max_u.max(vertex.u);
                bounds.max_v = bounds.max_v.max(vertex.v);
            }
            bounds
        })
        .collect()
}

fn decode_hex(hex: &str) -> Result<Vec<u8>> {
    let hex = hex.trim();
    if hex.len() % 2 != 0 {
        return Err(FigloomError::Parse("odd-length hex vertex buffer".into()));
    }
    let digits = hex
        .bytes()
        .map(|b| {
            (b as char).to_digit(16).map(|d| d as u8).ok_or_else(|| {
                FigloomError::Parse(format!("invalid hex digit '{}' in vertex buffer", b as char))
            })
        })
        .collect::<Result<Vec<u8>>>()?;
    Ok(digits
        .chunks_exact(2)
        .map(|pair| (pair[0] << 4) | pair[1])
        .collect())
}
