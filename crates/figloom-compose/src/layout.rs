//! Geometric placement of sprites on the output canvas
//!
//! Node anchors move from sprite center to top-left in world units, scale to
//! pixels, and the canvas is the minimum enclosing rectangle over all
//! sprites. Positions truncate toward zero; the canvas dimensions carry a
//! `+1` so rounding can never shrink the canvas below the largest sprite.

use figloom_core::{FigloomError, Result, Vec2, Vec3};

/// Fixed world-to-pixel scale of the exported assets
pub const PIXELS_PER_UNIT: f32 = 100.0;

/// Canvas size plus one top-left pixel position per sprite, in input order
#[derive(Clone, Debug, PartialEq)]
pub struct CanvasLayout {
    pub width: u32,
    pub height: u32,
    pub positions: Vec<(u32, u32)>,
}

/// Place each `(global position, world size)` sprite on a shared canvas.
pub fn layout_sprites(sprites: &[(Vec3, Vec2)]) -> Result<CanvasLayout> {
    if sprites.is_empty() {
        return Err(FigloomError::Composition(
            "cannot lay out an empty sprite list".to_string(),
        ));
    }

    // Center-anchored world positions become top-left pixel anchors.
    let anchors: Vec<(f32, f32)> = sprites
        .iter()
        .map(|(global, size)| {
            (
                (global.x - size.x / 2.0) * PIXELS_PER_UNIT,
                (global.y + size.y / 2.0) * PIXELS_PER_UNIT,
            )
        })
        .collect();
    let sizes: Vec<(f32, f32)> = sprites
        .iter()
        .map(|(_, size)| (size.x * PIXELS_PER_UNIT, size.y * PIXELS_PER_UNIT))
        .collect();

    let mut min_x = f32::INFINITY;
    let mut max_x = f32::NEG_INFINITY;
    let mut min_y = f32::INFINITY;
    let mut max_y = f32::NEG_INFINITY;
    for ((ax, ay), (sx, sy)) in anchors.iter().zip(&sizes) {
        min_x = min_x.min(*ax);
        max_x = max_x.max(ax + sx);
        min_y = min_y.min(ay - sy);
        max_y = max_y.max(*ay);
    }

    let width = (max_x - min_x) as u32 + 1;
    let height = (max_y - min_y) as u32 + 1;

    let positions = anchors
        .iter()
        .map(|(ax, ay)| ((ax - min_x) as u32, (height as f32 - (ay - min_y)) as u32))
        .collect();

    Ok(CanvasLayout {
        width,
        height,
        positions,
    })
}
