//! Diced-atlas reassembly
//!
//! Quads carry world-space bounds plus the UV window they sample; the flat
//! image is rebuilt by cropping each UV window out of the atlas and pasting
//! it opaquely at the quad's canvas position. No blending, no masks.

use crate::atlas::AtlasCropper;
use crate::layout::PIXELS_PER_UNIT;
use figloom_core::{FigloomError, Result, SpriteRect};
use figloom_unity::QuadBounds;
use image::RgbaImage;

/// Straight-overwrite canvas for diced reassembly.
pub struct ImagePaster {
    canvas: RgbaImage,
}

impl ImagePaster {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            canvas: RgbaImage::new(width, height),
        }
    }

    /// Overwrite canvas pixels with the image at `(x, y)` (top-left origin).
    /// The pasted region is clipped to the canvas.
    pub fn paste(&mut self, image: &RgbaImage, x: i64, y: i64) {
        let (canvas_width, canvas_height) = self.canvas.dimensions();
        for (sx, sy, pixel) in image.enumerate_pixels() {
            let dx = x + i64::from(sx);
            let dy = y + i64::from(sy);
            if (0..i64::from(canvas_width)).contains(&dx)
                && (0..i64::from(canvas_height)).contains(&dy)
            {
                self.canvas.put_pixel(dx as u32, dy as u32, *pixel);
            }
        }
    }

    pub fn into_image(self) -> RgbaImage {
        self.canvas
    }
}

/// Rebuild the flat image described by a mesh's quads.
pub fn reassemble_quads(quads: &[QuadBounds], atlas: &AtlasCropper) -> Result<RgbaImage> {
    if quads.is_empty() {
        return Err(FigloomError::Composition(
            "mesh holds no quads to reassemble".to_string(),
        ));
    }

    let (atlas_width, atlas_height) = atlas.dimensions();

    let mut min_x = f32::INFINITY;
    let mut min_y = f32::INFINITY;
    let mut max_x = f32::NEG_INFINITY;
    let mut max_y = f32::NEG_INFINITY;
    for quad in quads {
        min_x = min_x.min(quad.min_x);
        min_y = min_y.min(quad.min_y);
        max_x = max_x.max(quad.max_x);
        max_y = max_y.max(quad.max_y);
    }

    let canvas_width = ((max_x - min_x) * PIXELS_PER_UNIT).round() as u32;
    let canvas_height = ((max_y - min_y) * PIXELS_PER_UNIT).round() as u32;
    let mut paster = ImagePaster::new(canvas_width, canvas_height);

    for quad in quads {
        let rect = SpriteRect::new(
            uv_to_pixel(quad.min_u, atlas_width),
            uv_to_pixel(quad.min_v, atlas_height),
            uv_to_pixel(quad.max_u - quad.min_u, atlas_width),
            uv_to_pixel(quad.max_v - quad.min_v, atlas_height),
        );
        let x = ((quad.min_x - min_x) * PIXELS_PER_UNIT).round() as i64;
        let y = (canvas_height as f32 - (quad.max_y - min_y) * PIXELS_PER_UNIT).round() as i64;

        let cropped = atlas.crop(&rect);
        paster.paste(&cropped, x, y);
    }

    Ok(paster.into_image())
}

fn uv_to_pixel(uv: f32, extent: u32) -> u32 {
    (uv * extent as f32).max(0.0).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn atlas(width: u32, height: u32) -> AtlasCropper {
        AtlasCropper::from_image(RgbaImage::from_fn(width, height, |x, y| {
            Rgba([x as u8, y as u8, 0, 255])
        }))
    }

    fn quad(bounds: (f32, f32, f32, f32), uv: (f32, f32, f32, f32)) -> QuadBounds {
        QuadBounds {
            min_x: bounds.0,
            min_y: bounds.1,
            max_x: bounds.2,
            max_y: bounds.3,
            min_u: uv.0,
            min_v: uv.1,
            max_u: uv.2,
            max_v: uv.3,
        }
    }

    #[test]
    fn test_single_quad_reassembly() {
        // 1x1-unit quad sampling the bottom-left 10x10 texels of a 64x64 atlas.
        let atlas = atlas(64, 64);
        let quads = [quad(
            (0.0, 0.0, 1.0, 1.0),
            (0.0, 0.0, 10.0 / 64.0, 10.0 / 64.0),
        )];
        let out = reassemble_quads(&quads, &atlas).unwrap();
        assert_eq!(out.dimensions(), (100, 100));
        // The crop is the atlas rows 54..64 (bottom-left origin flip), pasted
        // at the canvas top-left.
        assert_eq!(out.get_pixel(0, 0).0, [0, 54, 0, 255]);
        assert_eq!(out.get_pixel(9, 9).0, [9, 63, 0, 255]);
        // Outside the pasted window the canvas stays transparent.
        assert_eq!(out.get_pixel(50, 50).0, [0, 0, 0, 0]);
    }

    #[test]
    fn test_two_quads_positioning() {
        let atlas = atlas(64, 64);
        let quads = [
            quad((0.0, 0.0, 0.1, 0.1), (0.0, 0.0, 10.0 / 64.0, 10.0 / 64.0)),
            quad((0.1, 0.1, 0.2, 0.2), (0.5, 0.5, 0.5 + 10.0 / 64.0, 0.5 + 10.0 / 64.0)),
        ];
        let out = reassemble_quads(&quads, &atlas).unwrap();
        assert_eq!(out.dimensions(), (20, 20));
        // Second quad occupies the top-right 10x10; its crop starts at
        // atlas column 32, buffer row 64-32-10 = 22.
        assert_eq!(out.get_pixel(10, 0).0, [32, 22, 0, 255]);
        // First quad occupies the bottom-left 10x10.
        assert_eq!(out.get_pixel(0, 10).0, [0, 54, 0, 255]);
    }

    #[test]
    fn test_paste_clips() {
        let mut paster = ImagePaster::new(4, 4);
        let img = RgbaImage::from_pixel(3, 3, Rgba([9, 9, 9, 255]));
        paster.paste(&img, -1, 2);
        let out = paster.into_image();
        assert_eq!(out.get_pixel(0, 2).0, [9, 9, 9, 255]);
        assert_eq!(out.get_pixel(1, 3).0, [9, 9, 9, 255]);
        assert_eq!(out.get_pixel(3, 3).0, [0, 0, 0, 0]);
    }

    #[test]
    fn test_empty_mesh_fails() {
        assert!(reassemble_quads(&[], &atlas(4, 4)).is_err());
    }
}
