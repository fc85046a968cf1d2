//! Atlas cropping
//!
//! The atlas PNG is decoded once and shared read-only. Sprite rectangles
//! arrive in bottom-left-origin atlas coordinates and are flipped to the
//! top-left row order of the pixel buffer; this flip is load-bearing.

use figloom_core::{FigloomError, Result, SpriteRect};
use image::{imageops, RgbaImage};
use std::path::Path;

/// Holds the decoded atlas and slices sprites out of it.
pub struct AtlasCropper {
    image: RgbaImage,
}

impl AtlasCropper {
    /// Decode the atlas PNG into memory.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let image = image::open(path)
            .map_err(|e| FigloomError::Image(format!("{}: {}", path.display(), e)))?
            .to_rgba8();
        Ok(Self { image })
    }

    /// Wrap an already decoded atlas (used by tests and the diced path).
    pub fn from_image(image: RgbaImage) -> Self {
        Self { image }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    /// Crop a bottom-left-origin rectangle out of the atlas.
    ///
    /// A rectangle reaching outside the atlas is reported as a warning and
    /// clipped; the returned image may then be smaller than the rectangle.
    pub fn crop(&self, rect: &SpriteRect) -> RgbaImage {
        let (atlas_width, atlas_height) = self.image.dimensions();

        if u64::from(rect.x) + u64::from(rect.width) > u64::from(atlas_width)
            || u64::from(rect.y) + u64::from(rect.height) > u64::from(atlas_height)
        {
            log::warn!(
                "crop rectangle {:?} exceeds atlas size {}x{}, clipping",
                rect,
                atlas_width,
                atlas_height
            );
        }

        // Flip to top-left row indexing.
        let left = rect.x.min(atlas_width);
        let right = (u64::from(rect.x) + u64::from(rect.width)).min(u64::from(atlas_width)) as u32;
        let bottom = (i64::from(atlas_height) - i64::from(rect.y)).clamp(0, i64::from(atlas_height)) as u32;
        let top = (i64::from(atlas_height) - i64::from(rect.y) - i64::from(rect.height))
            .clamp(0, i64::from(atlas_height)) as u32;

        imageops::crop_imm(&self.image, left, top, right - left, bottom - top).to_image()
    }
}
