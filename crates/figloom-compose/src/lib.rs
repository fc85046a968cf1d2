//! Figloom Compose - The composition engine
//!
//! Expands symbolic composition keys over the scene tree, places the selected
//! sprites on a canvas in world-to-pixel units, and composites them with
//! per-material blend modes and a named clipping-mask side-channel.

mod atlas;
mod blend;
mod dice;
mod dsl;
mod figure;
mod layout;
mod material;
mod select;

pub use atlas::AtlasCropper;
pub use blend::{BlendMode, ImageBlender};
pub use dice::{reassemble_quads, ImagePaster};
pub use dsl::{expand_keys, Action, ActionTable};
pub use figure::{figure_file_name, FigureAssembler};
pub use layout::{layout_sprites, CanvasLayout, PIXELS_PER_UNIT};
pub use material::{MaskRole, MaterialSpec, MaterialTable};
pub use select::select_nodes;
