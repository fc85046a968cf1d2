//! Figloom Core - Foundational types for the figloom tool
//!
//! This crate provides the types that all other figloom crates depend on:
//! - `Vec2`, `Vec3` - spatial types used by transforms and sprite sizes
//! - `SpriteRect` - an atlas sub-rectangle in bottom-left pixel coordinates
//! - `Stopwatch` - checkpoint timing
//! - Error types and Result alias

mod error;
mod timer;
mod types;

pub use error::{FigloomError, Result};
pub use timer::Stopwatch;
pub use types::{SpriteRect, Vec2, Vec3};
