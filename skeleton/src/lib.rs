//! Rigged 2D characters: a bone tree posed by key frames, skinned with texture patches and drawn
//! through a minimal transform based backend.

mod bone;
mod error;
mod keyframe;
mod player;
mod render;
mod skin;
mod texture;

pub use bone::*;
pub use error::{Error, Result};
pub use keyframe::*;
pub use player::*;
pub use render::*;
pub use skin::*;
pub use texture::*;
