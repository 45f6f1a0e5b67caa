//! Geometry primitives shared by the animation and the skeleton crates.

mod color;
mod transform;

pub use color::*;
pub use transform::*;

pub type Vector2 = glam::DVec2;
pub type Vector3 = glam::DVec3;
pub type Vector4 = glam::DVec4;

/// A 2D affine transform, column-major: two basis vectors and a translation.
pub type Affine2 = glam::DAffine2;
