use crate::{Affine2, Vector2};

/// Convert an angle in degrees, as stored in rig data, to radians.
pub fn radians(degrees: f64) -> f64 {
    degrees.to_radians()
}

/// Post-multiplying builders for [`Affine2`].
///
/// All operations apply in the local frame of `self`, matching how a 2D canvas accumulates its
/// current transform: `t.translated(x, y)` first moves by `(x, y)`, then applies `t`.
pub trait AffineExt: Sized {
    fn translated(&self, x: f64, y: f64) -> Self;
    fn rotated(&self, radians: f64) -> Self;
    fn then(&self, local: &Self) -> Self;
}

impl AffineExt for Affine2 {
    fn translated(&self, x: f64, y: f64) -> Self {
        *self * Affine2::from_translation(Vector2::new(x, y))
    }

    fn rotated(&self, radians: f64) -> Self {
        *self * Affine2::from_angle(radians)
    }

    fn then(&self, local: &Self) -> Self {
        *self * *local
    }
}
