use kinema_geometry::{Affine2, AffineExt, Vector2, radians};
use log::{debug, trace};

use crate::{Bone, BoneId, Skeleton, Skin, SkinPatch, Texture, Textures};

/// The primitives a backend supplies to [`render`].
///
/// All operations work on one ambient transform. `translate`, `rotate` and `apply` post-multiply,
/// so they act in the current local frame.
pub trait RenderBackend<P = ()> {
    /// Draw `texture` at the current transform.
    fn draw_texture(&mut self, bone: &Bone, patch: &SkinPatch, texture: &Texture<P>);
    fn transform(&self) -> Affine2;
    fn set_transform(&mut self, transform: Affine2);
    fn translate(&mut self, x: f64, y: f64);
    fn rotate(&mut self, radians: f64);
    fn apply(&mut self, transform: &Affine2);
}

/// Draw `skeleton` with `skin` depth first, parents before their children.
///
/// Bones without a patch, or with a patch whose texture does not resolve, draw nothing. Their
/// transforms still apply to their children. The backend's transform is the same before and after
/// the call.
pub fn render<P, B>(backend: &mut B, skeleton: &Skeleton, skin: &Skin, textures: &Textures<P>)
where
    B: RenderBackend<P> + ?Sized,
{
    render_bone(backend, skeleton, skeleton.root(), skin, textures);
}

fn render_bone<P, B>(
    backend: &mut B,
    skeleton: &Skeleton,
    id: BoneId,
    skin: &Skin,
    textures: &Textures<P>,
) where
    B: RenderBackend<P> + ?Sized,
{
    let bone = &skeleton[id];
    let saved = backend.transform();
    backend.translate(bone.x, bone.y);
    backend.rotate(radians(bone.angle));
    let bone_frame = backend.transform();

    let patch = skin.patch(&bone.name);
    let texture = patch.and_then(|patch| textures.texture(&patch.texture));
    if let Some(patch) = patch {
        backend.rotate(radians(patch.angle));
    }
    let pivot = pivot_offset(patch, texture);
    backend.translate(pivot.x, pivot.y);

    match (patch, texture) {
        (Some(patch), Some(texture)) => {
            trace!("Drawing `{}` on `{}`", texture.name, bone.name);
            match &texture.transform {
                Some(intrinsic) => {
                    let placed = backend.transform();
                    backend.apply(intrinsic);
                    backend.draw_texture(bone, patch, texture);
                    backend.set_transform(placed);
                }
                None => backend.draw_texture(bone, patch, texture),
            }
        }
        (Some(patch), None) => {
            debug!("Texture `{}` of bone `{}` not found", patch.texture, bone.name)
        }
        (None, _) => {}
    }

    backend.set_transform(bone_frame);
    backend.translate(bone.length, 0.0);
    for child in skeleton.children(id) {
        render_bone(backend, skeleton, *child, skin, textures);
    }
    backend.set_transform(saved);
}

/// Moves the patch's pivot to the origin: `(center - 0.5) * size`. Zero if either the patch or
/// its texture is missing.
pub fn pivot_offset<P>(patch: Option<&SkinPatch>, texture: Option<&Texture<P>>) -> Vector2 {
    match (patch, texture) {
        (Some(patch), Some(texture)) => {
            Vector2::new(patch.center_x - 0.5, patch.center_y - 0.5) * texture.size()
        }
        _ => Vector2::ZERO,
    }
}

/// A draw call recorded by [`RecordingBackend`].
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCommand {
    pub bone: String,
    pub texture: String,
    pub transform: Affine2,
}

/// A backend that only tracks the transform and records draw calls.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordingBackend {
    transform: Affine2,
    pub commands: Vec<DrawCommand>,
}

impl Default for RecordingBackend {
    fn default() -> Self {
        Self::new(Affine2::IDENTITY)
    }
}

impl RecordingBackend {
    pub fn new(transform: Affine2) -> Self {
        Self {
            transform,
            commands: Vec::new(),
        }
    }
}

impl<P> RenderBackend<P> for RecordingBackend {
    fn draw_texture(&mut self, bone: &Bone, _patch: &SkinPatch, texture: &Texture<P>) {
        self.commands.push(DrawCommand {
            bone: bone.name.clone(),
            texture: texture.name.clone(),
            transform: self.transform,
        });
    }

    fn transform(&self) -> Affine2 {
        self.transform
    }

    fn set_transform(&mut self, transform: Affine2) {
        self.transform = transform;
    }

    fn translate(&mut self, x: f64, y: f64) {
        self.transform = self.transform.translated(x, y);
    }

    fn rotate(&mut self, radians: f64) {
        self.transform = self.transform.rotated(radians);
    }

    fn apply(&mut self, transform: &Affine2) {
        self.transform = self.transform.then(transform);
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    fn point(transform: &Affine2) -> Vector2 {
        transform.transform_point2(Vector2::ZERO)
    }

    #[test]
    fn pivot_is_relative_to_the_texture_center() {
        let patch = SkinPatch::new("arm", "arm").center(1.0, 0.0);
        let texture: Texture = Texture::new("arm", "arm.png", 10.0, 4.0);
        assert_eq!(
            pivot_offset(Some(&patch), Some(&texture)),
            Vector2::new(5.0, -2.0)
        );
        assert_eq!(pivot_offset::<()>(Some(&patch), None), Vector2::ZERO);
    }

    #[test]
    fn children_follow_the_parent_length() {
        let upper = Bone::new("upper").at(10.0, 0.0).angle(90.0).length(5.0);
        let mut skeleton = Skeleton::new(upper);
        let root = skeleton.root();
        skeleton.add(root, Bone::new("lower")).unwrap();
        let skin = Skin::new([SkinPatch::new("lower", "lower")]);
        let textures: Textures =
            Textures::new("", vec![Texture::new("lower", "l.png", 2.0, 2.0)]);

        let mut backend = RecordingBackend::default();
        render(&mut backend, &skeleton, &skin, &textures);

        assert_eq!(backend.commands.len(), 1);
        let origin = point(&backend.commands[0].transform);
        assert_abs_diff_eq!(origin.x, 10.0, epsilon = 1e-9);
        assert_abs_diff_eq!(origin.y, 5.0, epsilon = 1e-9);
        assert_eq!(RenderBackend::<()>::transform(&backend), Affine2::IDENTITY);
    }
}
