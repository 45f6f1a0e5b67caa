use std::collections::HashMap;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::Bone;

/// Places a texture on a bone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkinPatch {
    pub bone: String,
    pub texture: String,
    /// Degrees, added to the bone's angle.
    pub angle: f64,
    /// Pivot in texture fractions, `(0.5, 0.5)` is the texture's center.
    pub center_x: f64,
    pub center_y: f64,
}

impl SkinPatch {
    pub fn new(bone: impl Into<String>, texture: impl Into<String>) -> Self {
        Self {
            bone: bone.into(),
            texture: texture.into(),
            angle: 0.0,
            center_x: 0.5,
            center_y: 0.5,
        }
    }

    pub fn angle(mut self, angle: f64) -> Self {
        self.angle = angle;
        self
    }

    pub fn center(mut self, x: f64, y: f64) -> Self {
        self.center_x = x;
        self.center_y = y;
        self
    }
}

/// At most one patch per bone name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "SkinDef", into = "SkinDef")]
pub struct Skin {
    patches: Vec<SkinPatch>,
    by_bone: HashMap<String, usize>,
}

impl Skin {
    /// Build a skin. If a bone has more than one patch, the first one is kept.
    pub fn new(patches: impl IntoIterator<Item = SkinPatch>) -> Self {
        let mut skin = Self::default();
        for patch in patches {
            if skin.by_bone.contains_key(&patch.bone) {
                warn!("Ignoring duplicate skin patch for bone `{}`", patch.bone);
                continue;
            }
            skin.push(patch);
        }
        skin
    }

    pub fn patch(&self, bone_name: &str) -> Option<&SkinPatch> {
        self.by_bone.get(bone_name).map(|i| &self.patches[*i])
    }

    pub fn patch_for(&self, bone: &Bone) -> Option<&SkinPatch> {
        self.patch(&bone.name)
    }

    /// Set the patch of its bone and return the one it replaces.
    pub fn insert(&mut self, patch: SkinPatch) -> Option<SkinPatch> {
        match self.by_bone.get(&patch.bone) {
            Some(index) => Some(std::mem::replace(&mut self.patches[*index], patch)),
            None => {
                self.push(patch);
                None
            }
        }
    }

    pub fn patches(&self) -> &[SkinPatch] {
        &self.patches
    }

    pub fn len(&self) -> usize {
        self.patches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patches.is_empty()
    }

    fn push(&mut self, patch: SkinPatch) {
        self.by_bone.insert(patch.bone.clone(), self.patches.len());
        self.patches.push(patch);
    }
}

#[derive(Serialize, Deserialize)]
struct SkinDef {
    patches: Vec<SkinPatch>,
}

impl From<SkinDef> for Skin {
    fn from(def: SkinDef) -> Self {
        Skin::new(def.patches)
    }
}

impl From<Skin> for SkinDef {
    fn from(skin: Skin) -> Self {
        SkinDef {
            patches: skin.patches,
        }
    }
}
