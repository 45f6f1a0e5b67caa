use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Handle of a bone inside the [`Skeleton`] that created it.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
#[display("bone #{_0}")]
pub struct BoneId(usize);

/// The pose of one bone, relative to its parent's local frame.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Bone {
    pub name: String,
    pub x: f64,
    pub y: f64,
    /// Degrees.
    pub angle: f64,
    pub length: f64,
}

impl Bone {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    pub fn angle(mut self, angle: f64) -> Self {
        self.angle = angle;
        self
    }

    pub fn length(mut self, length: f64) -> Self {
        self.length = length;
        self
    }

    /// `[x, y, angle, length]`
    pub fn pose(&self) -> [f64; 4] {
        [self.x, self.y, self.angle, self.length]
    }

    /// Set the leading pose values, `values` may omit trailing ones.
    pub fn set_pose(&mut self, values: &[f64]) {
        let fields = [&mut self.x, &mut self.y, &mut self.angle, &mut self.length];
        for (field, value) in fields.into_iter().zip(values) {
            *field = *value;
        }
    }
}

#[derive(Debug, Clone)]
struct Node {
    bone: Bone,
    parent: Option<BoneId>,
    children: Vec<BoneId>,
}

/// A tree of bones with exactly one root.
///
/// Bones live in an arena and refer to each other through [`BoneId`]s. Children are kept in
/// insertion order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "SkeletonDef", into = "SkeletonDef")]
pub struct Skeleton {
    nodes: Vec<Node>,
}

impl Skeleton {
    pub fn new(root: Bone) -> Self {
        Self {
            nodes: vec![Node {
                bone: root,
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    pub fn root(&self) -> BoneId {
        BoneId(0)
    }

    /// Append `bone` to the children of `parent`.
    pub fn add(&mut self, parent: BoneId, bone: Bone) -> Result<BoneId> {
        if parent.0 >= self.nodes.len() {
            return Err(Error::UnknownBone(parent));
        }
        Ok(self.push(parent, bone))
    }

    /// `parent` must be a bone of this skeleton.
    fn push(&mut self, parent: BoneId, bone: Bone) -> BoneId {
        let id = BoneId(self.nodes.len());
        self.nodes.push(Node {
            bone,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    pub fn get(&self, id: BoneId) -> Option<&Bone> {
        self.nodes.get(id.0).map(|node| &node.bone)
    }

    pub fn get_mut(&mut self, id: BoneId) -> Option<&mut Bone> {
        self.nodes.get_mut(id.0).map(|node| &mut node.bone)
    }

    pub fn parent(&self, id: BoneId) -> Option<BoneId> {
        self.nodes.get(id.0).and_then(|node| node.parent)
    }

    pub fn children(&self, id: BoneId) -> &[BoneId] {
        self.nodes
            .get(id.0)
            .map(|node| node.children.as_slice())
            .unwrap_or_default()
    }

    /// Depth first, pre-order search from the root. With duplicate names the first bone
    /// encountered wins.
    pub fn find(&self, name: &str) -> Option<BoneId> {
        let mut stack = vec![self.root()];
        while let Some(id) = stack.pop() {
            let node = self.nodes.get(id.0)?;
            if node.bone.name == name {
                return Some(id);
            }
            stack.extend(node.children.iter().rev());
        }
        None
    }

    pub fn find_mut(&mut self, name: &str) -> Option<&mut Bone> {
        let id = self.find(name)?;
        self.get_mut(id)
    }

    /// The subtree starting at `id` in pre-order.
    pub fn to_list(&self, id: BoneId) -> Vec<BoneId> {
        let mut list = Vec::new();
        let mut stack = vec![id];
        while let Some(id) = stack.pop() {
            let Some(node) = self.nodes.get(id.0) else {
                continue;
            };
            list.push(id);
            stack.extend(node.children.iter().rev());
        }
        list
    }

    /// All bones in pre-order.
    pub fn iter(&self) -> impl Iterator<Item = (BoneId, &Bone)> {
        self.to_list(self.root())
            .into_iter()
            .map(|id| (id, &self[id]))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// A skeleton always has its root.
    pub fn is_empty(&self) -> bool {
        false
    }
}

impl Index<BoneId> for Skeleton {
    type Output = Bone;

    fn index(&self, id: BoneId) -> &Bone {
        &self.nodes[id.0].bone
    }
}

impl IndexMut<BoneId> for Skeleton {
    fn index_mut(&mut self, id: BoneId) -> &mut Bone {
        &mut self.nodes[id.0].bone
    }
}

/// The persisted, nested form: `{root: Bone}`.
#[derive(Serialize, Deserialize)]
struct SkeletonDef {
    root: BoneDef,
}

#[derive(Serialize, Deserialize)]
struct BoneDef {
    name: String,
    x: f64,
    y: f64,
    angle: f64,
    length: f64,
    #[serde(default)]
    children: Vec<BoneDef>,
}

impl BoneDef {
    fn split(self) -> (Bone, Vec<BoneDef>) {
        let bone = Bone {
            name: self.name,
            x: self.x,
            y: self.y,
            angle: self.angle,
            length: self.length,
        };
        (bone, self.children)
    }
}

impl From<SkeletonDef> for Skeleton {
    fn from(def: SkeletonDef) -> Self {
        let (root, children) = def.root.split();
        let mut skeleton = Skeleton::new(root);
        let mut pending = vec![(skeleton.root(), children)];
        while let Some((parent, children)) = pending.pop() {
            for child in children {
                let (bone, grandchildren) = child.split();
                let id = skeleton.push(parent, bone);
                pending.push((id, grandchildren));
            }
        }
        skeleton
    }
}

impl From<Skeleton> for SkeletonDef {
    fn from(skeleton: Skeleton) -> Self {
        fn build(skeleton: &Skeleton, id: BoneId) -> BoneDef {
            let bone = &skeleton[id];
            BoneDef {
                name: bone.name.clone(),
                x: bone.x,
                y: bone.y,
                angle: bone.angle,
                length: bone.length,
                children: skeleton
                    .children(id)
                    .iter()
                    .map(|child| build(skeleton, *child))
                    .collect(),
            }
        }
        SkeletonDef {
            root: build(&skeleton, skeleton.root()),
        }
    }
}
