use std::collections::{BTreeMap, HashSet};

use kinema_animation::{Evaluator, PlaybackOptions};
use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::{Bone, Error, Result, Skeleton};

/// Up to four pose values of one bone, in the order `x, y, angle, length`.
///
/// Trailing values may be omitted. Omitted values are left alone when the key is applied.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct BoneKey(Vec<f64>);

impl BoneKey {
    pub const MAX_VALUES: usize = 4;

    pub fn new(values: &[f64]) -> Result<Self> {
        if values.len() > Self::MAX_VALUES {
            return Err(Error::TooManyKeyValues {
                count: values.len(),
            });
        }
        Ok(Self(values.to_vec()))
    }

    /// All four values of `bone`'s pose.
    pub fn of(bone: &Bone) -> Self {
        Self(bone.pose().to_vec())
    }

    pub fn values(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Value `index`, `0.0` if omitted.
    pub fn value_or_zero(&self, index: usize) -> f64 {
        self.0.get(index).copied().unwrap_or_default()
    }

    pub fn apply_to(&self, bone: &mut Bone) {
        bone.set_pose(&self.0);
    }

    /// Overwrite the stored values from `bone`, keeping the number of values.
    fn sync_from(&mut self, bone: &Bone) {
        let pose = bone.pose();
        for (value, current) in self.0.iter_mut().zip(pose) {
            *value = current;
        }
    }

    /// Interpolate all four values, a value omitted on one side counts as `0.0` there.
    fn interpolate(position: f64, from: &Self, to: &Self) -> Self {
        Self(
            (0..Self::MAX_VALUES)
                .map(|i| f64::evaluate(position, &from.value_or_zero(i), &to.value_or_zero(i)))
                .collect(),
        )
    }
}

impl TryFrom<Vec<f64>> for BoneKey {
    type Error = Error;

    fn try_from(values: Vec<f64>) -> Result<Self> {
        Self::new(&values)
    }
}

impl From<BoneKey> for Vec<f64> {
    fn from(key: BoneKey) -> Self {
        key.0
    }
}

/// A named, timed and sparse snapshot of bone poses, keyed by bone name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyFrame {
    pub name: String,
    pub time: f64,
    pub bone_key_frames: BTreeMap<String, BoneKey>,
}

impl KeyFrame {
    pub fn new(name: impl Into<String>, time: f64) -> Self {
        Self {
            name: name.into(),
            time,
            bone_key_frames: BTreeMap::new(),
        }
    }

    pub fn with_key(mut self, bone: impl Into<String>, key: BoneKey) -> Self {
        self.bone_key_frames.insert(bone.into(), key);
        self
    }

    pub fn key(&self, bone: &str) -> Option<&BoneKey> {
        self.bone_key_frames.get(bone)
    }
}

/// Snapshot the full pose of every bone. With duplicate bone names the first bone in pre-order
/// is recorded.
pub fn create_key_frame(name: impl Into<String>, time: f64, skeleton: &Skeleton) -> KeyFrame {
    let mut key_frame = KeyFrame::new(name, time);
    for (_, bone) in skeleton.iter() {
        key_frame
            .bone_key_frames
            .entry(bone.name.clone())
            .or_insert_with(|| BoneKey::of(bone));
    }
    key_frame
}

/// Write the keys of `key_frame` onto the bones with the same name.
///
/// Bones without a key and values a key omits keep their current pose.
pub fn apply_key_frame(key_frame: &KeyFrame, skeleton: &mut Skeleton) {
    apply_keys(&key_frame.bone_key_frames, skeleton);
}

/// Sync an existing key frame from the live skeleton.
///
/// Existing keys keep their number of values. Bones without a key get a new, complete one. With
/// duplicate bone names the first bone in pre-order is synced.
pub fn update_key_frame(key_frame: &mut KeyFrame, skeleton: &Skeleton) {
    let mut synced = HashSet::new();
    for (_, bone) in skeleton.iter() {
        if !synced.insert(bone.name.as_str()) {
            continue;
        }
        let key = key_frame
            .bone_key_frames
            .entry(bone.name.clone())
            .or_insert_with(|| BoneKey(vec![0.0; BoneKey::MAX_VALUES]));
        key.sync_from(bone);
    }
}

fn apply_keys(keys: &BTreeMap<String, BoneKey>, skeleton: &mut Skeleton) {
    for (name, key) in keys {
        match skeleton.find_mut(name) {
            Some(bone) => key.apply_to(bone),
            None => trace!("No bone `{name}` for key"),
        }
    }
}

/// A named list of key frames with the options to play them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkeletonAnimation {
    pub name: String,
    pub options: PlaybackOptions,
    pub key_frames: Vec<KeyFrame>,
}

impl SkeletonAnimation {
    pub fn new(name: impl Into<String>, options: PlaybackOptions) -> Self {
        Self {
            name: name.into(),
            options,
            key_frames: Vec::new(),
        }
    }

    pub fn with_key_frame(mut self, key_frame: KeyFrame) -> Self {
        self.key_frames.push(key_frame);
        self
    }

    /// Check the key frame times and order the key frames by time. Key frames with equal times
    /// keep their relative order.
    pub fn sort_key_frames(&mut self) -> Result<()> {
        if let Some(key_frame) = self.key_frames.iter().find(|k| !k.time.is_finite()) {
            return Err(Error::InvalidKeyFrameTime {
                name: key_frame.name.clone(),
            });
        }
        self.key_frames.sort_by(|a, b| a.time.total_cmp(&b.time));
        Ok(())
    }

    /// Time of the last key frame, `0.0` without key frames.
    pub fn end_time(&self) -> f64 {
        self.key_frames.last().map_or(0.0, |k| k.time)
    }

    /// The keys to apply at `time`. Requires key frames sorted by time.
    ///
    /// Between two key frames, every bone named in either of them gets a complete, interpolated
    /// key. Before the first or after the last key frame, that key frame's keys are returned as
    /// they are. `None` without key frames.
    pub fn pose_at(&self, time: f64) -> Option<BTreeMap<String, BoneKey>> {
        let first = self.key_frames.first()?;
        let last = self.key_frames.last()?;
        if time <= first.time {
            return Some(first.bone_key_frames.clone());
        }
        if time >= last.time {
            return Some(last.bone_key_frames.clone());
        }

        let next = self.key_frames.partition_point(|k| k.time <= time);
        let (prev, next) = (&self.key_frames[next - 1], &self.key_frames[next]);
        let fraction = (time - prev.time) / (next.time - prev.time);
        trace!(
            "`{}` at {time}: between `{}` and `{}` at {fraction}",
            self.name, prev.name, next.name
        );

        let empty = BoneKey::default();
        let names = prev
            .bone_key_frames
            .keys()
            .chain(next.bone_key_frames.keys());
        Some(
            names
                .map(|name| {
                    let from = prev.key(name).unwrap_or(&empty);
                    let to = next.key(name).unwrap_or(&empty);
                    (name.clone(), BoneKey::interpolate(fraction, from, to))
                })
                .collect(),
        )
    }

    /// Pose `skeleton` at `time`.
    pub fn apply_at(&self, time: f64, skeleton: &mut Skeleton) {
        match self.pose_at(time) {
            Some(keys) => apply_keys(&keys, skeleton),
            None => debug!("`{}` has no key frames", self.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn skeleton() -> Skeleton {
        let mut skeleton = Skeleton::new(Bone::new("body").length(10.0));
        let root = skeleton.root();
        skeleton
            .add(root, Bone::new("head").at(0.0, 10.0).angle(5.0))
            .unwrap();
        skeleton
            .add(root, Bone::new("arm").at(1.0, 2.0).length(4.0))
            .unwrap();
        skeleton
    }

    #[test]
    fn create_snapshots_every_bone() {
        let key_frame = create_key_frame("rest", 0.5, &skeleton());
        assert_eq!(key_frame.bone_key_frames.len(), 3);
        assert_eq!(key_frame.key("head").unwrap().values(), &[0.0, 10.0, 5.0, 0.0]);
    }

    #[test]
    fn apply_leaves_missing_bones_and_values_alone() {
        let mut skeleton = skeleton();
        let key_frame = KeyFrame::new("wave", 1.0)
            .with_key("arm", BoneKey::new(&[3.0, 4.0, 90.0]).unwrap())
            .with_key("tail", BoneKey::new(&[1.0]).unwrap());
        apply_key_frame(&key_frame, &mut skeleton);

        let arm = skeleton.find("arm").unwrap();
        assert_eq!(skeleton[arm].pose(), [3.0, 4.0, 90.0, 4.0]);
        let head = skeleton.find("head").unwrap();
        assert_eq!(skeleton[head].pose(), [0.0, 10.0, 5.0, 0.0]);
    }

    #[test]
    fn update_syncs_and_fills_new_bones() {
        let mut skeleton = skeleton();
        let mut key_frame =
            KeyFrame::new("k", 0.0).with_key("arm", BoneKey::new(&[0.0, 0.0]).unwrap());
        skeleton.find_mut("arm").unwrap().x = 7.0;
        update_key_frame(&mut key_frame, &skeleton);

        assert_eq!(key_frame.key("arm").unwrap().values(), &[7.0, 2.0]);
        assert_eq!(key_frame.key("head").unwrap().values(), &[0.0, 10.0, 5.0, 0.0]);
        assert_eq!(key_frame.bone_key_frames.len(), 3);
    }

    #[test]
    fn duplicate_names_sync_the_first_bone() {
        let mut skeleton = skeleton();
        let root = skeleton.root();
        skeleton.add(root, Bone::new("arm").angle(99.0)).unwrap();
        skeleton.find_mut("arm").unwrap().angle = 10.0;

        let created = create_key_frame("k", 0.0, &skeleton);
        assert_eq!(created.key("arm").unwrap().values()[2], 10.0);

        let mut updated = KeyFrame::new("k", 0.0);
        update_key_frame(&mut updated, &skeleton);
        assert_eq!(updated.key("arm"), created.key("arm"));
    }

    #[test]
    fn keys_hold_at_most_four_values() {
        assert!(matches!(
            BoneKey::new(&[0.0; 5]),
            Err(Error::TooManyKeyValues { count: 5 })
        ));
        assert!(serde_json::from_str::<BoneKey>("[1, 2, 3, 4, 5]").is_err());
        assert_eq!(
            serde_json::from_str::<BoneKey>("[1, 2]").unwrap().values(),
            &[1.0, 2.0]
        );
    }

    #[test]
    fn pose_between_key_frames() {
        let mut animation = SkeletonAnimation::new("walk", PlaybackOptions::default())
            .with_key_frame(
                KeyFrame::new("b", 2.0)
                    .with_key("arm", BoneKey::new(&[2.0, 2.0, 90.0]).unwrap()),
            )
            .with_key_frame(
                KeyFrame::new("a", 0.0)
                    .with_key("arm", BoneKey::new(&[0.0, 0.0, 0.0, 8.0]).unwrap())
                    .with_key("head", BoneKey::new(&[4.0]).unwrap()),
            );
        animation.sort_key_frames().unwrap();
        assert_eq!(animation.key_frames[0].name, "a");
        assert_eq!(animation.end_time(), 2.0);

        let pose = animation.pose_at(1.0).unwrap();
        let arm = pose["arm"].values();
        assert_relative_eq!(arm[0], 1.0);
        assert_relative_eq!(arm[2], 45.0);
        // Omitted on one side, interpolated towards zero.
        assert_relative_eq!(arm[3], 4.0);
        assert_relative_eq!(pose["head"].values()[0], 2.0);

        // Clamped to the nearest key frame, which is applied as is.
        let after = animation.pose_at(5.0).unwrap();
        assert_eq!(after["arm"].values(), &[2.0, 2.0, 90.0]);
        assert!(!after.contains_key("head"));
        assert_eq!(animation.pose_at(-1.0).unwrap()["head"].values(), &[4.0]);
    }

    #[test]
    fn non_finite_times_are_rejected() {
        let mut animation = SkeletonAnimation::new("bad", PlaybackOptions::default())
            .with_key_frame(KeyFrame::new("nan", f64::NAN));
        assert!(matches!(
            animation.sort_key_frames(),
            Err(Error::InvalidKeyFrameTime { .. })
        ));
    }

    #[test]
    fn persisted_field_names() {
        let key_frame = KeyFrame::new("k", 0.0).with_key("arm", BoneKey::new(&[1.0]).unwrap());
        let animation =
            SkeletonAnimation::new("idle", PlaybackOptions::default()).with_key_frame(key_frame);
        let json = serde_json::to_value(&animation).unwrap();
        assert_eq!(
            json["keyFrames"][0]["boneKeyFrames"]["arm"],
            serde_json::json!([1.0])
        );
        assert_eq!(json["options"]["duration"], 1.0);
        let back: SkeletonAnimation = serde_json::from_value(json).unwrap();
        assert_eq!(back, animation);
    }
}
