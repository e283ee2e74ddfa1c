//! The fixed humanoid skeleton: bone identifiers and bone-indexed storage.

use std::ops;
use std::slice;

/// Number of bones in the rig.
///
/// Every bone-indexed structure in this crate holds exactly this many
/// entries, indexed consistently by [`Bone`].
///
/// [`Bone`]: enum.Bone.html
pub const BONE_COUNT: usize = 20;

/// A named rigid segment of the humanoid rig.
///
/// The set is closed: the hierarchy, the attachment points and the pose
/// tables all assume exactly these twenty bones. Bones never move
/// independently of the hierarchy; only their rotation is authored per
/// pose.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Bone {
    /// Root of the rig.
    Pelvis,
    /// Torso, attached on top of the pelvis.
    Spine,
    /// Neck, attached on top of the spine.
    Neck,
    /// Head, attached on top of the neck.
    Head,
    /// Left clavicle, attached at the left shoulder.
    ClavicleL,
    /// Left upper arm.
    UpperArmL,
    /// Left forearm.
    ForearmL,
    /// Left hand.
    HandL,
    /// Right clavicle, attached at the right shoulder.
    ClavicleR,
    /// Right upper arm.
    UpperArmR,
    /// Right forearm.
    ForearmR,
    /// Right hand.
    HandR,
    /// Left thigh, hanging off the pelvis.
    ThighL,
    /// Left calf.
    CalfL,
    /// Left foot.
    FootL,
    /// Left toe.
    ToeL,
    /// Right thigh, hanging off the pelvis.
    ThighR,
    /// Right calf.
    CalfR,
    /// Right foot.
    FootR,
    /// Right toe.
    ToeR,
}

/// All bones in hierarchy order: parents always precede their children.
pub const ALL_BONES: [Bone; BONE_COUNT] = [
    Bone::Pelvis,
    Bone::Spine,
    Bone::Neck,
    Bone::Head,
    Bone::ClavicleL,
    Bone::UpperArmL,
    Bone::ForearmL,
    Bone::HandL,
    Bone::ClavicleR,
    Bone::UpperArmR,
    Bone::ForearmR,
    Bone::HandR,
    Bone::ThighL,
    Bone::CalfL,
    Bone::FootL,
    Bone::ToeL,
    Bone::ThighR,
    Bone::CalfR,
    Bone::FootR,
    Bone::ToeR,
];

impl Bone {
    /// Index of this bone into any [`BoneMap`].
    ///
    /// [`BoneMap`]: struct.BoneMap.html
    pub fn index(self) -> usize {
        self as usize
    }

    /// Display name of the bone.
    pub fn name(self) -> &'static str {
        match self {
            Bone::Pelvis => "pelvis",
            Bone::Spine => "spine",
            Bone::Neck => "neck",
            Bone::Head => "head",
            Bone::ClavicleL => "clavicleL",
            Bone::UpperArmL => "upperarmL",
            Bone::ForearmL => "forearmL",
            Bone::HandL => "handL",
            Bone::ClavicleR => "clavicleR",
            Bone::UpperArmR => "upperarmR",
            Bone::ForearmR => "forearmR",
            Bone::HandR => "handR",
            Bone::ThighL => "thighL",
            Bone::CalfL => "calfL",
            Bone::FootL => "footL",
            Bone::ToeL => "toeL",
            Bone::ThighR => "thighR",
            Bone::CalfR => "calfR",
            Bone::FootR => "footR",
            Bone::ToeR => "toeR",
        }
    }
}

/// Fixed-size storage with one entry per [`Bone`].
///
/// The bone set is closed and known at compile time, so this is a plain
/// array behind `ops::Index<Bone>` rather than a map. No allocation.
///
/// [`Bone`]: enum.Bone.html
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoneMap<T>(pub(crate) [T; BONE_COUNT]);

impl<T> BoneMap<T> {
    /// Builds a map by evaluating `f` for every bone in hierarchy order.
    pub fn from_fn<F>(mut f: F) -> Self
    where
        F: FnMut(Bone) -> T,
    {
        let b = &ALL_BONES;
        BoneMap([
            f(b[0]), f(b[1]), f(b[2]), f(b[3]), f(b[4]),
            f(b[5]), f(b[6]), f(b[7]), f(b[8]), f(b[9]),
            f(b[10]), f(b[11]), f(b[12]), f(b[13]), f(b[14]),
            f(b[15]), f(b[16]), f(b[17]), f(b[18]), f(b[19]),
        ])
    }

    /// Iterates over `(Bone, &T)` pairs in hierarchy order.
    pub fn iter(&self) -> BoneMapIter<T> {
        BoneMapIter {
            bones: ALL_BONES.iter(),
            values: self.0.iter(),
        }
    }

    /// View of the underlying values, ordered as [`ALL_BONES`].
    ///
    /// [`ALL_BONES`]: constant.ALL_BONES.html
    pub fn values(&self) -> &[T; BONE_COUNT] {
        &self.0
    }
}

impl<T: Copy> BoneMap<T> {
    /// Builds a map holding `value` for every bone.
    pub fn filled(value: T) -> Self {
        BoneMap([value; BONE_COUNT])
    }
}

impl<T> ops::Index<Bone> for BoneMap<T> {
    type Output = T;
    fn index(&self, bone: Bone) -> &T {
        &self.0[bone.index()]
    }
}

impl<T> ops::IndexMut<Bone> for BoneMap<T> {
    fn index_mut(&mut self, bone: Bone) -> &mut T {
        &mut self.0[bone.index()]
    }
}

/// Iterator over the `(Bone, &T)` pairs of a [`BoneMap`].
///
/// [`BoneMap`]: struct.BoneMap.html
pub struct BoneMapIter<'a, T: 'a> {
    bones: slice::Iter<'static, Bone>,
    values: slice::Iter<'a, T>,
}

impl<'a, T> Iterator for BoneMapIter<'a, T> {
    type Item = (Bone, &'a T);
    fn next(&mut self) -> Option<Self::Item> {
        match (self.bones.next(), self.values.next()) {
            (Some(&bone), Some(value)) => Some((bone, value)),
            _ => None,
        }
    }
}

/// Bone lengths of the standard figure, in model units.
///
/// The length is the bone's extent along its own up axis; it never
/// changes after construction.
pub fn standard_lengths() -> BoneMap<f32> {
    BoneMap::from_fn(|bone| match bone {
        Bone::Pelvis => 1.0,
        Bone::Spine => 3.0,
        Bone::Neck => 1.0,
        Bone::Head => 1.0,
        Bone::ClavicleL | Bone::ClavicleR => 1.0,
        Bone::UpperArmL | Bone::UpperArmR => 2.0,
        Bone::ForearmL | Bone::ForearmR => 1.5,
        Bone::HandL | Bone::HandR => 1.0,
        Bone::ThighL | Bone::ThighR => 2.5,
        Bone::CalfL | Bone::CalfR => 2.0,
        Bone::FootL | Bone::FootR => 1.0,
        Bone::ToeL | Bone::ToeR => 0.5,
    })
}
