//! The skeleton instance: static bone lengths plus the per-frame
//! rotation state.

use cgmath::Quaternion;

use blend::{self, BlendSource};
use bone::{standard_lengths, Bone, BoneMap, ALL_BONES};
use pose::{LibraryError, Pose, PoseId, PoseLibrary, Snapshot};

/// A posable skeleton.
///
/// Holds the immutable per-bone length table and the mutable current
/// rotation of every bone. Constructed once at startup; the rotations are
/// overwritten every frame by the blender and read by the hierarchy
/// resolver. Nothing here allocates after construction.
#[derive(Clone, Debug)]
pub struct Skeleton {
    lengths: BoneMap<f32>,
    rotations: BoneMap<Quaternion<f32>>,
}

impl Skeleton {
    /// Creates a skeleton with the standard bone lengths, resting in the
    /// library's base pose.
    pub fn new(library: &PoseLibrary) -> Self {
        Skeleton {
            lengths: standard_lengths(),
            rotations: *library[PoseId::Base].rotations(),
        }
    }

    /// Creates a skeleton with a custom length table.
    ///
    /// Lengths are part of the immutable startup configuration and must
    /// all be strictly positive.
    pub fn with_lengths(
        lengths: BoneMap<f32>,
        library: &PoseLibrary,
    ) -> Result<Self, LibraryError> {
        for (bone, &length) in lengths.iter() {
            if !(length > 0.0) {
                return Err(LibraryError::BadLength(bone, length));
            }
        }
        Ok(Skeleton {
            lengths,
            rotations: *library[PoseId::Base].rotations(),
        })
    }

    /// Length of a bone along its local up axis.
    pub fn length(&self, bone: Bone) -> f32 {
        self.lengths[bone]
    }

    /// Current rotation of a bone.
    pub fn rotation(&self, bone: Bone) -> Quaternion<f32> {
        self.rotations[bone]
    }

    /// Snaps every bone to the given pose.
    pub fn set_pose(&mut self, pose: &Pose) {
        for &bone in &ALL_BONES {
            self.rotations[bone] = pose[bone];
        }
    }

    /// Overrides the rotation of a single bone.
    ///
    /// Handy for posing the figure directly, outside the sequencer.
    pub fn set_rotation(
        &mut self,
        bone: Bone,
        rotation: Quaternion<f32>,
    ) {
        self.rotations[bone] = rotation;
    }

    /// Blends `from` toward `to` by factor `t`, writing the result into
    /// the current rotations.
    pub fn apply(
        &mut self,
        from: BlendSource,
        to: &Pose,
        t: f32,
    ) {
        blend::blend(from, to, t, &mut self.rotations);
    }

    /// Captures the current rotations as a blend origin.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            rotations: self.rotations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{Deg, InnerSpace, Rotation3};

    #[test]
    fn starts_in_the_base_pose() {
        let library = PoseLibrary::standard();
        let skeleton = Skeleton::new(&library);
        for &bone in &ALL_BONES {
            assert_eq!(skeleton.rotation(bone), library[PoseId::Base][bone]);
        }
        assert_eq!(skeleton.length(Bone::Spine), 3.0);
        assert_eq!(skeleton.length(Bone::ToeL), 0.5);
    }

    #[test]
    fn snapshot_preserves_an_in_flight_blend() {
        let library = PoseLibrary::standard();
        let mut skeleton = Skeleton::new(&library);
        skeleton.apply(
            BlendSource::Pose(&library[PoseId::Walk1]),
            &library[PoseId::Walk2],
            0.25,
        );
        let snapshot = skeleton.snapshot();
        for &bone in &ALL_BONES {
            assert_eq!(snapshot[bone], skeleton.rotation(bone));
        }
        // Blending onward from the snapshot at factor zero changes nothing.
        skeleton.apply(BlendSource::Snapshot(&snapshot), &library[PoseId::Greet0], 0.0);
        for &bone in &ALL_BONES {
            assert!(snapshot[bone].dot(skeleton.rotation(bone)).abs() > 1.0 - 1.0e-5);
        }
    }

    #[test]
    fn rejects_non_positive_lengths() {
        let library = PoseLibrary::standard();
        let mut lengths = standard_lengths();
        lengths[Bone::CalfR] = 0.0;
        match Skeleton::with_lengths(lengths, &library) {
            Err(LibraryError::BadLength(bone, _)) => assert_eq!(bone, Bone::CalfR),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn single_bone_override_sticks() {
        let library = PoseLibrary::standard();
        let mut skeleton = Skeleton::new(&library);
        let q = Quaternion::from_angle_z(Deg(30.0));
        skeleton.set_rotation(Bone::UpperArmL, q);
        assert_eq!(skeleton.rotation(Bone::UpperArmL), q);
        assert_eq!(skeleton.rotation(Bone::UpperArmR), library[PoseId::Base][Bone::UpperArmR]);
    }
}
