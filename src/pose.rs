//! Named poses and the hand-authored pose library.
//!
//! A [`Pose`] assigns one rotation to every bone of the rig. The library
//! holds the full set of named poses the sequencer cycles through; it is
//! built once at startup and never mutated. A custom library can be
//! supplied instead of the standard one, in which case it is validated up
//! front — past construction there is no recoverable error path anywhere
//! in the crate.
//!
//! [`Pose`]: struct.Pose.html

use std::ops;

use cgmath::{Deg, InnerSpace, One, Quaternion, Rotation3};

use bone::{Bone, BoneMap};

/// Number of poses in a library.
pub const POSE_COUNT: usize = 11;

/// Identifier of a named pose.
///
/// The set is closed: the sequencer's transition tables enumerate exactly
/// these poses.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum PoseId {
    /// Rest pose: arms hanging along the torso.
    Base,
    /// Demo pose raising the left arm.
    ArmLeftUp,
    /// Walk cycle, first contact.
    Walk1,
    /// Walk cycle, first passing.
    Walk2,
    /// Walk cycle, second contact.
    Walk3,
    /// Walk cycle, second passing.
    Walk4,
    /// Greeting entry: right hand on the waist, left arm down.
    Greet0,
    /// Greeting: left arm raised.
    Greet1,
    /// Greeting: left forearm waving down.
    Greet2,
    /// Greeting: left forearm waving up.
    Greet3,
    /// Greeting: left forearm back to the middle.
    Greet4,
}

/// All pose identifiers, in library order.
pub const ALL_POSES: [PoseId; POSE_COUNT] = [
    PoseId::Base,
    PoseId::ArmLeftUp,
    PoseId::Walk1,
    PoseId::Walk2,
    PoseId::Walk3,
    PoseId::Walk4,
    PoseId::Greet0,
    PoseId::Greet1,
    PoseId::Greet2,
    PoseId::Greet3,
    PoseId::Greet4,
];

impl PoseId {
    /// Index of this pose into a library.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Display name of the pose.
    pub fn name(self) -> &'static str {
        match self {
            PoseId::Base => "base",
            PoseId::ArmLeftUp => "armLeftUp",
            PoseId::Walk1 => "walk_1",
            PoseId::Walk2 => "walk_2",
            PoseId::Walk3 => "walk_3",
            PoseId::Walk4 => "walk_4",
            PoseId::Greet0 => "greet_0",
            PoseId::Greet1 => "greet_1",
            PoseId::Greet2 => "greet_2",
            PoseId::Greet3 => "greet_3",
            PoseId::Greet4 => "greet_4",
        }
    }
}

/// An immutable full-skeleton rotation assignment.
#[derive(Clone, Debug, PartialEq)]
pub struct Pose {
    rotations: BoneMap<Quaternion<f32>>,
}

impl Pose {
    /// The rest rotation (identity) for every bone.
    pub fn rest() -> Self {
        Pose {
            rotations: BoneMap::filled(Quaternion::one()),
        }
    }

    /// Builds a pose from the rest rotation with per-bone overrides.
    ///
    /// Bones not listed keep the identity rotation, so every pose covers
    /// the full skeleton by construction.
    pub fn from_overrides(overrides: &[(Bone, Quaternion<f32>)]) -> Self {
        let mut pose = Pose::rest();
        for &(bone, rotation) in overrides {
            pose.rotations[bone] = rotation;
        }
        pose
    }

    pub(crate) fn rotations(&self) -> &BoneMap<Quaternion<f32>> {
        &self.rotations
    }
}

impl ops::Index<Bone> for Pose {
    type Output = Quaternion<f32>;
    fn index(&self, bone: Bone) -> &Quaternion<f32> {
        &self.rotations[bone]
    }
}

/// A captured copy of all current bone rotations at a specific instant.
///
/// Used as a blend origin when transitioning between named-pose
/// sequences, so a blend can start from whatever partial rotation was in
/// effect when the cycle limit was hit. Fixed size; capturing allocates
/// nothing.
#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot {
    pub(crate) rotations: BoneMap<Quaternion<f32>>,
}

impl ops::Index<Bone> for Snapshot {
    type Output = Quaternion<f32>;
    fn index(&self, bone: Bone) -> &Quaternion<f32> {
        &self.rotations[bone]
    }
}

quick_error! {
    #[doc = "Error encountered when validating rig configuration."]
    #[derive(Debug, Clone, Copy, PartialEq)]
    pub enum LibraryError {
        #[doc = "A pose rotation has a non-finite component."]
        NotFinite(pose: PoseId, bone: Bone) {
            description("non-finite pose rotation")
            display("pose {:?} holds a non-finite rotation for bone {:?}", pose, bone)
        }

        #[doc = "A pose rotation is not a unit quaternion."]
        NotUnit(pose: PoseId, bone: Bone, norm: f32) {
            description("non-unit pose rotation")
            display("pose {:?} holds a rotation of norm {} for bone {:?}", pose, norm, bone)
        }

        #[doc = "A bone length is not strictly positive."]
        BadLength(bone: Bone, length: f32) {
            description("non-positive bone length")
            display("bone {:?} has non-positive length {}", bone, length)
        }
    }
}

/// The fixed table of named poses.
#[derive(Debug)]
pub struct PoseLibrary {
    poses: [Pose; POSE_COUNT],
}

impl ops::Index<PoseId> for PoseLibrary {
    type Output = Pose;
    fn index(&self, id: PoseId) -> &Pose {
        &self.poses[id.index()]
    }
}

impl PoseLibrary {
    /// Builds a library from user-supplied poses, validating that every
    /// rotation is a finite unit quaternion.
    pub fn new(poses: [Pose; POSE_COUNT]) -> Result<Self, LibraryError> {
        for (id, pose) in ALL_POSES.iter().zip(poses.iter()) {
            for (bone, q) in pose.rotations.iter() {
                let parts = [q.s, q.v.x, q.v.y, q.v.z];
                if parts.iter().any(|c| !c.is_finite()) {
                    return Err(LibraryError::NotFinite(*id, bone));
                }
                let norm = q.magnitude();
                if (norm - 1.0).abs() > 1.0e-4 {
                    return Err(LibraryError::NotUnit(*id, bone, norm));
                }
            }
        }
        Ok(PoseLibrary { poses })
    }

    /// The standard library: the rest pose, the arm-raise demo pose, the
    /// four walk-cycle keyframes and the five greeting keyframes.
    ///
    /// All rotations are authored as single angle-axis turns (or products
    /// of two), so they are unit by construction and skip validation.
    pub fn standard() -> Self {
        // Angle-axis shorthands, degrees.
        let x = |deg: f32| Quaternion::from_angle_x(Deg(deg));
        let z = |deg: f32| Quaternion::from_angle_z(Deg(deg));

        // Shoulders are rotated outward in every pose so the clavicles
        // lie horizontally.
        let shoulders = [(Bone::ClavicleL, z(-90.0)), (Bone::ClavicleR, z(90.0))];

        // Right arm resting on the waist, shared by all greeting frames.
        let waist_arm = [
            (Bone::UpperArmR, z(-30.0) * x(180.0)),
            (Bone::ForearmR, z(-90.0)),
            (Bone::HandR, z(-30.0)),
        ];

        let with_shoulders = |rest: &[(Bone, Quaternion<f32>)]| {
            let mut overrides = shoulders.to_vec();
            overrides.extend_from_slice(rest);
            Pose::from_overrides(&overrides)
        };
        let greeting = |left_arm: &[(Bone, Quaternion<f32>)]| {
            let mut overrides = shoulders.to_vec();
            overrides.push((Bone::FootR, x(-90.0)));
            overrides.push((Bone::FootL, x(-90.0)));
            overrides.extend_from_slice(&waist_arm);
            overrides.extend_from_slice(left_arm);
            Pose::from_overrides(&overrides)
        };

        let base = with_shoulders(&[]);

        let arm_left_up = with_shoulders(&[
            (Bone::UpperArmL, z(50.0)),
            (Bone::ForearmL, z(50.0)),
        ]);

        // Walk keyframes: two contact and two passing positions, the arms
        // swinging opposite the legs. Arms hang downward, hence the 180
        // degree base turn about X.
        let walk_1 = with_shoulders(&[
            (Bone::UpperArmR, x(180.0 + 30.0)),
            (Bone::ForearmR, x(-20.0)),
            (Bone::UpperArmL, x(180.0 - 30.0)),
            (Bone::ForearmL, x(-20.0)),
            (Bone::ThighR, x(-30.0)),
            (Bone::CalfR, x(20.0)),
            (Bone::FootR, x(-90.0)),
            (Bone::ThighL, x(30.0)),
            (Bone::CalfL, x(20.0)),
            (Bone::FootL, x(-90.0)),
        ]);
        let walk_2 = with_shoulders(&[
            (Bone::UpperArmR, x(180.0 + 10.0)),
            (Bone::ForearmR, x(-10.0)),
            (Bone::UpperArmL, x(180.0 - 10.0)),
            (Bone::ForearmL, x(-10.0)),
            (Bone::ThighR, x(-10.0)),
            (Bone::CalfR, x(10.0)),
            (Bone::FootR, x(-90.0)),
            (Bone::ThighL, x(10.0)),
            (Bone::CalfL, x(10.0)),
            (Bone::FootL, x(-90.0)),
        ]);
        let walk_3 = with_shoulders(&[
            (Bone::UpperArmR, x(180.0 - 30.0)),
            (Bone::ForearmR, x(-20.0)),
            (Bone::UpperArmL, x(180.0 + 30.0)),
            (Bone::ForearmL, x(-20.0)),
            (Bone::ThighR, x(30.0)),
            (Bone::CalfR, x(20.0)),
            (Bone::FootR, x(-90.0)),
            (Bone::ThighL, x(-30.0)),
            (Bone::CalfL, x(20.0)),
            (Bone::FootL, x(-90.0)),
        ]);
        let walk_4 = with_shoulders(&[
            (Bone::UpperArmR, x(180.0 - 10.0)),
            (Bone::ForearmR, x(-10.0)),
            (Bone::UpperArmL, x(180.0 + 10.0)),
            (Bone::ForearmL, x(-10.0)),
            (Bone::ThighR, x(10.0)),
            (Bone::CalfR, x(10.0)),
            (Bone::FootR, x(-90.0)),
            (Bone::ThighL, x(-10.0)),
            (Bone::CalfL, x(10.0)),
            (Bone::FootL, x(-90.0)),
        ]);

        // Greeting keyframes: the left arm raises, then waves between a
        // low, a high and a middle forearm position.
        let greet_0 = greeting(&[(Bone::UpperArmL, x(180.0))]);
        let greet_1 = greeting(&[
            (Bone::UpperArmL, z(90.0) * x(180.0)),
            (Bone::ForearmL, z(-30.0)),
        ]);
        let greet_2 = greeting(&[
            (Bone::UpperArmL, z(90.0) * x(180.0)),
            (Bone::ForearmL, z(-60.0)),
            (Bone::HandL, z(-20.0)),
        ]);
        let greet_3 = greeting(&[
            (Bone::UpperArmL, z(90.0) * x(180.0)),
            (Bone::ForearmL, z(0.0)),
            (Bone::HandL, z(20.0)),
        ]);
        let greet_4 = greeting(&[
            (Bone::UpperArmL, z(90.0) * x(180.0)),
            (Bone::ForearmL, z(-30.0)),
            (Bone::HandL, z(0.0)),
        ]);

        PoseLibrary {
            poses: [
                base, arm_left_up,
                walk_1, walk_2, walk_3, walk_4,
                greet_0, greet_1, greet_2, greet_3, greet_4,
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bone::ALL_BONES;
    use cgmath::{InnerSpace, Quaternion, Vector3, Zero};

    #[test]
    fn standard_library_is_well_formed() {
        let library = PoseLibrary::standard();
        for &id in &ALL_POSES {
            for &bone in &ALL_BONES {
                let q = library[id][bone];
                assert!(q.s.is_finite() && q.v.x.is_finite(), "{}/{}", id.name(), bone.name());
                let norm = q.magnitude();
                assert!((norm - 1.0).abs() < 1.0e-5, "{}/{}: {}", id.name(), bone.name(), norm);
            }
        }
    }

    #[test]
    fn base_pose_only_turns_the_shoulders() {
        let library = PoseLibrary::standard();
        let base = &library[PoseId::Base];
        for &bone in &ALL_BONES {
            let q = base[bone];
            match bone {
                Bone::ClavicleL | Bone::ClavicleR => assert!(q.s < 1.0),
                _ => assert_eq!(q, Quaternion::new(1.0, 0.0, 0.0, 0.0)),
            }
        }
    }

    #[test]
    fn validation_rejects_degenerate_rotations() {
        let mut poses = ALL_POSES.iter().map(|_| Pose::rest());
        let mut table = [
            poses.next().unwrap(), poses.next().unwrap(), poses.next().unwrap(),
            poses.next().unwrap(), poses.next().unwrap(), poses.next().unwrap(),
            poses.next().unwrap(), poses.next().unwrap(), poses.next().unwrap(),
            poses.next().unwrap(), poses.next().unwrap(),
        ];
        table[PoseId::Walk3.index()] = Pose::from_overrides(&[
            (Bone::Neck, Quaternion::from_sv(0.0, Vector3::zero())),
        ]);
        match PoseLibrary::new(table) {
            Err(LibraryError::NotUnit(pose, bone, _)) => {
                assert_eq!(pose, PoseId::Walk3);
                assert_eq!(bone, Bone::Neck);
            }
            other => panic!("unexpected validation result: {:?}", other),
        }
    }

    #[test]
    fn construction_results_format_for_diagnostics() {
        // Both sides of the Result must be printable in test failures.
        let table = [
            Pose::rest(), Pose::rest(), Pose::rest(), Pose::rest(),
            Pose::rest(), Pose::rest(), Pose::rest(), Pose::rest(),
            Pose::rest(), Pose::rest(), Pose::rest(),
        ];
        let built: Result<PoseLibrary, LibraryError> = PoseLibrary::new(table);
        assert!(format!("{:?}", built).contains("poses"));
    }

    #[test]
    fn pose_names_match_the_library_order() {
        assert_eq!(PoseId::Walk1.name(), "walk_1");
        assert_eq!(PoseId::Greet4.name(), "greet_4");
        for (i, &id) in ALL_POSES.iter().enumerate() {
            assert_eq!(id.index(), i);
        }
    }
}
