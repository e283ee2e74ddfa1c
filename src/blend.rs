//! Pose blending by spherical linear interpolation.
//!
//! The blender is a pure function over its inputs: two rotation sources
//! and a normalized blend factor in, one rotation per bone out. It keeps
//! no state and does not clamp the factor; callers advance it by
//! `dt / duration` per tick and reset it when it wraps.
//!
//! Linear mixing of quaternions does not stay on the unit sphere, so only
//! spherical interpolation is offered; every blended rotation is a unit
//! quaternion again.

use cgmath::{InnerSpace, Quaternion};

use bone::{BoneMap, ALL_BONES};
use pose::{Pose, Snapshot};

/// A rotation source for blending: either a named pose or a snapshot of
/// in-flight rotations captured at a state-transition boundary.
#[derive(Clone, Copy, Debug)]
pub enum BlendSource<'a> {
    /// Blend out of a pose from the library.
    Pose(&'a Pose),
    /// Blend out of captured in-flight rotations.
    Snapshot(&'a Snapshot),
}

impl<'a> BlendSource<'a> {
    fn rotations(&self) -> &'a BoneMap<Quaternion<f32>> {
        match *self {
            BlendSource::Pose(pose) => pose.rotations(),
            BlendSource::Snapshot(snapshot) => &snapshot.rotations,
        }
    }
}

/// Shortest-arc spherical interpolation between two unit quaternions.
///
/// `cgmath`'s `slerp` interpolates the operands as given; since q and -q
/// encode the same rotation, a negative dot product means the raw arc is
/// the long way around and the destination must be flipped first.
pub fn slerp(
    a: Quaternion<f32>,
    b: Quaternion<f32>,
    t: f32,
) -> Quaternion<f32> {
    let b = if a.dot(b) < 0.0 { -b } else { b };
    a.slerp(b, t)
}

/// Blends every bone of `from` toward `to` by factor `t`, writing the
/// result into `out`.
///
/// `t` outside `[0, 1]` indicates a bug in the caller's frame-time
/// integration and trips a debug assertion rather than being clamped.
pub fn blend(
    from: BlendSource,
    to: &Pose,
    t: f32,
    out: &mut BoneMap<Quaternion<f32>>,
) {
    debug_assert!(
        t >= 0.0 && t <= 1.0,
        "blend factor {} escaped [0, 1]", t
    );
    let source = from.rotations();
    for &bone in &ALL_BONES {
        out[bone] = slerp(source[bone], to[bone], t);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bone::Bone;
    use cgmath::{Deg, One, Rotation3};
    use pose::{PoseId, PoseLibrary};
    use rand::{self, Rng};

    fn close(a: Quaternion<f32>, b: Quaternion<f32>) -> bool {
        // q and -q are the same rotation.
        (a.dot(b)).abs() > 1.0 - 1.0e-5
    }

    #[test]
    fn boundaries_reproduce_the_operands() {
        let a = Quaternion::from_angle_x(Deg(40.0));
        let b = Quaternion::from_angle_z(Deg(-70.0));
        assert!(close(slerp(a, b, 0.0), a));
        assert!(close(slerp(a, b, 1.0), b));
    }

    #[test]
    fn zero_distance_is_idempotent() {
        let a = Quaternion::from_angle_y(Deg(25.0));
        let mut rng = rand::thread_rng();
        for _ in 0..64 {
            let t = rng.gen::<f32>();
            assert!(close(slerp(a, a, t), a));
        }
    }

    #[test]
    fn interpolation_stays_unit() {
        let a = Quaternion::from_angle_x(Deg(170.0));
        let b = Quaternion::from_angle_z(Deg(10.0)) * Quaternion::from_angle_x(Deg(-120.0));
        let mut rng = rand::thread_rng();
        for _ in 0..64 {
            let t = rng.gen::<f32>();
            let q = slerp(a, b, t);
            assert!((q.magnitude() - 1.0).abs() < 1.0e-4);
        }
    }

    #[test]
    fn antipodal_operands_take_the_short_arc() {
        // 170 and -170 degrees about Z are 20 degrees apart through 180,
        // 340 degrees apart through zero.
        let a = Quaternion::from_angle_z(Deg(170.0));
        let b = Quaternion::from_angle_z(Deg(-170.0));
        let mid = slerp(a, b, 0.5);
        let expected = Quaternion::from_angle_z(Deg(180.0));
        assert!(close(mid, expected));
    }

    #[test]
    fn blending_covers_every_bone() {
        let library = PoseLibrary::standard();
        let mut out = BoneMap::filled(Quaternion::one());
        blend(
            BlendSource::Pose(&library[PoseId::Walk1]),
            &library[PoseId::Walk3],
            0.5,
            &mut out,
        );
        // walk_1 and walk_3 mirror each other; halfway the swinging limbs
        // pass through the rest rotation while the feet stay flexed.
        assert!(close(out[Bone::ThighL], Quaternion::one()));
        assert!(close(out[Bone::ThighR], Quaternion::one()));
        assert!(close(out[Bone::FootL], Quaternion::from_angle_x(Deg(-90.0))));
    }
}
