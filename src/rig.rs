//! The skeleton-to-transform resolver.
//!
//! Walks the bone hierarchy in a fixed parent-to-child order and composes
//! each bone's local rotation, its attachment offset and its draw scale
//! into one world transform per bone. The output is handed to an external
//! renderer together with the cosmetic bone color; the resolver never
//! mutates the skeleton.
//!
//! A renderer consumes each instance by drawing a unit cube spanning
//! `y in [0, 1]`, `x, z in [-0.5, 0.5]` under the instance transform.

use arrayvec::ArrayVec;
use cgmath::{Matrix4, Vector3};
use mint;

use bone::{Bone, BONE_COUNT};
use color::{bone_color, Color};
use skeleton::Skeleton;

/// World-space placement of one bone, ready for drawing.
#[derive(Clone, Debug)]
pub struct BoneInstance {
    /// The bone this transform places.
    pub bone: Bone,
    /// Draw transform: hierarchy frame times the non-uniform scale that
    /// stretches a unit cube to the bone's length and girth.
    pub world: mint::ColumnMatrix4<f32>,
    /// Cosmetic display color.
    pub color: Color,
}

/// Lateral draw scale of a bone; the torso segments are drawn full
/// width, the limbs and neck at half width.
fn girth(bone: Bone) -> f32 {
    match bone {
        Bone::Pelvis | Bone::Spine | Bone::Head => 1.0,
        _ => 0.5,
    }
}

/// Torso and arm chaining: translate to the attachment point first, then
/// apply the bone's rotation, so the bone pivots about its own base.
fn attach(
    parent: &Matrix4<f32>,
    offset: Vector3<f32>,
    skeleton: &Skeleton,
    bone: Bone,
) -> Matrix4<f32> {
    parent * Matrix4::from_translation(offset) * Matrix4::from(skeleton.rotation(bone))
}

/// Leg chaining: rotate first and translate the segment downward
/// afterwards, so a leg bone swings about its parent's end and hangs
/// below it.
fn hang(
    parent: &Matrix4<f32>,
    skeleton: &Skeleton,
    bone: Bone,
    offset: Vector3<f32>,
) -> Matrix4<f32> {
    parent * Matrix4::from(skeleton.rotation(bone)) * Matrix4::from_translation(offset)
}

/// Resolves the skeleton's current rotations into one world transform per
/// bone under the given root (model) transform.
///
/// Traversal order is fixed and parents always precede children; the
/// returned instances follow [`ALL_BONES`] order exactly.
///
/// [`ALL_BONES`]: constant.ALL_BONES.html
pub fn resolve(
    skeleton: &Skeleton,
    root: mint::ColumnMatrix4<f32>,
) -> ArrayVec<[BoneInstance; BONE_COUNT]> {
    let columns: [[f32; 4]; 4] = root.into();
    let root = Matrix4::from(columns);
    let mut out = ArrayVec::new();

    {
        let mut emit = |bone: Bone, frame: &Matrix4<f32>| {
            let scale =
                Matrix4::from_nonuniform_scale(girth(bone), skeleton.length(bone), girth(bone));
            let world: [[f32; 4]; 4] = (frame * scale).into();
            out.push(BoneInstance {
                bone,
                world: world.into(),
                color: bone_color(bone),
            });
        };
        let len = |bone: Bone| skeleton.length(bone);
        let up = |bone: Bone| Vector3::new(0.0, len(bone), 0.0);

        // Torso column.
        let pelvis = root * Matrix4::from(skeleton.rotation(Bone::Pelvis));
        emit(Bone::Pelvis, &pelvis);
        let spine = attach(&pelvis, up(Bone::Pelvis), skeleton, Bone::Spine);
        emit(Bone::Spine, &spine);
        let neck = attach(&spine, up(Bone::Spine), skeleton, Bone::Neck);
        emit(Bone::Neck, &neck);
        let head = attach(&neck, up(Bone::Neck), skeleton, Bone::Head);
        emit(Bone::Head, &head);

        // Arms. Both the clavicle and the upper arm chain off the spine
        // frame: the clavicle's rotation does not carry into the arm, the
        // arm only inherits the clavicle's length as a lateral offset.
        let shoulder_l = Vector3::new(0.5, len(Bone::Spine), 0.0);
        let clavicle_l = attach(&spine, shoulder_l, skeleton, Bone::ClavicleL);
        emit(Bone::ClavicleL, &clavicle_l);
        let upper_arm_l = attach(
            &spine,
            shoulder_l + Vector3::new(len(Bone::ClavicleL), 0.0, 0.0),
            skeleton,
            Bone::UpperArmL,
        );
        emit(Bone::UpperArmL, &upper_arm_l);
        let forearm_l = attach(&upper_arm_l, up(Bone::UpperArmL), skeleton, Bone::ForearmL);
        emit(Bone::ForearmL, &forearm_l);
        let hand_l = attach(&forearm_l, up(Bone::ForearmL), skeleton, Bone::HandL);
        emit(Bone::HandL, &hand_l);

        let shoulder_r = Vector3::new(-0.5, len(Bone::Spine), 0.0);
        let clavicle_r = attach(&spine, shoulder_r, skeleton, Bone::ClavicleR);
        emit(Bone::ClavicleR, &clavicle_r);
        let upper_arm_r = attach(
            &spine,
            shoulder_r + Vector3::new(-len(Bone::ClavicleR), 0.0, 0.0),
            skeleton,
            Bone::UpperArmR,
        );
        emit(Bone::UpperArmR, &upper_arm_r);
        let forearm_r = attach(&upper_arm_r, up(Bone::UpperArmR), skeleton, Bone::ForearmR);
        emit(Bone::ForearmR, &forearm_r);
        let hand_r = attach(&forearm_r, up(Bone::ForearmR), skeleton, Bone::HandR);
        emit(Bone::HandR, &hand_r);

        // Legs hang off the pelvis frame.
        let drop = |bone: Bone| Vector3::new(0.0, -len(bone), 0.0);

        let hip_l = Vector3::new(0.5, -len(Bone::ThighL), 0.0);
        let thigh_l = hang(&pelvis, skeleton, Bone::ThighL, hip_l);
        emit(Bone::ThighL, &thigh_l);
        let calf_l = hang(&thigh_l, skeleton, Bone::CalfL, drop(Bone::CalfL));
        emit(Bone::CalfL, &calf_l);
        let foot_l = hang(&calf_l, skeleton, Bone::FootL, drop(Bone::FootL));
        emit(Bone::FootL, &foot_l);
        let toe_l = hang(&foot_l, skeleton, Bone::ToeL, drop(Bone::ToeL));
        emit(Bone::ToeL, &toe_l);

        let hip_r = Vector3::new(-0.5, -len(Bone::ThighR), 0.0);
        let thigh_r = hang(&pelvis, skeleton, Bone::ThighR, hip_r);
        emit(Bone::ThighR, &thigh_r);
        let calf_r = hang(&thigh_r, skeleton, Bone::CalfR, drop(Bone::CalfR));
        emit(Bone::CalfR, &calf_r);
        let foot_r = hang(&calf_r, skeleton, Bone::FootR, drop(Bone::FootR));
        emit(Bone::FootR, &foot_r);
        let toe_r = hang(&foot_r, skeleton, Bone::ToeR, drop(Bone::ToeR));
        emit(Bone::ToeR, &toe_r);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use bone::ALL_BONES;
    use cgmath::SquareMatrix;
    use pose::{Pose, PoseLibrary};

    fn identity_root() -> mint::ColumnMatrix4<f32> {
        let columns: [[f32; 4]; 4] = Matrix4::identity().into();
        columns.into()
    }

    fn translation(instance: &BoneInstance) -> Vector3<f32> {
        let columns: [[f32; 4]; 4] = instance.world.into();
        Matrix4::from(columns).w.truncate()
    }

    fn find(instances: &[BoneInstance], bone: Bone) -> Vector3<f32> {
        translation(&instances[bone.index()])
    }

    #[test]
    fn output_follows_hierarchy_order() {
        let library = PoseLibrary::standard();
        let skeleton = Skeleton::new(&library);
        let instances = resolve(&skeleton, identity_root());
        assert_eq!(instances.len(), BONE_COUNT);
        for (instance, &bone) in instances.iter().zip(ALL_BONES.iter()) {
            assert_eq!(instance.bone, bone);
            assert_eq!(instance.color, bone_color(bone));
        }
    }

    #[test]
    fn torso_column_climbs_by_parent_lengths() {
        let library = PoseLibrary::standard();
        let mut skeleton = Skeleton::new(&library);
        skeleton.set_pose(&Pose::rest());
        let instances = resolve(&skeleton, identity_root());

        let pelvis = find(&instances, Bone::Pelvis);
        let spine = find(&instances, Bone::Spine);
        let neck = find(&instances, Bone::Neck);
        let head = find(&instances, Bone::Head);

        assert_eq!(pelvis.y, 0.0);
        assert_eq!(spine.y - pelvis.y, skeleton.length(Bone::Pelvis));
        assert_eq!(neck.y - spine.y, skeleton.length(Bone::Spine));
        assert_eq!(head.y - neck.y, skeleton.length(Bone::Neck));
        assert!(pelvis.y < spine.y && spine.y < neck.y && neck.y < head.y);
    }

    #[test]
    fn legs_hang_below_the_pelvis() {
        let library = PoseLibrary::standard();
        let mut skeleton = Skeleton::new(&library);
        skeleton.set_pose(&Pose::rest());
        let instances = resolve(&skeleton, identity_root());

        let thigh = find(&instances, Bone::ThighL);
        assert_eq!(thigh, Vector3::new(0.5, -skeleton.length(Bone::ThighL), 0.0));
        let calf = find(&instances, Bone::CalfL);
        assert_eq!(calf.y, thigh.y - skeleton.length(Bone::CalfL));
        let toe = find(&instances, Bone::ToeR);
        assert_eq!(
            toe,
            Vector3::new(
                -0.5,
                -(skeleton.length(Bone::ThighR)
                    + skeleton.length(Bone::CalfR)
                    + skeleton.length(Bone::FootR)
                    + skeleton.length(Bone::ToeR)),
                0.0,
            )
        );
    }

    #[test]
    fn clavicle_rotation_does_not_reach_the_arm() {
        // In the base pose the clavicles are turned 90 degrees, yet the
        // upper arms attach at the same point as in the rest pose.
        let library = PoseLibrary::standard();
        let skeleton = Skeleton::new(&library);
        let instances = resolve(&skeleton, identity_root());
        let upper_arm_l = find(&instances, Bone::UpperArmL);
        assert_eq!(
            upper_arm_l,
            Vector3::new(0.5 + skeleton.length(Bone::ClavicleL), skeleton.length(Bone::Pelvis) + skeleton.length(Bone::Spine), 0.0)
        );
    }

    #[test]
    fn root_transform_carries_through() {
        let library = PoseLibrary::standard();
        let mut skeleton = Skeleton::new(&library);
        skeleton.set_pose(&Pose::rest());
        let columns: [[f32; 4]; 4] =
            Matrix4::from_translation(Vector3::new(2.0, 10.0, -1.0)).into();
        let instances = resolve(&skeleton, columns.into());
        assert_eq!(find(&instances, Bone::Pelvis), Vector3::new(2.0, 10.0, -1.0));
        assert_eq!(
            find(&instances, Bone::Spine),
            Vector3::new(2.0, 10.0 + skeleton.length(Bone::Pelvis), -1.0)
        );
    }
}
