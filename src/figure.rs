//! The assembled animated figure.

use arrayvec::ArrayVec;
use mint;

use bone::BONE_COUNT;
use pose::PoseLibrary;
use rig::{self, BoneInstance};
use sequencer::{CycleLimits, Sequencer, State};
use skeleton::Skeleton;

/// A walking, greeting humanoid figure.
///
/// Owns the pose library, the skeleton instance and the sequencer as
/// plain values; there is no global state. Drive it with [`update`] once
/// per frame, then hand the result of [`resolve`] to a renderer. Within a
/// frame, time advance happens before blending and blending before
/// resolution — `update` performs the first two in order, `resolve` reads
/// what they wrote.
///
/// [`update`]: #method.update
/// [`resolve`]: #method.resolve
pub struct Figure {
    library: PoseLibrary,
    skeleton: Skeleton,
    sequencer: Sequencer,
}

impl Figure {
    /// Creates the standard figure: standard poses and lengths, two walk
    /// cycles and two greeting waves per phase.
    pub fn new() -> Self {
        Figure::with_limits(CycleLimits::default())
    }

    /// Creates the standard figure with custom cycle limits.
    pub fn with_limits(limits: CycleLimits) -> Self {
        Figure::with_library(PoseLibrary::standard(), limits)
    }

    /// Creates a figure around a custom pose library.
    pub fn with_library(
        library: PoseLibrary,
        limits: CycleLimits,
    ) -> Self {
        let skeleton = Skeleton::new(&library);
        Figure {
            library,
            skeleton,
            sequencer: Sequencer::new(limits),
        }
    }

    /// Advances the animation by `dt` seconds and blends the resulting
    /// rotations into the skeleton.
    pub fn update(&mut self, dt: f32) {
        self.sequencer.advance(dt, &mut self.skeleton, &self.library);
    }

    /// Resolves the current rotations into world transforms under the
    /// given root (model) transform, one instance per bone.
    pub fn resolve<M>(
        &self,
        root: M,
    ) -> ArrayVec<[BoneInstance; BONE_COUNT]>
    where
        M: Into<mint::ColumnMatrix4<f32>>,
    {
        rig::resolve(&self.skeleton, root.into())
    }

    /// The skeleton instance.
    pub fn skeleton(&self) -> &Skeleton {
        &self.skeleton
    }

    /// Mutable access to the skeleton, for posing the figure directly.
    pub fn skeleton_mut(&mut self) -> &mut Skeleton {
        &mut self.skeleton
    }

    /// The pose library.
    pub fn library(&self) -> &PoseLibrary {
        &self.library
    }

    /// The sequencer.
    pub fn sequencer(&self) -> &Sequencer {
        &self.sequencer
    }

    /// Current discrete animation state.
    pub fn state(&self) -> State {
        self.sequencer.state()
    }

    /// Display name of the current state, for debug overlays.
    pub fn state_str(&self) -> &'static str {
        self.sequencer.state_str()
    }
}

impl Default for Figure {
    fn default() -> Self {
        Figure::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{Matrix4, SquareMatrix};

    #[test]
    fn a_frame_updates_and_resolves() {
        let mut figure = Figure::new();
        figure.update(0.1);
        let root: [[f32; 4]; 4] = Matrix4::identity().into();
        let instances = figure.resolve(root);
        assert_eq!(instances.len(), BONE_COUNT);
        assert_eq!(figure.state(), State::Walking);
    }
}
