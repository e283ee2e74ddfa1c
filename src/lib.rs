//! Quaternion-based skeletal figure animation.
//!
//! ## Introduction
//!
//! `manikin` animates a fixed 20-bone humanoid rig from a small library
//! of hand-authored poses. It is built around four pieces, namely the
//! pose library, the blender, the [`Sequencer`], and the hierarchy
//! resolver.
//!
//! ### Pose library
//!
//! A [`Pose`] assigns one unit quaternion to every [`Bone`]. The standard
//! [`PoseLibrary`] carries a rest pose, four walk-cycle keyframes and
//! five greeting keyframes; custom libraries are validated at
//! construction and immutable afterwards.
//!
//! ### Blender
//!
//! [`blend`] interpolates every bone between two rotation sources by
//! shortest-arc spherical interpolation. A source is either a named pose
//! or a [`Snapshot`] of in-flight rotations, so a blend can pick up
//! wherever an interrupted cycle left off.
//!
//! ### Sequencer
//!
//! The [`Sequencer`] is a four-state machine driving a scripted
//! walk-greet-walk routine: it counts completed cycles, picks the next
//! pose pair and blend duration from static transition tables, and snaps
//! a rotation snapshot whenever a cycle limit hands one phase over to the
//! other.
//!
//! ### Resolver
//!
//! [`resolve`] walks the bone hierarchy in fixed parent-to-child order
//! and emits one world transform (plus a display color) per bone for an
//! external renderer to draw.
//!
//! ## Walkthrough
//!
//! Create a [`Figure`] and drive it from your frame loop:
//!
//! ```rust
//! let mut figure = manikin::Figure::new();
//!
//! // Once per frame: advance and blend, then resolve for drawing.
//! let root = [
//!     [1.0, 0.0, 0.0, 0.0],
//!     [0.0, 1.0, 0.0, 0.0],
//!     [0.0, 0.0, 1.0, 0.0],
//!     [0.0, 0.0, 0.0, 1.0f32],
//! ];
//! figure.update(1.0 / 60.0);
//! for instance in figure.resolve(root) {
//!     // hand instance.world and instance.color to the renderer
//! }
//! println!("{}", figure.state_str());
//! ```
//!
//! [`Bone`]: enum.Bone.html
//! [`Pose`]: struct.Pose.html
//! [`PoseLibrary`]: struct.PoseLibrary.html
//! [`Snapshot`]: struct.Snapshot.html
//! [`Sequencer`]: struct.Sequencer.html
//! [`Figure`]: struct.Figure.html
//! [`blend`]: fn.blend.html
//! [`resolve`]: fn.resolve.html
#![warn(missing_docs)]

extern crate arrayvec;
extern crate cgmath;
#[macro_use]
extern crate log;
extern crate mint;
#[macro_use]
extern crate quick_error;
#[cfg(test)]
extern crate rand;

mod blend;
mod bone;
mod figure;
mod pose;
mod rig;
mod sequencer;
mod skeleton;

pub mod color;

pub use blend::{blend, slerp, BlendSource};
pub use bone::{standard_lengths, Bone, BoneMap, BoneMapIter, ALL_BONES, BONE_COUNT};
pub use color::Color;
pub use figure::Figure;
pub use pose::{LibraryError, Pose, PoseId, PoseLibrary, Snapshot, ALL_POSES, POSE_COUNT};
pub use rig::{resolve, BoneInstance};
pub use sequencer::{CycleLimits, Sequencer, State};
pub use skeleton::Skeleton;

/// Rotation of a single bone.
pub type Orientation = cgmath::Quaternion<f32>;
