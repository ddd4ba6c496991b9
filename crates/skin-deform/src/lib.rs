//! Deform skinned meshes of a scene over time.
//!
//! The core takes the bind-pose control points of a mesh together with the
//! skin clusters binding them to skeleton nodes, and blends the per-cluster
//! bind-to-current transforms into the posed positions. Node transforms are
//! read through [`SceneEvaluator`], so any scene graph able to pose its nodes
//! at a point in time can drive it. [`AnimatedScene`] does so for the
//! keyframed animations of a `skin-asset` scene.
//!
//! Around the core, [`SceneDeformer`] walks a whole scene once per frame and
//! expands each deformed mesh into renderer facing vertices, and
//! [`FrameClock`] steps animation time.
//!
pub mod animation;
pub mod blend;
pub mod clock;
pub mod cluster;
pub mod dispatch;
pub mod error;
pub mod evaluator;
/// Matrix helpers used by the blender
pub mod matrix;
pub mod options;
pub mod scene;
pub mod vertex;

#[cfg(test)]
mod fixture;

pub use animation::AnimatedScene;
pub use clock::{FrameClock, PlaybackMode};
pub use dispatch::{deform_mesh, deformed_positions, Deformation};
pub use error::{DeformError, DeformResult};
pub use evaluator::{SceneEvaluator, SkinnedMesh};
pub use options::{DeformOptions, UnsupportedSkinningPolicy};
pub use scene::{MeshFrame, MeshFrameResult, SceneDeformer};
