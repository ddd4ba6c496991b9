//! Provide scene data for skeletal deformation.
//!
//! This library holds the node hierarchy, meshes, skin deformers and
//! animation keyframes of an imported scene. Everything here is populated
//! once by an importer and treated as read-only afterwards; evaluating it
//! over time is the job of `skin-deform`.
//!
pub mod animation;
pub mod index;
pub mod mesh;
pub mod node;
pub mod scene;
pub mod skin;
