//! Selection of the deformation strategy for one mesh.

use std::time::Duration;

use glam::DVec3;
use log::{debug, warn};
use skin_asset::skin::SkinningType;

use crate::{
    blend::compute_linear_deformation,
    error::{ConflictingDeformer, DeformError, DeformResult},
    evaluator::{SceneEvaluator, SkinnedMesh},
    options::{DeformOptions, UnsupportedSkinningPolicy},
};

/// What [`deform_mesh`] did with the positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deformation {
    /// Blended by the mesh's skin clusters.
    Skinned,
    /// Left untouched; an active vertex cache supplies this frame's positions.
    VertexCache,
    /// Left untouched; nothing deforms this mesh.
    Unchanged,
    /// Left untouched; no blender exists for this skinning type.
    Unsupported(SkinningType),
}

/// Deform `positions`, the bind-pose control points of `target`, to their
/// pose at `time`.
pub fn deform_mesh(
    evaluator: &impl SceneEvaluator,
    target: &SkinnedMesh,
    time: Duration,
    options: &DeformOptions,
    positions: &mut [DVec3],
) -> DeformResult<Deformation> {
    let mesh = target.mesh;
    let has_skins = !mesh.skins.is_empty();
    let has_shapes = !mesh.shapes.is_empty();

    if mesh.has_active_vertex_cache() {
        if has_skins || has_shapes {
            return Err(ConflictingDeformer::VertexCacheWithOtherDeformers.into());
        }
        debug!("Mesh {} is driven by its vertex cache", target.node);
        return Ok(Deformation::VertexCache);
    }
    if has_shapes {
        if has_skins {
            return Err(ConflictingDeformer::ShapesWithSkin.into());
        }
        warn!(
            "Mesh {} has {} shapes, which are not evaluated",
            target.node,
            mesh.shapes.len()
        );
        return Ok(Deformation::Unchanged);
    }

    let Some(first_skin) = mesh.skins.first() else {
        return Ok(Deformation::Unchanged);
    };
    if mesh.cluster_count() == 0 {
        return Ok(Deformation::Unchanged);
    }

    match first_skin.skinning_type {
        skinning_type if skinning_type.is_linear() => {
            compute_linear_deformation(evaluator, target, time, options, positions)?;
            Ok(Deformation::Skinned)
        }
        skinning_type => match options.unsupported_skinning {
            UnsupportedSkinningPolicy::Error => {
                Err(DeformError::UnsupportedSkinningType(skinning_type))
            }
            UnsupportedSkinningPolicy::Warn => {
                warn!(
                    "Skinning type {:?} of mesh {} is not supported, keeping bind pose",
                    skinning_type, target.node
                );
                Ok(Deformation::Unsupported(skinning_type))
            }
            UnsupportedSkinningPolicy::Ignore => Ok(Deformation::Unsupported(skinning_type)),
        },
    }
}

/// Copy the bind-pose control points of `target` and deform the copy.
pub fn deformed_positions(
    evaluator: &impl SceneEvaluator,
    target: &SkinnedMesh,
    time: Duration,
    options: &DeformOptions,
) -> DeformResult<(Deformation, Vec<DVec3>)> {
    let mut positions = target.mesh.control_points.clone();
    let deformation = deform_mesh(evaluator, target, time, options, &mut positions)?;
    Ok((deformation, positions))
}
