use std::time::Duration;

use glam::DMat4;
use skin_asset::{index::NodeId, mesh::MeshAsset};

/// Access to the transforms of a scene graph at a point in time.
///
/// Implemented by [`AnimatedScene`](crate::animation::AnimatedScene), and by
/// anything else able to pose a node hierarchy.
pub trait SceneEvaluator {
    /// World transform of `node` at `time`, without the node's geometric offset.
    fn global_transform(&self, node: NodeId, time: Duration) -> DMat4;

    /// Geometric offset of `node`, applied to its own geometry only.
    fn geometric_offset(&self, _node: NodeId) -> DMat4 {
        DMat4::IDENTITY
    }
}

impl<T: SceneEvaluator + ?Sized> SceneEvaluator for &T {
    fn global_transform(&self, node: NodeId, time: Duration) -> DMat4 {
        (**self).global_transform(node, time)
    }

    fn geometric_offset(&self, node: NodeId) -> DMat4 {
        (**self).geometric_offset(node)
    }
}

/// A mesh posed at its owning node for one frame.
#[derive(Debug, Clone, Copy)]
pub struct SkinnedMesh<'a> {
    pub node: NodeId,
    pub mesh: &'a MeshAsset,
    /// Current global transform of the owning node, geometric offset included.
    pub global_transform: DMat4,
}

impl<'a> SkinnedMesh<'a> {
    /// Pose `mesh` at `node` for `time`, the way the scene walk does.
    pub fn evaluate(
        evaluator: &impl SceneEvaluator,
        node: NodeId,
        mesh: &'a MeshAsset,
        time: Duration,
    ) -> Self {
        let global_transform =
            evaluator.global_transform(node, time) * evaluator.geometric_offset(node);
        Self {
            node,
            mesh,
            global_transform,
        }
    }
}
