//! Synthetic scenes for unit tests.

use std::{collections::HashMap, time::Duration};

use glam::{DMat4, DVec3};
use skin_asset::{
    index::NodeId,
    mesh::MeshAsset,
    skin::{ClusterAsset, LinkMode, SkinAsset, SkinningType},
};

use crate::evaluator::SceneEvaluator;

pub const MESH: NodeId = NodeId(0);

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Scene whose nodes hold one fixed global transform each; unknown nodes are at identity.
#[derive(Debug, Default)]
pub struct StaticScene {
    globals: HashMap<NodeId, DMat4>,
    offsets: HashMap<NodeId, DMat4>,
}

impl StaticScene {
    pub fn with_global(mut self, node: NodeId, transform: DMat4) -> Self {
        self.globals.insert(node, transform);
        self
    }

    pub fn with_offset(mut self, node: NodeId, transform: DMat4) -> Self {
        self.offsets.insert(node, transform);
        self
    }
}

impl SceneEvaluator for StaticScene {
    fn global_transform(&self, node: NodeId, _time: Duration) -> DMat4 {
        self.globals.get(&node).copied().unwrap_or(DMat4::IDENTITY)
    }

    fn geometric_offset(&self, node: NodeId) -> DMat4 {
        self.offsets.get(&node).copied().unwrap_or(DMat4::IDENTITY)
    }
}

/// Scene driven by a closure over node and time.
pub struct FnScene<F>(pub F);

impl<F: Fn(NodeId, Duration) -> DMat4> SceneEvaluator for FnScene<F> {
    fn global_transform(&self, node: NodeId, time: Duration) -> DMat4 {
        (self.0)(node, time)
    }
}

pub fn translation(x: f64, y: f64, z: f64) -> DMat4 {
    DMat4::from_translation(DVec3::new(x, y, z))
}

pub fn cluster(link: usize, link_mode: LinkMode, weights: &[(usize, f64)]) -> ClusterAsset {
    ClusterAsset::new(NodeId(link), link_mode).with_weights(weights.iter().copied())
}

pub fn skinned_mesh(control_points: Vec<DVec3>, clusters: Vec<ClusterAsset>) -> MeshAsset {
    MeshAsset {
        control_points,
        skins: vec![SkinAsset {
            name: None,
            skinning_type: SkinningType::Linear,
            clusters,
        }],
        ..Default::default()
    }
}
