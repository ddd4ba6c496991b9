#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::index::NodeId;

use super::{animation::AnimationAsset, node::NodeAsset};

pub const DEFAULT_FRAME_RATE: f64 = 30.0;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone)]
pub struct SceneAsset {
    pub name: Option<String>,
    pub nodes: Vec<NodeAsset>,
    pub animations: Vec<AnimationAsset>,
    /// Frames per second of the scene time mode.
    pub frame_rate: f64,
}

impl Default for SceneAsset {
    fn default() -> Self {
        Self {
            name: None,
            nodes: Vec::new(),
            animations: Vec::new(),
            frame_rate: DEFAULT_FRAME_RATE,
        }
    }
}

impl SceneAsset {
    pub fn find_node(&self, id: NodeId) -> Option<&NodeAsset> {
        let mut found = None;
        for root in &self.nodes {
            root.walk(&mut |node, _| {
                if found.is_none() && node.id == id {
                    found = Some(node);
                }
            });
            if found.is_some() {
                break;
            }
        }
        found
    }
}
