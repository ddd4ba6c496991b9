use glam::DMat4;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::index::NodeId;

/// How the contribution of a cluster combines with the other clusters of a mesh.
///
/// `Normalize` and `TotalOne` sum weighted transforms and differ only in how
/// the sum is finalized. `Additive` composes the weighted transforms by
/// multiplication, in cluster order.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum LinkMode {
    /// Every influenced point is fully bone driven; the sum is divided by the total weight.
    #[default]
    Normalize,
    /// The uncovered weight fraction keeps the bind-pose position.
    TotalOne,
    Additive,
}

impl LinkMode {
    pub fn is_additive(self) -> bool {
        self == LinkMode::Additive
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SkinningType {
    Rigid,
    #[default]
    Linear,
    DualQuaternion,
    Blend,
}

impl SkinningType {
    pub fn is_linear(self) -> bool {
        matches!(self, SkinningType::Rigid | SkinningType::Linear)
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlPointWeight {
    pub index: usize,
    pub weight: f64,
}

impl From<(usize, f64)> for ControlPointWeight {
    fn from((index, weight): (usize, f64)) -> Self {
        Self { index, weight }
    }
}

/// Secondary driver of an additive cluster.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct AssociateModel {
    pub node: NodeId,
    /// Global transform of the associate model at bind time.
    pub transform: DMat4,
}

/// Binding of one skeleton node to a subset of the control points of a mesh.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone)]
pub struct ClusterAsset {
    pub name: Option<String>,
    pub link: Option<NodeId>,
    pub link_mode: LinkMode,
    /// Global transform of the bound geometry at bind time.
    pub transform: DMat4,
    /// Global transform of the link node at bind time.
    pub transform_link: DMat4,
    pub associate: Option<AssociateModel>,
    pub weights: Vec<ControlPointWeight>,
}

impl ClusterAsset {
    pub fn new(link: NodeId, link_mode: LinkMode) -> Self {
        Self {
            name: None,
            link: Some(link),
            link_mode,
            transform: DMat4::IDENTITY,
            transform_link: DMat4::IDENTITY,
            associate: None,
            weights: Vec::new(),
        }
    }

    pub fn with_weights(mut self, weights: impl IntoIterator<Item = (usize, f64)>) -> Self {
        self.weights = weights.into_iter().map(Into::into).collect();
        self
    }

    pub fn label(&self) -> String {
        match (&self.name, self.link) {
            (Some(name), _) => name.clone(),
            (None, Some(link)) => format!("cluster of {}", link),
            (None, None) => String::from("unlinked cluster"),
        }
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Default)]
pub struct SkinAsset {
    pub name: Option<String>,
    pub skinning_type: SkinningType,
    pub clusters: Vec<ClusterAsset>,
}
