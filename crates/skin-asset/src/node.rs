use glam::{DMat4, DQuat, DVec3, EulerRot};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::index::NodeId;

use super::mesh::MeshAsset;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct MatrixNodeTransform(pub DMat4);

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct DecomposedTransform {
    pub translation: DVec3,
    pub rotation: DQuat,
    pub scale: DVec3,
}

impl Default for DecomposedTransform {
    fn default() -> Self {
        Self {
            translation: DVec3::ZERO,
            rotation: DQuat::IDENTITY,
            scale: DVec3::ONE,
        }
    }
}

impl DecomposedTransform {
    /// Build a transform from euler angles in degrees, applied X first, then Y, then Z.
    pub fn from_euler_degrees(translation: DVec3, rotation: DVec3, scale: DVec3) -> Self {
        let rotation = DQuat::from_euler(
            EulerRot::ZYX,
            rotation.z.to_radians(),
            rotation.y.to_radians(),
            rotation.x.to_radians(),
        );
        Self {
            translation,
            rotation,
            scale,
        }
    }

    pub fn is_identity(&self) -> bool {
        self.translation == DVec3::ZERO
            && self.rotation == DQuat::IDENTITY
            && self.scale == DVec3::ONE
    }

    pub fn matrix(&self) -> DMat4 {
        self.clone().into()
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub enum NodeTransform {
    Matrix(MatrixNodeTransform),
    Decomposed(DecomposedTransform),
}

impl Default for NodeTransform {
    fn default() -> Self {
        Self::Decomposed(DecomposedTransform::default())
    }
}

impl From<MatrixNodeTransform> for DMat4 {
    fn from(value: MatrixNodeTransform) -> Self {
        value.0
    }
}

impl From<DecomposedTransform> for DMat4 {
    fn from(value: DecomposedTransform) -> Self {
        DMat4::from_translation(value.translation)
            * DMat4::from_quat(value.rotation)
            * DMat4::from_scale(value.scale)
    }
}

impl From<NodeTransform> for DMat4 {
    fn from(value: NodeTransform) -> Self {
        match value {
            NodeTransform::Matrix(matrix) => matrix.0,
            NodeTransform::Decomposed(decomposed) => decomposed.into(),
        }
    }
}

impl From<NodeTransform> for DecomposedTransform {
    fn from(value: NodeTransform) -> Self {
        match value {
            NodeTransform::Matrix(matrix) => {
                let (scale, rotation, translation) = matrix.0.to_scale_rotation_translation();
                DecomposedTransform {
                    translation,
                    rotation,
                    scale,
                }
            }
            NodeTransform::Decomposed(decomposed) => decomposed,
        }
    }
}

/// A scene graph node.
///
/// `transform` is relative to the parent and is inherited by `children`.
/// `geometric_offset` is a pivot correction of this node's own geometry only:
/// it is never propagated to children.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone)]
pub struct NodeAsset {
    pub id: NodeId,
    pub name: Option<String>,
    pub transform: Option<NodeTransform>,
    pub geometric_offset: DecomposedTransform,
    pub mesh: Option<MeshAsset>,
    pub children: Vec<NodeAsset>,
}

impl NodeAsset {
    pub fn new(id: NodeId) -> Self {
        Self {
            id,
            name: None,
            transform: None,
            geometric_offset: DecomposedTransform::default(),
            mesh: None,
            children: Vec::new(),
        }
    }

    pub fn local_transform(&self) -> DecomposedTransform {
        self.transform.clone().map(Into::into).unwrap_or_default()
    }

    /// Visit this node and all its descendants depth first, parents before children.
    pub fn walk<'a>(&'a self, visitor: &mut impl FnMut(&'a NodeAsset, Option<&'a NodeAsset>)) {
        fn walk_inner<'a>(
            node: &'a NodeAsset,
            parent: Option<&'a NodeAsset>,
            visitor: &mut impl FnMut(&'a NodeAsset, Option<&'a NodeAsset>),
        ) {
            visitor(node, parent);
            for child in &node.children {
                walk_inner(child, Some(node), visitor);
            }
        }
        walk_inner(self, None, visitor)
    }
}
