use std::{
    error::Error,
    fmt::{self, Display, Formatter},
};

use skin_asset::skin::SkinningType;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictingDeformer {
    /// An active vertex cache overrides every other deformer, so none may be present.
    VertexCacheWithOtherDeformers,
    /// Morph targets cannot be combined with skin deformers.
    ShapesWithSkin,
}

impl Display for ConflictingDeformer {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ConflictingDeformer::VertexCacheWithOtherDeformers => {
                write!(f, "active vertex cache combined with other deformers")
            }
            ConflictingDeformer::ShapesWithSkin => {
                write!(f, "shape deformers combined with skin deformers")
            }
        }
    }
}

/// The matrix that failed to invert while solving a cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindMatrix {
    ReferenceBind,
    LinkBind,
    ReferenceCurrent,
    AssociateCurrent,
}

impl Display for BindMatrix {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            BindMatrix::ReferenceBind => write!(f, "reference bind matrix"),
            BindMatrix::LinkBind => write!(f, "link bind matrix"),
            BindMatrix::ReferenceCurrent => write!(f, "reference current matrix"),
            BindMatrix::AssociateCurrent => write!(f, "associate current matrix"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingBindPoseData {
    ClusterLink,
    EmptySkin,
    NoAnimationStack,
}

impl Display for MissingBindPoseData {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            MissingBindPoseData::ClusterLink => write!(f, "cluster has no link node"),
            MissingBindPoseData::EmptySkin => write!(f, "first skin has no cluster"),
            MissingBindPoseData::NoAnimationStack => write!(f, "scene has no animation stack"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DeformError {
    ConflictingDeformer(ConflictingDeformer),
    DegenerateBindPose { cluster: String, matrix: BindMatrix },
    MissingBindPoseData(MissingBindPoseData),
    UnsupportedSkinningType(SkinningType),
}

impl Display for DeformError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            DeformError::ConflictingDeformer(conflict) => {
                write!(f, "conflicting deformers: {}", conflict)
            }
            DeformError::DegenerateBindPose { cluster, matrix } => {
                write!(f, "degenerate bind pose in {}: {} is not invertible", cluster, matrix)
            }
            DeformError::MissingBindPoseData(missing) => {
                write!(f, "missing bind pose data: {}", missing)
            }
            DeformError::UnsupportedSkinningType(skinning_type) => {
                write!(f, "unsupported skinning type {:?}", skinning_type)
            }
        }
    }
}

impl Error for DeformError {}

impl From<ConflictingDeformer> for DeformError {
    fn from(value: ConflictingDeformer) -> Self {
        DeformError::ConflictingDeformer(value)
    }
}

impl From<MissingBindPoseData> for DeformError {
    fn from(value: MissingBindPoseData) -> Self {
        DeformError::MissingBindPoseData(value)
    }
}

pub type DeformResult<T> = Result<T, DeformError>;
