use glam::DVec3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::skin::SkinAsset;

pub type TexCoord = [f32; 2];
pub type Normal = [f32; 3];

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MappingMode {
    ByControlPoint,
    ByPolygonVertex,
}

/// Per-vertex attribute layer, addressed either by control point index or
/// by polygon vertex (the running corner index over all polygons).
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone)]
pub struct LayerElement<T> {
    pub mapping: MappingMode,
    pub values: Vec<T>,
}

impl<T: Copy> LayerElement<T> {
    pub fn get(&self, control_point: usize, polygon_vertex: usize) -> Option<T> {
        let index = match self.mapping {
            MappingMode::ByControlPoint => control_point,
            MappingMode::ByPolygonVertex => polygon_vertex,
        };
        self.values.get(index).copied()
    }
}

/// Morph target attached to a mesh.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone)]
pub struct ShapeAsset {
    pub name: Option<String>,
    pub control_points: Vec<DVec3>,
}

/// Deformer streaming baked per-frame positions from an external cache.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone)]
pub struct VertexCacheAsset {
    pub name: Option<String>,
    pub active: bool,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Default)]
pub struct MeshAsset {
    pub name: Option<String>,
    /// Bind-pose positions.
    pub control_points: Vec<DVec3>,
    /// Triangulated polygons, as control point indices.
    pub triangles: Vec<[u32; 3]>,
    pub tex_coords: Option<LayerElement<TexCoord>>,
    pub normals: Option<LayerElement<Normal>>,
    pub skins: Vec<SkinAsset>,
    pub shapes: Vec<ShapeAsset>,
    pub vertex_cache: Option<VertexCacheAsset>,
}

impl MeshAsset {
    pub fn has_active_vertex_cache(&self) -> bool {
        self.vertex_cache
            .as_ref()
            .is_some_and(|vertex_cache| vertex_cache.active)
    }

    pub fn cluster_count(&self) -> usize {
        self.skins.iter().map(|skin| skin.clusters.len()).sum()
    }

    pub fn polygon_vertex_count(&self) -> usize {
        self.triangles.len() * 3
    }
}
