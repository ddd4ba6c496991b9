use bytemuck::{Pod, Zeroable};
use glam::{DVec3, Vec3};
use log::warn;
use skin_asset::mesh::MeshAsset;

/// Renderer facing vertex, one per polygon corner.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub tex_coords: [f32; 2],
}

/// Axis aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl Bounds {
    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Option<Self> {
        points.into_iter().fold(None, |bounds, point| {
            Some(match bounds {
                Some(Bounds { min, max }) => Bounds {
                    min: min.min(point),
                    max: max.max(point),
                },
                None => Bounds {
                    min: point,
                    max: point,
                },
            })
        })
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }
}

#[derive(Debug, Clone, Default)]
pub struct ExpandedMesh {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u32>,
    /// `None` when no vertex was emitted.
    pub bounds: Option<Bounds>,
}

/// Expand the triangles of `mesh` into one vertex per polygon corner, taking
/// positions from `positions` (its control points, possibly deformed).
/// Missing normals and texture coordinates are zeroed.
pub fn expand_vertices(mesh: &MeshAsset, positions: &[DVec3]) -> ExpandedMesh {
    let mut vertices = Vec::with_capacity(mesh.polygon_vertex_count());
    let mut skipped = 0;

    for (polygon, triangle) in mesh.triangles.iter().enumerate() {
        let corners = triangle.map(|control_point| positions.get(control_point as usize));
        let [Some(a), Some(b), Some(c)] = corners else {
            skipped += 1;
            continue;
        };

        for (corner, (control_point, position)) in triangle.iter().zip([a, b, c]).enumerate() {
            let control_point = *control_point as usize;
            let polygon_vertex = polygon * 3 + corner;
            let normal = mesh
                .normals
                .as_ref()
                .and_then(|normals| normals.get(control_point, polygon_vertex))
                .unwrap_or_default();
            let tex_coords = mesh
                .tex_coords
                .as_ref()
                .and_then(|tex_coords| tex_coords.get(control_point, polygon_vertex))
                .unwrap_or_default();
            vertices.push(MeshVertex {
                position: position.as_vec3().to_array(),
                normal,
                tex_coords,
            });
        }
    }
    if skipped > 0 {
        warn!(
            "Skipped {} triangles of mesh {:?} referencing missing control points",
            skipped, mesh.name
        );
    }

    let indices = (0..vertices.len() as u32).collect();
    let bounds = Bounds::from_points(vertices.iter().map(|vertex| Vec3::from(vertex.position)));
    ExpandedMesh {
        vertices,
        indices,
        bounds,
    }
}
