//! Per frame deformation of every mesh in a scene.

use std::time::Duration;

use glam::Mat4;
use log::{debug, warn};
use skin_asset::{
    index::NodeId,
    mesh::{MappingMode, MeshAsset},
    node::NodeAsset,
    scene::SceneAsset,
};

use crate::{
    dispatch::{deform_mesh, Deformation},
    error::DeformResult,
    evaluator::{SceneEvaluator, SkinnedMesh},
    options::DeformOptions,
    vertex::{expand_vertices, Bounds, MeshVertex},
};

/// Renderable state of one mesh for one frame.
#[derive(Debug, Clone)]
pub struct MeshFrame {
    pub deformation: Deformation,
    /// Global transform of the mesh node, geometric offset included.
    pub world_transform: Mat4,
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u32>,
    pub bounds: Option<Bounds>,
}

#[derive(Debug, Clone)]
pub struct MeshFrameResult {
    pub node: NodeId,
    pub name: Option<String>,
    pub frame: DeformResult<MeshFrame>,
}

/// Walks the node tree of a scene and deforms its meshes.
pub struct SceneDeformer<'a, E> {
    scene: &'a SceneAsset,
    evaluator: E,
    options: DeformOptions,
}

impl<'a, E: SceneEvaluator> SceneDeformer<'a, E> {
    pub fn new(scene: &'a SceneAsset, evaluator: E, options: DeformOptions) -> Self {
        Self {
            scene,
            evaluator,
            options,
        }
    }

    pub fn scene(&self) -> &'a SceneAsset {
        self.scene
    }

    pub fn evaluator(&self) -> &E {
        &self.evaluator
    }

    pub fn options(&self) -> &DeformOptions {
        &self.options
    }

    /// Meshes to draw, depth first, parents before children.
    fn drawable_meshes(&self) -> Vec<(&'a NodeAsset, &'a MeshAsset)> {
        let mut meshes = Vec::new();
        for root in &self.scene.nodes {
            root.walk(&mut |node, _| {
                let Some(mesh) = node.mesh.as_ref() else {
                    return;
                };
                if mesh.control_points.is_empty() {
                    debug!("Mesh {} has no control points", node.id);
                    return;
                }
                if !has_polygon_vertex_layers(mesh) {
                    debug!(
                        "Mesh {} lacks uv or normal layers mapped by polygon vertex",
                        node.id
                    );
                    return;
                }
                meshes.push((node, mesh));
            });
        }
        meshes
    }

    fn deform_node(&self, node: &NodeAsset, mesh: &MeshAsset, time: Duration) -> MeshFrameResult {
        let target = SkinnedMesh::evaluate(&self.evaluator, node.id, mesh, time);
        let frame = self.deform_target(&target, time);
        if let Err(err) = &frame {
            warn!("Failed to deform mesh {}: {}", node.id, err);
        }
        MeshFrameResult {
            node: node.id,
            name: node.name.clone(),
            frame,
        }
    }

    fn deform_target(&self, target: &SkinnedMesh, time: Duration) -> DeformResult<MeshFrame> {
        let mut positions = target.mesh.control_points.clone();
        let deformation = deform_mesh(
            &self.evaluator,
            target,
            time,
            &self.options,
            &mut positions,
        )?;
        let expanded = expand_vertices(target.mesh, &positions);
        Ok(MeshFrame {
            deformation,
            world_transform: target.global_transform.as_mat4(),
            vertices: expanded.vertices,
            indices: expanded.indices,
            bounds: expanded.bounds,
        })
    }

    /// Deform every drawable mesh of the scene at `time`. A failing mesh
    /// reports its error in its own slot without affecting the others.
    pub fn deform_frame(&self, time: Duration) -> Vec<MeshFrameResult> {
        self.drawable_meshes()
            .into_iter()
            .map(|(node, mesh)| self.deform_node(node, mesh, time))
            .collect()
    }
}

#[cfg(feature = "parallel")]
impl<E: SceneEvaluator + Sync> SceneDeformer<'_, E> {
    /// [`deform_frame`](Self::deform_frame) with meshes deformed in parallel.
    pub fn par_deform_frame(&self, time: Duration) -> Vec<MeshFrameResult> {
        use rayon::prelude::*;

        self.drawable_meshes()
            .into_par_iter()
            .map(|(node, mesh)| self.deform_node(node, mesh, time))
            .collect()
    }
}

fn has_polygon_vertex_layers(mesh: &MeshAsset) -> bool {
    let by_polygon_vertex = |mapping: MappingMode| mapping == MappingMode::ByPolygonVertex;
    mesh.tex_coords
        .as_ref()
        .is_some_and(|layer| by_polygon_vertex(layer.mapping))
        && mesh
            .normals
            .as_ref()
            .is_some_and(|layer| by_polygon_vertex(layer.mapping))
}
