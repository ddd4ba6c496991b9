//! Weighted blending of all skin clusters of a mesh.

use std::{ops::Range, time::Duration};

use glam::{DMat4, DVec3};
use log::trace;
use skin_asset::skin::{ClusterAsset, LinkMode};

use crate::{
    cluster::cluster_deformation,
    error::{DeformResult, MissingBindPoseData},
    evaluator::{SceneEvaluator, SkinnedMesh},
    matrix::{self, zero_matrix},
    options::DeformOptions,
};

#[derive(Debug, Clone, Copy)]
struct VertexAccumulator {
    transform: DMat4,
    weight: f64,
}

/// Transient per control point state of one blending pass over the
/// control points in `range`.
#[derive(Debug, Clone)]
pub struct AccumulationBuffer {
    link_mode: LinkMode,
    range: Range<usize>,
    accumulators: Vec<VertexAccumulator>,
}

impl AccumulationBuffer {
    pub fn new(link_mode: LinkMode, range: Range<usize>) -> Self {
        // Identity is the neutral element of the additive product chain.
        let transform = if link_mode.is_additive() {
            DMat4::IDENTITY
        } else {
            zero_matrix()
        };
        let accumulators = vec![
            VertexAccumulator {
                transform,
                weight: 0.0,
            };
            range.len()
        ];
        Self {
            link_mode,
            range,
            accumulators,
        }
    }

    pub fn range(&self) -> &Range<usize> {
        &self.range
    }

    /// Add the influence of one cluster on control point `index`. Indices
    /// outside the buffer range and zero weights are ignored.
    pub fn accumulate(mut self, index: usize, deformation: &DMat4, weight: f64) -> Self {
        if weight == 0.0 || !self.range.contains(&index) {
            return self;
        }
        let accumulator = &mut self.accumulators[index - self.range.start];

        let mut influence = *deformation;
        matrix::scale(&mut influence, weight);
        if self.link_mode.is_additive() {
            matrix::add_to_diagonal(&mut influence, 1.0 - weight);
            accumulator.transform = influence * accumulator.transform;
            // Only marks the point as influenced.
            accumulator.weight = 1.0;
        } else {
            matrix::add(&mut accumulator.transform, &influence);
            accumulator.weight += weight;
        }
        self
    }

    /// Write the blended positions of influenced control points into
    /// `positions`, which holds the bind-pose positions of the buffer range.
    pub fn finalize(self, positions: &mut [DVec3]) {
        debug_assert_eq!(positions.len(), self.accumulators.len());
        for (position, accumulator) in positions.iter_mut().zip(self.accumulators) {
            if accumulator.weight == 0.0 {
                continue;
            }
            let source = *position;
            let deformed = (accumulator.transform * source.extend(1.0)).truncate();
            *position = match self.link_mode {
                LinkMode::Normalize => deformed / accumulator.weight,
                LinkMode::TotalOne => deformed + source * (1.0 - accumulator.weight),
                LinkMode::Additive => deformed,
            };
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct ClusterDeformation<'a> {
    cluster: &'a ClusterAsset,
    matrix: DMat4,
}

fn blend_range(
    link_mode: LinkMode,
    deformations: &[ClusterDeformation],
    start: usize,
    positions: &mut [DVec3],
) {
    let range = start..start + positions.len();
    let buffer = deformations
        .iter()
        .flat_map(|deformation| {
            deformation
                .cluster
                .weights
                .iter()
                .map(move |weight| (&deformation.matrix, weight))
        })
        .fold(
            AccumulationBuffer::new(link_mode, range),
            |buffer, (deformation, weight)| {
                buffer.accumulate(weight.index, deformation, weight.weight)
            },
        );
    buffer.finalize(positions);
}

/// Deform `positions` (the bind-pose control points of `target`) in the
/// classic linear way, blending every cluster of every skin of the mesh.
pub fn compute_linear_deformation(
    evaluator: &impl SceneEvaluator,
    target: &SkinnedMesh,
    time: Duration,
    options: &DeformOptions,
    positions: &mut [DVec3],
) -> DeformResult<()> {
    let Some(first_skin) = target.mesh.skins.first() else {
        return Ok(());
    };
    // All clusters of a mesh share the link mode of the first one.
    let link_mode = first_skin
        .clusters
        .first()
        .ok_or(MissingBindPoseData::EmptySkin)?
        .link_mode;

    let deformations = target
        .mesh
        .skins
        .iter()
        .flat_map(|skin| skin.clusters.iter())
        .filter(|cluster| cluster.link.is_some())
        .map(|cluster| {
            cluster_deformation(evaluator, target, cluster, time, options)
                .map(|matrix| ClusterDeformation { cluster, matrix })
        })
        .collect::<DeformResult<Vec<_>>>()?;
    trace!(
        "Blending {} clusters over {} control points of mesh {} ({:?})",
        deformations.len(),
        positions.len(),
        target.node,
        link_mode
    );

    #[cfg(feature = "parallel")]
    if let Some(chunk_size) = options.parallel_chunk_size.filter(|size| *size > 0) {
        use rayon::prelude::*;

        positions
            .par_chunks_mut(chunk_size)
            .enumerate()
            .for_each(|(chunk, positions)| {
                blend_range(link_mode, &deformations, chunk * chunk_size, positions)
            });
        return Ok(());
    }

    blend_range(link_mode, &deformations, 0, positions);
    Ok(())
}
