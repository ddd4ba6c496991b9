//! Per-cluster bind-to-current transform.

use std::time::Duration;

use glam::DMat4;
use skin_asset::skin::{AssociateModel, ClusterAsset, LinkMode};

use crate::{
    error::{BindMatrix, DeformError, DeformResult, MissingBindPoseData},
    evaluator::{SceneEvaluator, SkinnedMesh},
    matrix::try_inverse,
    options::DeformOptions,
};

struct Inverter<'a> {
    cluster: &'a ClusterAsset,
    epsilon: f64,
}

impl Inverter<'_> {
    fn inverse(&self, matrix: &DMat4, kind: BindMatrix) -> DeformResult<DMat4> {
        try_inverse(matrix, self.epsilon).ok_or_else(|| DeformError::DegenerateBindPose {
            cluster: self.cluster.label(),
            matrix: kind,
        })
    }
}

/// Compute the matrix moving a control point bound by `cluster` from the bind
/// pose to its pose at `time`.
pub fn cluster_deformation(
    evaluator: &impl SceneEvaluator,
    target: &SkinnedMesh,
    cluster: &ClusterAsset,
    time: Duration,
    options: &DeformOptions,
) -> DeformResult<DMat4> {
    let link = cluster.link.ok_or(MissingBindPoseData::ClusterLink)?;
    let inverter = Inverter {
        cluster,
        epsilon: options.degenerate_epsilon,
    };

    let reference_bind = cluster.transform * evaluator.geometric_offset(target.node);
    let link_current = evaluator.global_transform(link, time);

    match (cluster.link_mode, &cluster.associate) {
        (LinkMode::Additive, Some(AssociateModel { node, transform })) => {
            let associate_bind = *transform * evaluator.geometric_offset(*node);
            let associate_current = evaluator.global_transform(*node, time);
            let link_bind = cluster.transform_link * evaluator.geometric_offset(link);

            // Shift of the link relative to the reference, with the associate
            // model's own motion factored out.
            Ok(inverter.inverse(&reference_bind, BindMatrix::ReferenceBind)?
                * associate_bind
                * inverter.inverse(&associate_current, BindMatrix::AssociateCurrent)?
                * link_current
                * inverter.inverse(&link_bind, BindMatrix::LinkBind)?
                * reference_bind)
        }
        _ => {
            // Link bind without the geometric offset of the link.
            let link_bind = cluster.transform_link;
            let relative_bind =
                inverter.inverse(&link_bind, BindMatrix::LinkBind)? * reference_bind;
            let relative_current_inverse = inverter
                .inverse(&target.global_transform, BindMatrix::ReferenceCurrent)?
                * link_current;
            Ok(relative_current_inverse * relative_bind)
        }
    }
}

#[cfg(test)]
mod test {
    use std::time::Duration;

    use glam::{DMat4, DQuat, DVec3};
    use skin_asset::{
        index::NodeId,
        mesh::MeshAsset,
        skin::{AssociateModel, ClusterAsset, LinkMode},
    };

    use super::cluster_deformation;
    use crate::{
        error::{BindMatrix, DeformError, MissingBindPoseData},
        evaluator::SkinnedMesh,
        fixture::{translation, FnScene, StaticScene, MESH},
        options::DeformOptions,
    };

    const BONE: NodeId = NodeId(1);
    const DRIVER: NodeId = NodeId(2);

    fn target(mesh: &MeshAsset, global_transform: DMat4) -> SkinnedMesh<'_> {
        SkinnedMesh {
            node: MESH,
            mesh,
            global_transform,
        }
    }

    fn solve(scene: &StaticScene, cluster: &ClusterAsset, reference: DMat4) -> DMat4 {
        let mesh = MeshAsset::default();
        cluster_deformation(
            scene,
            &target(&mesh, reference),
            cluster,
            Duration::ZERO,
            &DeformOptions::default(),
        )
        .unwrap()
    }

    #[test]
    fn rest_pose_is_identity() {
        let bind = DMat4::from_rotation_z(0.4) * translation(0.0, 3.0, 0.0);
        let scene = StaticScene::default().with_global(BONE, bind);
        let mut cluster = ClusterAsset::new(BONE, LinkMode::Normalize);
        cluster.transform_link = bind;

        let deformation = solve(&scene, &cluster, DMat4::IDENTITY);
        assert!(deformation.abs_diff_eq(DMat4::IDENTITY, 1e-12));
    }

    #[test]
    fn moved_link_moves_the_point() {
        let scene = StaticScene::default().with_global(BONE, translation(1.0, 0.0, 0.0));
        let cluster = ClusterAsset::new(BONE, LinkMode::Normalize);

        let deformation = solve(&scene, &cluster, DMat4::IDENTITY);
        assert!(deformation.abs_diff_eq(translation(1.0, 0.0, 0.0), 1e-12));
    }

    #[test]
    fn link_motion_is_measured_against_the_current_reference() {
        // Mesh and bone moved together: nothing changes relative to the mesh.
        let moved = translation(5.0, -2.0, 1.0) * DMat4::from_rotation_x(1.1);
        let scene = StaticScene::default().with_global(BONE, moved);
        let cluster = ClusterAsset::new(BONE, LinkMode::TotalOne);

        let deformation = solve(&scene, &cluster, moved);
        assert!(deformation.abs_diff_eq(DMat4::IDENTITY, 1e-12));
    }

    #[test]
    fn mesh_geometric_offset_enters_the_reference_bind() {
        let offset = translation(0.0, 0.0, 2.0) * DMat4::from_scale(DVec3::splat(2.0));
        let scene = StaticScene::default().with_offset(MESH, offset);
        let cluster = ClusterAsset::new(BONE, LinkMode::Normalize);

        // The posed mesh carries its offset, which cancels against the bind.
        let deformation = solve(&scene, &cluster, offset);
        assert!(deformation.abs_diff_eq(DMat4::IDENTITY, 1e-12));

        // Without it in the current pose the offset shows up.
        let deformation = solve(&scene, &cluster, DMat4::IDENTITY);
        assert!(deformation.abs_diff_eq(offset, 1e-12));
    }

    #[test]
    fn standard_mode_ignores_link_geometric_offset() {
        let scene = StaticScene::default()
            .with_global(BONE, translation(2.0, 0.0, 0.0))
            .with_offset(BONE, translation(2.0, 0.0, 0.0));
        let cluster = ClusterAsset::new(BONE, LinkMode::Normalize);

        let deformation = solve(&scene, &cluster, DMat4::IDENTITY);
        assert!(deformation.abs_diff_eq(translation(2.0, 0.0, 0.0), 1e-12));
    }

    #[test]
    fn additive_with_associate_uses_link_geometric_offset() {
        let scene = StaticScene::default()
            .with_global(BONE, translation(2.0, 0.0, 0.0))
            .with_offset(BONE, translation(2.0, 0.0, 0.0));
        let mut cluster = ClusterAsset::new(BONE, LinkMode::Additive);
        cluster.associate = Some(AssociateModel {
            node: DRIVER,
            transform: DMat4::IDENTITY,
        });

        let deformation = solve(&scene, &cluster, DMat4::IDENTITY);
        assert!(deformation.abs_diff_eq(DMat4::IDENTITY, 1e-12));
    }

    #[test]
    fn additive_with_associate_factors_out_driver_motion() {
        let scene = StaticScene::default().with_global(DRIVER, translation(0.0, 1.0, 0.0));
        let mut cluster = ClusterAsset::new(BONE, LinkMode::Additive);
        cluster.associate = Some(AssociateModel {
            node: DRIVER,
            transform: DMat4::IDENTITY,
        });

        let deformation = solve(&scene, &cluster, DMat4::IDENTITY);
        assert!(deformation.abs_diff_eq(translation(0.0, -1.0, 0.0), 1e-12));
    }

    #[test]
    fn additive_with_associate_ignores_current_reference() {
        let scene = StaticScene::default()
            .with_global(BONE, translation(1.0, 0.0, 0.0))
            .with_global(DRIVER, DMat4::IDENTITY);
        let mut cluster = ClusterAsset::new(BONE, LinkMode::Additive);
        cluster.associate = Some(AssociateModel {
            node: DRIVER,
            transform: DMat4::IDENTITY,
        });

        let deformation = solve(&scene, &cluster, translation(0.0, 0.0, 9.0));
        assert!(deformation.abs_diff_eq(translation(1.0, 0.0, 0.0), 1e-12));
    }

    #[test]
    fn additive_without_associate_falls_back_to_standard() {
        let scene = StaticScene::default()
            .with_global(BONE, translation(2.0, 0.0, 0.0))
            .with_offset(BONE, translation(2.0, 0.0, 0.0));
        let cluster = ClusterAsset::new(BONE, LinkMode::Additive);

        let deformation = solve(&scene, &cluster, DMat4::IDENTITY);
        assert!(deformation.abs_diff_eq(translation(2.0, 0.0, 0.0), 1e-12));
    }

    #[test]
    fn link_is_evaluated_at_requested_time() {
        let scene = FnScene(|node: NodeId, time: Duration| {
            if node == BONE {
                DMat4::from_quat(DQuat::from_rotation_z(time.as_secs_f64()))
            } else {
                DMat4::IDENTITY
            }
        });
        let mesh = MeshAsset::default();
        let cluster = ClusterAsset::new(BONE, LinkMode::Normalize);
        let deformation = cluster_deformation(
            &scene,
            &target(&mesh, DMat4::IDENTITY),
            &cluster,
            Duration::from_millis(500),
            &DeformOptions::default(),
        )
        .unwrap();
        assert!(deformation.abs_diff_eq(DMat4::from_rotation_z(0.5), 1e-12));
    }

    #[test]
    fn small_scale_bind_pose_is_invertible() {
        let tiny = DMat4::from_scale(DVec3::splat(1e-4));
        let scene = StaticScene::default().with_global(BONE, tiny);
        let mut cluster = ClusterAsset::new(BONE, LinkMode::Normalize);
        cluster.transform_link = tiny;

        let deformation = solve(&scene, &cluster, DMat4::IDENTITY);
        assert!(deformation.abs_diff_eq(DMat4::IDENTITY, 1e-9));
    }

    #[test]
    fn singular_link_bind_is_rejected() {
        let scene = StaticScene::default();
        let mut cluster = ClusterAsset::new(BONE, LinkMode::Normalize);
        cluster.name = Some(String::from("arm"));
        cluster.transform_link = DMat4::from_scale(DVec3::new(1.0, 1.0, 0.0));
        let mesh = MeshAsset::default();

        let result = cluster_deformation(
            &scene,
            &target(&mesh, DMat4::IDENTITY),
            &cluster,
            Duration::ZERO,
            &DeformOptions::default(),
        );
        assert_eq!(
            result,
            Err(DeformError::DegenerateBindPose {
                cluster: String::from("arm"),
                matrix: BindMatrix::LinkBind,
            })
        );
    }

    #[test]
    fn singular_reference_bind_is_rejected_in_additive_mode() {
        let scene = StaticScene::default();
        let mut cluster = ClusterAsset::new(BONE, LinkMode::Additive);
        cluster.transform = DMat4::ZERO;
        cluster.associate = Some(AssociateModel {
            node: DRIVER,
            transform: DMat4::IDENTITY,
        });
        let mesh = MeshAsset::default();

        let result = cluster_deformation(
            &scene,
            &target(&mesh, DMat4::IDENTITY),
            &cluster,
            Duration::ZERO,
            &DeformOptions::default(),
        );
        assert!(matches!(
            result,
            Err(DeformError::DegenerateBindPose {
                matrix: BindMatrix::ReferenceBind,
                ..
            })
        ));
    }

    #[test]
    fn cluster_without_link_is_missing_data() {
        let scene = StaticScene::default();
        let mut cluster = ClusterAsset::new(BONE, LinkMode::Normalize);
        cluster.link = None;
        let mesh = MeshAsset::default();

        let result = cluster_deformation(
            &scene,
            &target(&mesh, DMat4::IDENTITY),
            &cluster,
            Duration::ZERO,
            &DeformOptions::default(),
        );
        assert_eq!(
            result,
            Err(DeformError::MissingBindPoseData(
                MissingBindPoseData::ClusterLink
            ))
        );
    }
}
