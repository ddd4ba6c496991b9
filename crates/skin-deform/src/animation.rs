//! Scene evaluation driven by the keyframed animations of a scene.

use std::{collections::HashMap, fmt::Debug, time::Duration};

use glam::{DMat4, DQuat, DVec3};
use log::{debug, trace, warn};
use skin_asset::{
    animation::{
        AnimationAsset, AnimationKeyFrame, AnimationKeyFrames, AnimationSampler, Interpolate,
    },
    index::NodeId,
    node::DecomposedTransform,
    scene::SceneAsset,
};

use crate::{
    error::{DeformResult, MissingBindPoseData},
    evaluator::SceneEvaluator,
};

#[derive(Debug)]
struct SceneNode {
    id: NodeId,
    parent: Option<usize>,
    local: DecomposedTransform,
    geometric_offset: DMat4,
}

/// [`SceneEvaluator`] posing the node tree of a [`SceneAsset`] with one of
/// its animations, or in its rest pose when no animation is selected.
#[derive(Debug)]
pub struct AnimatedScene<'a> {
    nodes: Vec<SceneNode>,
    indices: HashMap<NodeId, usize>,
    channels: HashMap<NodeId, Vec<&'a AnimationSampler>>,
    animation: Option<&'a AnimationAsset>,
}

impl<'a> AnimatedScene<'a> {
    /// Rest pose of `scene`.
    pub fn new(scene: &'a SceneAsset) -> Self {
        let mut nodes = Vec::new();
        let mut indices = HashMap::new();
        for root in &scene.nodes {
            root.walk(&mut |node, parent| {
                let parent = parent.and_then(|parent| indices.get(&parent.id).copied());
                if indices.insert(node.id, nodes.len()).is_some() {
                    warn!("Duplicate node id {}, the last one wins", node.id);
                }
                nodes.push(SceneNode {
                    id: node.id,
                    parent,
                    local: node.local_transform(),
                    geometric_offset: node.geometric_offset.matrix(),
                });
            });
        }
        debug!("Flattened scene into {} nodes", nodes.len());

        Self {
            nodes,
            indices,
            channels: HashMap::new(),
            animation: None,
        }
    }

    /// `scene` posed by `animation`.
    pub fn with_animation(scene: &'a SceneAsset, animation: &'a AnimationAsset) -> Self {
        let mut evaluator = Self::new(scene);
        for channel in &animation.channels {
            if !evaluator.indices.contains_key(&channel.target) {
                warn!("Target node to be animated not found: {}", channel.target);
                continue;
            }
            evaluator
                .channels
                .entry(channel.target)
                .or_default()
                .push(&channel.sampler);
        }
        evaluator.animation = Some(animation);
        evaluator
    }

    /// `scene` posed by its first animation stack.
    pub fn from_first_stack(scene: &'a SceneAsset) -> DeformResult<Self> {
        let animation = scene
            .animations
            .first()
            .ok_or(MissingBindPoseData::NoAnimationStack)?;
        Ok(Self::with_animation(scene, animation))
    }

    pub fn animation(&self) -> Option<&'a AnimationAsset> {
        self.animation
    }

    /// Length of the selected animation, zero in rest pose.
    pub fn length(&self) -> Duration {
        let seconds = self.animation.map(AnimationAsset::length).unwrap_or(0.0);
        Duration::from_secs_f64(seconds.max(0.0))
    }

    fn local_transform(&self, node: &SceneNode, time: f64) -> DMat4 {
        let Some(samplers) = self.channels.get(&node.id) else {
            return node.local.matrix();
        };

        let mut transform = node.local.clone();
        for sampler in samplers {
            match sampler {
                AnimationSampler::Rotation(keyframes) => {
                    if let Some(rotation) = interpolate_rotation(time, keyframes) {
                        transform.rotation = rotation.normalize();
                    }
                }
                AnimationSampler::Translation(keyframes) => {
                    if let Some(translation) =
                        interpolate_frames(time, keyframes, |arr| DVec3::from_array(*arr))
                    {
                        transform.translation = translation;
                    }
                }
                AnimationSampler::Scale(keyframes) => {
                    if let Some(scale) =
                        interpolate_frames(time, keyframes, |arr| DVec3::from_array(*arr))
                    {
                        transform.scale = scale;
                    }
                }
            }
        }
        transform.matrix()
    }
}

impl SceneEvaluator for AnimatedScene<'_> {
    fn global_transform(&self, node: NodeId, time: Duration) -> DMat4 {
        let Some(&index) = self.indices.get(&node) else {
            trace!("Node {} is not part of the scene", node);
            return DMat4::IDENTITY;
        };
        let time = time.as_secs_f64();

        let mut global = DMat4::IDENTITY;
        let mut current = Some(index);
        while let Some(index) = current {
            let scene_node = &self.nodes[index];
            global = self.local_transform(scene_node, time) * global;
            current = scene_node.parent;
        }
        global
    }

    fn geometric_offset(&self, node: NodeId) -> DMat4 {
        self.indices
            .get(&node)
            .map(|index| self.nodes[*index].geometric_offset)
            .unwrap_or(DMat4::IDENTITY)
    }
}

/// Keyframes around `time` with the progress between them and their time
/// distance. Times outside the keyframe range hold the first or last value.
fn find_keyframe<T: Debug + Clone>(
    time: f64,
    keyframes: &[AnimationKeyFrame<T>],
) -> Option<(f64, f64, &T, &T)> {
    let first = keyframes.first()?;
    if time <= first.time {
        return Some((0.0, 0.0, &first.value, &first.value));
    }
    match keyframes.iter().position(|frame| frame.time > time) {
        Some(next) => {
            let current = &keyframes[next - 1];
            let next = &keyframes[next];
            let delta = next.time - current.time;
            let progress = (time - current.time) / delta;
            Some((progress.clamp(0.0, 1.0), delta, &current.value, &next.value))
        }
        None => {
            let last = keyframes.last()?;
            Some((0.0, 0.0, &last.value, &last.value))
        }
    }
}

/// Linear rotation keys take the shorter arc between neighbouring keys.
fn interpolate_rotation(time: f64, keyframes: &AnimationKeyFrames<[f64; 4]>) -> Option<DQuat> {
    match keyframes {
        AnimationKeyFrames::Linear(vec) => {
            find_keyframe(time, vec).map(|(progress, _, current, next)| {
                let current = DQuat::from_array(*current).normalize();
                let next = DQuat::from_array(*next).normalize();
                current.slerp(next, progress)
            })
        }
        _ => interpolate_frames(time, keyframes, |arr| DQuat::from_array(*arr)),
    }
}

fn interpolate_frames<T: Debug + Clone, I: Interpolate>(
    time: f64,
    keyframes: &AnimationKeyFrames<T>,
    mapper: impl Fn(&T) -> I,
) -> Option<I> {
    match keyframes {
        AnimationKeyFrames::Linear(vec) => {
            find_keyframe(time, vec).map(|(progress, _, current, next)| {
                I::linear(mapper(current), mapper(next), progress)
            })
        }
        AnimationKeyFrames::Step(vec) => {
            find_keyframe(time, vec).map(|(_, _, current, _)| mapper(current))
        }
        AnimationKeyFrames::CubicSpline(vec) => {
            find_keyframe(time, vec).map(|(progress, delta, current, next)| {
                let (val_cur, out_cur) = (mapper(&current.1), mapper(&current.2));
                let (in_next, val_next) = (mapper(&next.0), mapper(&next.1));
                I::cubic_spline(val_cur, out_cur, val_next, in_next, progress, delta)
            })
        }
    }
}
