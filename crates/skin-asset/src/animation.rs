use std::{
    fmt::Debug,
    ops::{Add, Mul},
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::index::NodeId;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone)]
pub struct AnimationKeyFrame<T: Debug + Clone> {
    /// Seconds from the start of the animation.
    pub time: f64,
    pub value: T,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone)]
pub enum AnimationKeyFrames<T: Debug + Clone> {
    Linear(Vec<AnimationKeyFrame<T>>),
    Step(Vec<AnimationKeyFrame<T>>),
    // in, val, out
    CubicSpline(Vec<AnimationKeyFrame<(T, T, T)>>),
}

impl<T: Debug + Clone> AnimationKeyFrames<T> {
    pub fn end_time(&self) -> f64 {
        let last = match self {
            AnimationKeyFrames::Linear(vec) | AnimationKeyFrames::Step(vec) => {
                vec.last().map(|frame| frame.time)
            }
            AnimationKeyFrames::CubicSpline(vec) => vec.last().map(|frame| frame.time),
        };
        last.unwrap_or(0.0)
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone)]
pub enum AnimationSampler {
    /// Quaternion as `[x, y, z, w]`.
    Rotation(AnimationKeyFrames<[f64; 4]>),
    Translation(AnimationKeyFrames<[f64; 3]>),
    Scale(AnimationKeyFrames<[f64; 3]>),
}

impl AnimationSampler {
    pub fn end_time(&self) -> f64 {
        match self {
            AnimationSampler::Rotation(keyframes) => keyframes.end_time(),
            AnimationSampler::Translation(keyframes) => keyframes.end_time(),
            AnimationSampler::Scale(keyframes) => keyframes.end_time(),
        }
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone)]
pub struct AnimationChannelAsset {
    pub sampler: AnimationSampler,
    pub target: NodeId,
}

/// One animation stack of a scene.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Default)]
pub struct AnimationAsset {
    pub name: Option<String>,
    pub channels: Vec<AnimationChannelAsset>,
}

impl AnimationAsset {
    /// Length in seconds, the time of the last keyframe across all channels.
    pub fn length(&self) -> f64 {
        self.channels
            .iter()
            .map(|channel| channel.sampler.end_time())
            .fold(0.0, f64::max)
    }
}

pub trait Interpolate {
    fn linear(a: Self, b: Self, t: f64) -> Self;
    fn cubic_spline(vk: Self, bk: Self, vk_1: Self, ak_1: Self, t: f64, td: f64) -> Self;
}

impl<T> Interpolate for T
where
    T: Mul<f64, Output = T> + Add<T, Output = T>,
{
    fn linear(a: Self, b: Self, t: f64) -> Self {
        a * (1.0 - t) + b * t
    }

    fn cubic_spline(vk: Self, bk: Self, vk_1: Self, ak_1: Self, t: f64, td: f64) -> Self {
        let t3 = t.powi(3);
        let t2 = t.powi(2);
        let first = vk * (2.0 * t3 - 3.0 * t2 + 1.0);
        let second = bk * (td * (t3 - 2.0 * t2 + t));
        let third = vk_1 * (-2.0 * t3 + 3.0 * t2);
        let forth = ak_1 * (td * (t3 - t2));
        first + second + third + forth
    }
}
