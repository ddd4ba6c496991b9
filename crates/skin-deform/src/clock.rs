use std::time::Duration;

use log::{trace, warn};
use skin_asset::scene::{SceneAsset, DEFAULT_FRAME_RATE};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PlaybackMode {
    /// Play to the end, then stop producing frames.
    #[default]
    Once,
    /// Wrap back to the start after the end.
    Repeat,
    /// Play forward and backward in turn.
    Loop,
}

/// Steps animation time by one frame at a time.
#[derive(Debug, Clone)]
pub struct FrameClock {
    mode: PlaybackMode,
    start: Duration,
    length: Duration,
    frame: Duration,
    elapsed: Duration,
}

impl FrameClock {
    pub fn new(mode: PlaybackMode, start: Duration, length: Duration, frame_rate: f64) -> Self {
        let frame_rate = if frame_rate.is_finite() && frame_rate > 0.0 {
            frame_rate
        } else {
            warn!(
                "Invalid frame rate {}, falling back to {} fps",
                frame_rate, DEFAULT_FRAME_RATE
            );
            DEFAULT_FRAME_RATE
        };
        Self {
            mode,
            start,
            length,
            frame: Duration::from_secs_f64(1.0 / frame_rate),
            elapsed: Duration::ZERO,
        }
    }

    /// Clock over `length` from time zero, stepping at the frame rate of `scene`.
    pub fn for_scene(mode: PlaybackMode, scene: &SceneAsset, length: Duration) -> Self {
        Self::new(mode, Duration::ZERO, length, scene.frame_rate)
    }

    pub fn mode(&self) -> PlaybackMode {
        self.mode
    }

    pub fn frame_duration(&self) -> Duration {
        self.frame
    }

    /// Animation time of the last produced frame.
    pub fn time(&self) -> Duration {
        self.start + self.animation_time(self.elapsed)
    }

    pub fn reset(&mut self) {
        self.elapsed = Duration::ZERO;
    }

    /// Advance by one frame. Returns the animation time to draw, or `None`
    /// once a [`PlaybackMode::Once`] clock has passed its end.
    pub fn tick(&mut self) -> Option<Duration> {
        let elapsed = self.elapsed + self.frame;
        if self.mode == PlaybackMode::Once && elapsed > self.length {
            return None;
        }
        self.elapsed = elapsed;
        let time = self.time();
        trace!("Frame time: {:#.03}s", time.as_secs_f64());
        Some(time)
    }

    fn animation_time(&self, elapsed: Duration) -> Duration {
        let length = self.length.as_nanos() as u64;
        if length == 0 {
            return Duration::ZERO;
        }
        let elapsed = elapsed.as_nanos() as u64;
        let time = match self.mode {
            PlaybackMode::Once => elapsed.min(length),
            PlaybackMode::Repeat => elapsed % length,
            PlaybackMode::Loop => {
                let progress = elapsed % (2 * length);
                if progress > length {
                    2 * length - progress
                } else {
                    progress
                }
            }
        };
        Duration::from_nanos(time)
    }
}
