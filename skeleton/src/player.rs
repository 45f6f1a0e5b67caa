use kinema_animation::{Animation, Lifecycle, Limit, Playback, Result as AnimationResult, Shared};
use log::debug;

use crate::{Error, Result, Skeleton, SkeletonAnimation};

/// Plays a [`SkeletonAnimation`] on a shared skeleton.
///
/// The key frame time is the eased position multiplied by the animation's duration. With an
/// infinite duration, the player runs until stopped and the key frame time is the local time since
/// the delay, which holds the last key frame once it is passed.
pub struct SkeletalPlayer {
    playback: Playback,
    animation: SkeletonAnimation,
    skeleton: Shared<Skeleton>,
}

impl SkeletalPlayer {
    pub fn new(mut animation: SkeletonAnimation, skeleton: Shared<Skeleton>) -> Result<Self> {
        if animation.key_frames.is_empty() {
            return Err(Error::NoKeyFrames);
        }
        animation.sort_key_frames()?;
        if animation.options.duration.is_infinite() {
            debug!(
                "`{}` runs until stopped, key frames end at {}",
                animation.name,
                animation.end_time()
            );
        }

        let mut playback = Playback::new(animation.options.clone());
        playback.lifecycle_mut().set_name(animation.name.clone());
        Ok(Self {
            playback,
            animation,
            skeleton,
        })
    }

    pub fn animation(&self) -> &SkeletonAnimation {
        &self.animation
    }

    pub fn skeleton(&self) -> &Shared<Skeleton> {
        &self.skeleton
    }

    /// Duration of one cycle in key frame time.
    pub fn duration(&self) -> Limit<f64> {
        self.animation.options.duration
    }
}

impl Animation for SkeletalPlayer {
    fn lifecycle(&self) -> &Lifecycle {
        self.playback.lifecycle()
    }

    fn lifecycle_mut(&mut self) -> &mut Lifecycle {
        self.playback.lifecycle_mut()
    }

    fn start(&mut self) -> AnimationResult<()> {
        self.playback.start();
        Ok(())
    }

    fn update(&mut self, dt: f64) -> AnimationResult<f64> {
        let Self {
            playback,
            animation,
            skeleton,
        } = self;
        Ok(playback.advance_with(dt, |position, playhead| {
            let time = match animation.options.duration {
                Limit::Finite(duration) => position * duration,
                Limit::Infinite => playhead.running_time(),
            };
            animation.apply_at(time, &mut skeleton.lock());
        }))
    }

    fn stop(&mut self) {
        self.playback.stop();
    }

    fn total_duration(&self) -> Limit<f64> {
        self.playback.total_duration()
    }
}
