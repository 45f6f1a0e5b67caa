use log::{debug, trace};

use crate::{Frame, Lifecycle, Limit, PlaybackOptions, Playhead, Progress, State};

/// A [`Lifecycle`] driven by a [`Playhead`].
///
/// This is the timing core of every leaf animation: it decides when the delay is over, when to
/// write a position to the target and when the last cycle is done. What a position means is up to
/// the owner, which receives it through the `apply` callback of [`Playback::advance`].
#[derive(Debug)]
pub struct Playback {
    lifecycle: Lifecycle,
    playhead: Playhead,
}

impl Playback {
    pub fn new(options: PlaybackOptions) -> Self {
        Self {
            lifecycle: Lifecycle::new(),
            playhead: Playhead::new(options),
        }
    }

    pub fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    pub fn lifecycle_mut(&mut self) -> &mut Lifecycle {
        &mut self.lifecycle
    }

    pub fn playhead(&self) -> &Playhead {
        &self.playhead
    }

    pub fn options(&self) -> &PlaybackOptions {
        self.playhead.options()
    }

    /// Options can only be changed before the animation started.
    pub fn options_mut(&mut self) -> Option<&mut PlaybackOptions> {
        (self.lifecycle.state() == State::Idle).then(|| self.playhead.options_mut())
    }

    pub fn total_duration(&self) -> Limit<f64> {
        self.playhead.options().total_duration()
    }

    /// Leave `Idle`. Without delay the animation begins right away.
    pub fn start(&mut self) -> bool {
        self.playhead.rewind();
        if !self.lifecycle.initialize(self.frame(None)) {
            return false;
        }
        debug!(
            "{}: starts, total duration {}",
            self.lifecycle.name().unwrap_or("animation"),
            self.total_duration()
        );
        if self.playhead.delay_elapsed() {
            self.lifecycle.begin(self.frame(None));
        }
        true
    }

    /// Advance by `dt` driver ticks and call `apply` with the new position if there is one.
    ///
    /// Returns the unconsumed ticks, see [`crate::Animation::update`].
    pub fn advance(&mut self, dt: f64, apply: impl FnOnce(f64)) -> f64 {
        self.advance_with(dt, |position, _| apply(position))
    }

    /// [`Playback::advance`], but `apply` also sees the advanced [`Playhead`].
    pub fn advance_with(&mut self, dt: f64, apply: impl FnOnce(f64, &Playhead)) -> f64 {
        if !self.lifecycle.is_running() {
            return dt;
        }
        if self.lifecycle.is_paused() {
            return 0.0;
        }

        self.playhead.advance(dt);
        let progress = self.playhead.progress();
        if progress == Progress::Delayed {
            return 0.0;
        }

        let frame = self.frame(progress.position());
        if self.lifecycle.state() == State::Pending {
            self.lifecycle.begin(frame);
        }

        if let Some(position) = progress.position() {
            trace!(
                "{}: position {position} at {}",
                self.lifecycle.name().unwrap_or("animation"),
                frame.elapsed
            );
            apply(position, &self.playhead);
        }
        self.lifecycle.update(frame);

        if progress.is_finished() {
            self.lifecycle.complete(frame);
            return self.playhead.overflow();
        }
        0.0
    }

    pub fn stop(&mut self) {
        let frame = self.lifecycle.frame();
        self.lifecycle.complete(frame);
    }

    fn frame(&self, position: Option<f64>) -> Frame {
        let cycle = match self.playhead.progress() {
            Progress::Running { cycle, .. } | Progress::Finished { cycle, .. } => cycle,
            Progress::Delayed => 0,
        };
        Frame {
            elapsed: self.playhead.elapsed(),
            cycle,
            position,
        }
    }
}
