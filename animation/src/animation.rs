use crate::{Lifecycle, Limit, Plugin, Result, State};

/// The contract every animation follows, leaves and composites alike.
///
/// Time only advances through [`Animation::update`]: there is no internal clock and nothing runs
/// in the background.
pub trait Animation {
    fn lifecycle(&self) -> &Lifecycle;
    fn lifecycle_mut(&mut self) -> &mut Lifecycle;

    /// Leave `Idle`. Resolves everything the animation needs to write to its targets.
    ///
    /// Starting an animation that is not idle does nothing.
    fn start(&mut self) -> Result<()>;

    /// Advance by `dt` driver ticks.
    ///
    /// Returns the part of `dt` that was not consumed. This is zero while the animation is
    /// running or paused, the overshoot past the end if the animation completed during this call,
    /// and `dt` itself if the animation is idle or already completed.
    fn update(&mut self, dt: f64) -> Result<f64>;

    /// Complete immediately. Fires `end` if the animation was not completed yet.
    fn stop(&mut self);

    /// Driver ticks from start to completion.
    fn total_duration(&self) -> Limit<f64>;

    fn state(&self) -> State {
        self.lifecycle().state()
    }

    fn is_completed(&self) -> bool {
        self.state() == State::Completed
    }

    fn pause(&mut self) {
        self.lifecycle_mut().pause();
    }

    fn resume(&mut self) {
        self.lifecycle_mut().resume();
    }

    fn is_paused(&self) -> bool {
        self.lifecycle().is_paused()
    }

    fn add_plugin(&mut self, plugin: Box<dyn Plugin>) -> usize {
        self.lifecycle_mut().add_plugin(plugin)
    }
}

impl<A: Animation + ?Sized> Animation for Box<A> {
    fn lifecycle(&self) -> &Lifecycle {
        (**self).lifecycle()
    }

    fn lifecycle_mut(&mut self) -> &mut Lifecycle {
        (**self).lifecycle_mut()
    }

    fn start(&mut self) -> Result<()> {
        (**self).start()
    }

    fn update(&mut self, dt: f64) -> Result<f64> {
        (**self).update(dt)
    }

    fn stop(&mut self) {
        (**self).stop()
    }

    fn total_duration(&self) -> Limit<f64> {
        (**self).total_duration()
    }
}
