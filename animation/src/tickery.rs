use std::fmt;

use log::{debug, warn};

use crate::{Animation, Result};

/// Drives root animations from the application's frame loop.
///
/// Animations are started when they are added and dropped once they completed. Each call to
/// [`Tickery::tick`] forwards exactly one update to every animation.
#[derive(Default)]
pub struct Tickery {
    animations: Vec<Box<dyn Animation>>,
}

impl fmt::Debug for Tickery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tickery")
            .field("animations", &self.animations.len())
            .finish()
    }
}

impl Tickery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start `animation` and keep it running until it completes.
    ///
    /// If the animation fails to start, it is not added.
    pub fn add(&mut self, mut animation: impl Animation + 'static) -> Result<()> {
        animation.start()?;
        if animation.is_completed() {
            debug!("Animation completed on start, not scheduled");
            return Ok(());
        }
        self.animations.push(Box::new(animation));
        Ok(())
    }

    pub fn tick(&mut self, dt: f64) {
        self.animations
            .retain_mut(|animation| match animation.update(dt) {
                Ok(_) => !animation.is_completed(),
                Err(e) => {
                    warn!("Animation failed, removing it: {e}");
                    false
                }
            });
    }

    /// `true` if there are animations that need further ticks.
    pub fn wants_ticks(&self) -> bool {
        !self.animations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.animations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.animations.is_empty()
    }

    /// Stop all animations and drop them.
    pub fn stop_all(&mut self) {
        for mut animation in self.animations.drain(..) {
            animation.stop();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::Cell, rc::Rc};

    use super::*;
    use crate::{PlaybackOptions, interpolate};

    #[test]
    fn completed_animations_are_dropped() {
        let last = Rc::new(Cell::new(0.0));
        let l2 = last.clone();
        let mut tickery = Tickery::new();
        tickery
            .add(
                interpolate::from(0.0)
                    .to(2.0, PlaybackOptions::with_duration(2.0))
                    .apply(move |v| l2.set(v)),
            )
            .unwrap();
        tickery
            .add(
                interpolate::from(0.0)
                    .to(1.0, PlaybackOptions::infinite())
                    .apply(|_| {}),
            )
            .unwrap();

        tickery.tick(1.0);
        assert_eq!(tickery.len(), 2);
        tickery.tick(1.0);
        assert_eq!(tickery.len(), 1);
        assert_eq!(last.get(), 2.0);

        tickery.stop_all();
        assert!(!tickery.wants_ticks());
    }

    #[test]
    fn zero_duration_animations_still_run_once() {
        let mut tickery = Tickery::new();
        tickery
            .add(
                interpolate::from(0.0)
                    .to(1.0, PlaybackOptions::with_duration(0.0))
                    .apply(|_| {}),
            )
            .unwrap();
        assert_eq!(tickery.len(), 1);
        tickery.tick(0.0);
        assert!(tickery.is_empty());
    }
}
