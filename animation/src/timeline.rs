use std::fmt;

use log::debug;

use crate::{
    Animation, Lifecycle, Limit, Result, State,
    composite::{frame, stop_on_error},
};

/// A child of a [`Timeline`] together with its start offset.
struct Entry {
    offset: f64,
    animation: Box<dyn Animation>,
}

/// Places its children at explicit offsets relative to its own elapsed time.
///
/// A child is started when the elapsed time reaches its offset and receives only the part of
/// the tick past the offset. Before that it is not touched at all.
#[derive(Default)]
pub struct Timeline {
    lifecycle: Lifecycle,
    entries: Vec<Entry>,
    elapsed: f64,
}

impl fmt::Debug for Timeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Timeline")
            .field("lifecycle", &self.lifecycle)
            .field(
                "offsets",
                &self.entries.iter().map(|e| e.offset).collect::<Vec<_>>(),
            )
            .field("elapsed", &self.elapsed)
            .finish()
    }
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.lifecycle.set_name(name);
        self
    }

    /// Add a child starting at `offset` driver ticks. Negative offsets are treated as zero.
    pub fn at(mut self, offset: f64, animation: impl Animation + 'static) -> Self {
        self.insert(offset, Box::new(animation));
        self
    }

    pub fn insert(&mut self, offset: f64, animation: Box<dyn Animation>) {
        debug_assert_eq!(self.lifecycle.state(), State::Idle);
        self.entries.push(Entry {
            offset: offset.max(0.0),
            animation,
        });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn child(&self, index: usize) -> Option<&dyn Animation> {
        self.entries.get(index).map(|e| e.animation.as_ref())
    }

    pub fn child_mut(&mut self, index: usize) -> Option<&mut Box<dyn Animation>> {
        self.entries.get_mut(index).map(|e| &mut e.animation)
    }

    pub fn offset(&self, index: usize) -> Option<f64> {
        self.entries.get(index).map(|e| e.offset)
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    fn all_completed(&self) -> bool {
        self.entries.iter().all(|e| e.animation.is_completed())
    }

    /// Start and update the children whose offset was reached. Returns the remainder of the child
    /// that completed last in this tick, or `dt`.
    fn propagate(&mut self, dt: f64) -> Result<f64> {
        let elapsed = self.elapsed;
        let mut remaining = dt;
        for (index, entry) in self.entries.iter_mut().enumerate() {
            let animation = &mut entry.animation;
            if elapsed < entry.offset || animation.is_completed() {
                continue;
            }
            let child_dt = if animation.state() == State::Idle {
                debug!("Timeline child {index} starts at {}", entry.offset);
                animation.start()?;
                elapsed - entry.offset
            } else {
                dt
            };
            let rest = animation.update(child_dt)?;
            if animation.is_completed() {
                remaining = remaining.min(rest);
            }
        }
        Ok(remaining)
    }
}

impl Animation for Timeline {
    fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    fn lifecycle_mut(&mut self) -> &mut Lifecycle {
        &mut self.lifecycle
    }

    fn start(&mut self) -> Result<()> {
        if self.lifecycle.state() != State::Idle {
            return Ok(());
        }
        self.elapsed = 0.0;
        self.lifecycle.initialize(frame(0.0));
        self.lifecycle.begin(frame(0.0));
        // Children at offset zero start right away.
        let started = self.propagate(0.0);
        stop_on_error(self, started)?;
        if self.all_completed() {
            self.lifecycle.complete(frame(0.0));
        }
        Ok(())
    }

    fn update(&mut self, dt: f64) -> Result<f64> {
        if !self.lifecycle.is_running() {
            return Ok(dt);
        }
        if self.lifecycle.is_paused() {
            return Ok(0.0);
        }
        self.elapsed += dt;
        let propagated = self.propagate(dt);
        let remaining = stop_on_error(self, propagated)?;

        self.lifecycle.update(frame(self.elapsed));
        if !self.all_completed() {
            return Ok(0.0);
        }
        self.lifecycle.complete(frame(self.elapsed - remaining));
        Ok(remaining)
    }

    /// Stops the running children, children whose offset was not reached never start.
    fn stop(&mut self) {
        for entry in &mut self.entries {
            if entry.animation.lifecycle().is_running() {
                entry.animation.stop();
            }
        }
        self.lifecycle.complete(frame(self.elapsed));
    }

    fn total_duration(&self) -> Limit<f64> {
        self.entries
            .iter()
            .try_fold(0.0f64, |end, entry| {
                entry
                    .animation
                    .total_duration()
                    .finite()
                    .map(|d| end.max(entry.offset + d))
            })
            .map_or(Limit::Infinite, Limit::Finite)
    }
}
