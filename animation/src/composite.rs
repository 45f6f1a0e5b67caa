use std::fmt;

use log::{debug, warn};

use crate::{Animation, Frame, Lifecycle, Limit, Result, State};

type Child = Box<dyn Animation>;

/// Runs its children one after another.
///
/// A child is started once its predecessor completed and receives the ticks its predecessor did
/// not consume.
pub struct Sequential {
    lifecycle: Lifecycle,
    children: Vec<Child>,
    current: usize,
    elapsed: f64,
}

impl fmt::Debug for Sequential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sequential")
            .field("lifecycle", &self.lifecycle)
            .field("children", &self.children.len())
            .field("current", &self.current)
            .field("elapsed", &self.elapsed)
            .finish()
    }
}

impl Default for Sequential {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl Sequential {
    pub fn new(children: Vec<Child>) -> Self {
        Self {
            lifecycle: Lifecycle::new(),
            children,
            current: 0,
            elapsed: 0.0,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.lifecycle.set_name(name);
        self
    }

    /// Append a child. Children can only be added before the sequence started.
    pub fn with(mut self, child: impl Animation + 'static) -> Self {
        debug_assert_eq!(self.lifecycle.state(), State::Idle);
        self.children.push(Box::new(child));
        self
    }

    pub fn children(&self) -> &[Child] {
        &self.children
    }

    pub fn child_mut(&mut self, index: usize) -> Option<&mut Child> {
        self.children.get_mut(index)
    }

    /// Index of the running child, `None` if none is.
    pub fn current(&self) -> Option<usize> {
        (self.lifecycle.is_running() && self.current < self.children.len()).then_some(self.current)
    }

    /// Start the current child and skip children that complete on start.
    fn start_current(&mut self) -> Result<()> {
        while let Some(child) = self.children.get_mut(self.current) {
            child.start()?;
            if !child.is_completed() {
                break;
            }
            self.current += 1;
        }
        Ok(())
    }
}

impl Animation for Sequential {
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
        self.current = 0;
        self.elapsed = 0.0;
        self.lifecycle.initialize(frame(0.0));
        self.lifecycle.begin(frame(0.0));
        let started = self.start_current();
        stop_on_error(self, started)?;
        if self.current == self.children.len() {
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
        let advanced = self.advance(dt);
        stop_on_error(self, advanced)
    }

    /// Stops the running child. Children that did not start yet are left alone.
    fn stop(&mut self) {
        if let Some(child) = self.children.get_mut(self.current)
            && child.state() != State::Idle
        {
            child.stop();
        }
        self.lifecycle.complete(frame(self.elapsed));
    }

    fn total_duration(&self) -> Limit<f64> {
        self.children
            .iter()
            .map(|child| child.total_duration())
            .try_fold(0.0, |total, duration| duration.finite().map(|d| total + d))
            .map_or(Limit::Infinite, Limit::Finite)
    }
}

impl Sequential {
    fn advance(&mut self, dt: f64) -> Result<f64> {
        self.elapsed += dt;

        let mut remaining = dt;
        while let Some(child) = self.children.get_mut(self.current) {
            remaining = child.update(remaining)?;
            if !child.is_completed() {
                break;
            }
            debug!("Sequence child {} completed", self.current);
            self.current += 1;
            self.start_current()?;
        }

        self.lifecycle.update(frame(self.elapsed));
        if self.current < self.children.len() {
            return Ok(0.0);
        }
        self.lifecycle.complete(frame(self.elapsed - remaining));
        Ok(remaining)
    }
}

/// Runs its children at the same time and completes when all of them completed.
///
/// Every child keeps its own timing, so delays can be used to stagger them.
pub struct Concurrent {
    lifecycle: Lifecycle,
    children: Vec<Child>,
    elapsed: f64,
}

impl fmt::Debug for Concurrent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Concurrent")
            .field("lifecycle", &self.lifecycle)
            .field("children", &self.children.len())
            .field("elapsed", &self.elapsed)
            .finish()
    }
}

impl Default for Concurrent {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl Concurrent {
    pub fn new(children: Vec<Child>) -> Self {
        Self {
            lifecycle: Lifecycle::new(),
            children,
            elapsed: 0.0,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.lifecycle.set_name(name);
        self
    }

    pub fn with(mut self, child: impl Animation + 'static) -> Self {
        debug_assert_eq!(self.lifecycle.state(), State::Idle);
        self.children.push(Box::new(child));
        self
    }

    pub fn children(&self) -> &[Child] {
        &self.children
    }

    pub fn child_mut(&mut self, index: usize) -> Option<&mut Child> {
        self.children.get_mut(index)
    }

    fn all_completed(&self) -> bool {
        self.children.iter().all(|child| child.is_completed())
    }
}

impl Animation for Concurrent {
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
        let started = self
            .children
            .iter_mut()
            .try_for_each(|child| child.start());
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

        // The smallest remainder belongs to the child that completed last.
        let mut remaining = dt;
        let mut updated = Ok(());
        for child in &mut self.children {
            if child.is_completed() {
                continue;
            }
            match child.update(dt) {
                Ok(rest) if child.is_completed() => remaining = remaining.min(rest),
                Ok(_) => {}
                Err(error) => {
                    updated = Err(error);
                    break;
                }
            }
        }
        stop_on_error(self, updated)?;

        self.lifecycle.update(frame(self.elapsed));
        if !self.all_completed() {
            return Ok(0.0);
        }
        self.lifecycle.complete(frame(self.elapsed - remaining));
        Ok(remaining)
    }

    fn stop(&mut self) {
        for child in &mut self.children {
            if child.lifecycle().is_running() {
                child.stop();
            }
        }
        self.lifecycle.complete(frame(self.elapsed));
    }

    fn total_duration(&self) -> Limit<f64> {
        self.children
            .iter()
            .map(|child| child.total_duration())
            .try_fold(0.0f64, |longest, duration| {
                duration.finite().map(|d| longest.max(d))
            })
            .map_or(Limit::Infinite, Limit::Finite)
    }
}

/// Stop `composite` if `result` is an error, so it does not keep running without progress.
pub(crate) fn stop_on_error<T>(composite: &mut impl Animation, result: Result<T>) -> Result<T> {
    if let Err(error) = &result {
        warn!(
            "{} stopped: {error}",
            composite.lifecycle().name().unwrap_or("Composite")
        );
        composite.stop();
    }
    result
}

/// Composites report their elapsed time only, they have no position of their own.
pub(crate) fn frame(elapsed: f64) -> Frame {
    Frame {
        elapsed,
        ..Frame::default()
    }
}
