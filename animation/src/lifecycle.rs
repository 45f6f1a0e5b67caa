use log::debug;

use crate::{Plugin, PluginChain, PluginState};

/// Lifecycle states shared by all animations.
///
/// `Idle -> Pending -> Active -> Completed`. Pausing is tracked separately and does not change the
/// state.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum State {
    /// Not started yet.
    Idle,
    /// Started, the delay is elapsing.
    Pending,
    /// Cycles or children are running.
    Active,
    /// Terminal.
    Completed,
}

/// Timing details an animation reports to its plugins.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Frame {
    /// Local time since start, including the delay.
    pub elapsed: f64,
    pub cycle: u32,
    /// The eased position, `None` before the first one was computed.
    pub position: Option<f64>,
}

/// What plugins see of an animation.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Status<'a> {
    pub name: Option<&'a str>,
    pub state: State,
    pub paused: bool,
    pub frame: Frame,
}

/// The lifecycle state machine of one animation, including its plugins.
///
/// Every transition fires its hook exactly once. Invalid transitions are ignored and reported by
/// returning `false`.
#[derive(Debug)]
pub struct Lifecycle {
    name: Option<String>,
    state: State,
    paused: bool,
    frame: Frame,
    plugins: PluginChain,
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}

impl Lifecycle {
    pub fn new() -> Self {
        Self {
            name: None,
            state: State::Idle,
            paused: false,
            frame: Frame::default(),
            plugins: PluginChain::default(),
        }
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::new()
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Pending or Active.
    pub fn is_running(&self) -> bool {
        matches!(self.state, State::Pending | State::Active)
    }

    pub fn frame(&self) -> Frame {
        self.frame
    }

    pub fn plugins(&self) -> &PluginChain {
        &self.plugins
    }

    /// `true` if the plugin at `index` reached `state`.
    pub fn plugin_has_state(&self, index: usize, state: PluginState) -> bool {
        self.plugins.has_state(index, state)
    }

    /// Register a plugin and return its index.
    ///
    /// A plugin added to a running animation catches up on the hooks it missed, so that it
    /// receives updates from the next tick on.
    pub fn add_plugin(&mut self, plugin: Box<dyn Plugin>) -> usize {
        let index = self.plugins.push(plugin);
        let status = status(&self.name, self.state, self.paused, self.frame);
        match self.state {
            State::Idle | State::Completed => {}
            State::Pending => self.plugins.initialize(&status),
            State::Active => {
                self.plugins.initialize(&status);
                self.plugins.begin(&status);
            }
        }
        index
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// `Idle -> Pending`, fires `initialize`.
    pub fn initialize(&mut self, frame: Frame) -> bool {
        if self.state != State::Idle {
            return false;
        }
        self.transition(State::Pending, frame);
        let status = status(&self.name, self.state, self.paused, frame);
        self.plugins.initialize(&status);
        true
    }

    /// `Pending -> Active`, fires `begin`.
    pub fn begin(&mut self, frame: Frame) -> bool {
        if self.state != State::Pending {
            return false;
        }
        self.transition(State::Active, frame);
        let status = status(&self.name, self.state, self.paused, frame);
        self.plugins.begin(&status);
        true
    }

    /// Fires `update` for an accepted, non paused tick while Active.
    pub fn update(&mut self, frame: Frame) -> bool {
        if self.state != State::Active || self.paused {
            return false;
        }
        self.frame = frame;
        let status = status(&self.name, self.state, self.paused, frame);
        self.plugins.update(&status);
        true
    }

    /// Any non terminal state `-> Completed`, fires `end`.
    pub fn complete(&mut self, frame: Frame) -> bool {
        if self.state == State::Completed {
            return false;
        }
        self.transition(State::Completed, frame);
        let status = status(&self.name, self.state, self.paused, frame);
        self.plugins.end(&status);
        true
    }

    fn transition(&mut self, to: State, frame: Frame) {
        debug!(
            "{}: {:?} -> {:?} at {}",
            self.name.as_deref().unwrap_or("animation"),
            self.state,
            to,
            frame.elapsed
        );
        self.state = to;
        self.frame = frame;
    }
}

/// Built from individual fields so that the plugin chain can be borrowed mutably alongside.
fn status(name: &Option<String>, state: State, paused: bool, frame: Frame) -> Status<'_> {
    Status {
        name: name.as_deref(),
        state,
        paused,
        frame,
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use super::*;

    #[derive(Default)]
    struct Recorder(Rc<RefCell<Vec<&'static str>>>);

    impl Plugin for Recorder {
        fn initialize(&mut self, _status: &Status<'_>) {
            self.0.borrow_mut().push("initialize");
        }
        fn begin(&mut self, _status: &Status<'_>) {
            self.0.borrow_mut().push("begin");
        }
        fn update(&mut self, _status: &Status<'_>) {
            self.0.borrow_mut().push("update");
        }
        fn end(&mut self, _status: &Status<'_>) {
            self.0.borrow_mut().push("end");
        }
    }

    #[test]
    fn hooks_fire_once_per_transition() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut lifecycle = Lifecycle::named("test");
        lifecycle.add_plugin(Box::new(Recorder(log.clone())));

        assert!(lifecycle.initialize(Frame::default()));
        assert!(!lifecycle.initialize(Frame::default()));
        assert!(lifecycle.begin(Frame::default()));
        assert!(!lifecycle.begin(Frame::default()));
        assert!(lifecycle.update(Frame::default()));
        assert!(lifecycle.complete(Frame::default()));
        assert!(!lifecycle.complete(Frame::default()));
        assert!(!lifecycle.update(Frame::default()));

        assert_eq!(*log.borrow(), ["initialize", "begin", "update", "end"]);
        assert_eq!(lifecycle.state(), State::Completed);
    }

    #[test]
    fn paused_updates_are_not_dispatched() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut lifecycle = Lifecycle::new();
        lifecycle.add_plugin(Box::new(Recorder(log.clone())));
        lifecycle.initialize(Frame::default());
        lifecycle.begin(Frame::default());
        lifecycle.pause();
        assert!(!lifecycle.update(Frame::default()));
        assert_eq!(lifecycle.state(), State::Active);
        lifecycle.resume();
        assert!(lifecycle.update(Frame::default()));
        assert_eq!(log.borrow().iter().filter(|e| **e == "update").count(), 1);
    }

    #[test]
    fn completing_from_idle_still_ends() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut lifecycle = Lifecycle::new();
        lifecycle.add_plugin(Box::new(Recorder(log.clone())));
        assert!(lifecycle.complete(Frame::default()));
        assert_eq!(*log.borrow(), ["end"]);
    }

    #[test]
    fn late_plugins_catch_up() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut lifecycle = Lifecycle::new();
        lifecycle.initialize(Frame::default());
        lifecycle.begin(Frame::default());
        let index = lifecycle.add_plugin(Box::new(Recorder(log.clone())));
        assert!(lifecycle.plugin_has_state(index, PluginState::Initialized));
        assert!(lifecycle.plugin_has_state(index, PluginState::Begun));
        assert!(!lifecycle.plugin_has_state(index, PluginState::Ended));
        lifecycle.update(Frame::default());
        assert_eq!(*log.borrow(), ["initialize", "begin", "update"]);
    }
}
