use std::fmt;

use crate::Status;

/// Observer hooks into the lifecycle of an animation.
///
/// All hooks default to doing nothing.
pub trait Plugin {
    fn initialize(&mut self, _status: &Status<'_>) {}
    fn begin(&mut self, _status: &Status<'_>) {}
    fn update(&mut self, _status: &Status<'_>) {}
    fn end(&mut self, _status: &Status<'_>) {}
}

/// How far a single plugin got through the lifecycle of its animation.
///
/// Ordered: a plugin that has begun is also initialized.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PluginState {
    Registered,
    Initialized,
    Begun,
    Ended,
}

struct Slot {
    plugin: Box<dyn Plugin>,
    state: PluginState,
}

/// The plugins registered on one animation, together with their individual states.
#[derive(Default)]
pub struct PluginChain {
    slots: Vec<Slot>,
}

impl fmt::Debug for PluginChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.slots.iter().map(|slot| slot.state))
            .finish()
    }
}

impl PluginChain {
    pub fn push(&mut self, plugin: Box<dyn Plugin>) -> usize {
        self.slots.push(Slot {
            plugin,
            state: PluginState::Registered,
        });
        self.slots.len() - 1
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// `true` if the plugin at `index` reached `state`.
    pub fn has_state(&self, index: usize, state: PluginState) -> bool {
        self.slots.get(index).is_some_and(|slot| slot.state >= state)
    }

    pub(crate) fn initialize(&mut self, status: &Status<'_>) {
        for slot in &mut self.slots {
            if slot.state == PluginState::Registered {
                slot.plugin.initialize(status);
                slot.state = PluginState::Initialized;
            }
        }
    }

    pub(crate) fn begin(&mut self, status: &Status<'_>) {
        for slot in &mut self.slots {
            if slot.state == PluginState::Initialized {
                slot.plugin.begin(status);
                slot.state = PluginState::Begun;
            }
        }
    }

    pub(crate) fn update(&mut self, status: &Status<'_>) {
        for slot in &mut self.slots {
            if slot.state >= PluginState::Initialized && slot.state != PluginState::Ended {
                slot.plugin.update(status);
            }
        }
    }

    pub(crate) fn end(&mut self, status: &Status<'_>) {
        for slot in &mut self.slots {
            if slot.state != PluginState::Ended {
                slot.plugin.end(status);
                slot.state = PluginState::Ended;
            }
        }
    }
}
