use std::{any, sync::Arc};

use log::{debug, warn};

use crate::{
    Accessor, AccessorRegistry, Animation, CombineOp, Error, Evaluator, Lifecycle, Limit,
    PlaybackOptions, Playback, Result, SelfAccessor, Shared, State, Tweenable,
};

/// Animates up to a configured number of float channels of a shared target.
///
/// Created through [`crate::AnimationSession::tween`]. The start values are read from the target
/// when the tween starts, so changes made to the target before that are picked up.
pub struct PropertyTween<T: 'static> {
    playback: Playback,
    registry: Arc<AccessorRegistry>,
    own_accessor: Option<Arc<dyn Accessor<T>>>,
    accessor: Option<Arc<dyn Accessor<T>>>,
    target: Shared<T>,
    tag: u32,
    op: CombineOp,
    limit: usize,
    targets: Vec<f32>,
    from: Vec<f32>,
    to: Vec<f32>,
    values: Vec<f32>,
}

impl<T: 'static> PropertyTween<T> {
    pub(crate) fn new(
        registry: Arc<AccessorRegistry>,
        limit: usize,
        target: Shared<T>,
        tag: u32,
        targets: Vec<f32>,
        options: PlaybackOptions,
    ) -> Self {
        Self {
            playback: Playback::new(options),
            registry,
            own_accessor: None,
            accessor: None,
            target,
            tag,
            op: CombineOp::None,
            limit,
            targets,
            from: Vec::new(),
            to: Vec::new(),
            values: Vec::new(),
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.playback.lifecycle_mut().set_name(name);
        self
    }

    /// Combine the target values with the start values, for example [`CombineOp::Add`] to move
    /// relative to where the target is when the tween starts.
    pub fn combine(mut self, op: CombineOp) -> Self {
        self.op = op;
        self
    }

    /// Use the target's own [`Tweenable`] implementation if no accessor is registered for `T`.
    pub fn self_accessing(mut self) -> Self
    where
        T: Tweenable,
    {
        self.own_accessor = Some(Arc::new(SelfAccessor));
        self
    }

    pub fn target(&self) -> &Shared<T> {
        &self.target
    }

    pub fn tag(&self) -> u32 {
        self.tag
    }

    pub fn options(&self) -> &PlaybackOptions {
        self.playback.options()
    }

    /// `None` once the tween started.
    pub fn options_mut(&mut self) -> Option<&mut PlaybackOptions> {
        self.playback.options_mut()
    }

    /// The values captured at start, empty before.
    pub fn from_values(&self) -> &[f32] {
        &self.from
    }

    /// The effective target values, empty before start.
    pub fn to_values(&self) -> &[f32] {
        &self.to
    }

    fn capture(&mut self, accessor: &dyn Accessor<T>) {
        let mut buffer = vec![0.0; self.limit];
        let read = accessor.get(&self.target.lock(), self.tag, &mut buffer);
        let channels = self.targets.len();
        if read < channels {
            warn!(
                "Accessor for `{}` provides {read} channels for tag {}, {channels} are animated",
                any::type_name::<T>(),
                self.tag
            );
        }
        buffer.truncate(channels);
        self.to = self
            .targets
            .iter()
            .zip(&buffer)
            .map(|(to, from)| f32::calculate(self.op, from, to))
            .collect();
        self.values = buffer.clone();
        self.from = buffer;
    }
}

impl<T: 'static> Animation for PropertyTween<T> {
    fn lifecycle(&self) -> &Lifecycle {
        self.playback.lifecycle()
    }

    fn lifecycle_mut(&mut self) -> &mut Lifecycle {
        self.playback.lifecycle_mut()
    }

    fn start(&mut self) -> Result<()> {
        if self.state() != State::Idle {
            return Ok(());
        }
        let accessor = self
            .registry
            .resolve::<T>(self.own_accessor.as_ref())
            .ok_or(Error::AccessorNotFound {
                type_name: any::type_name::<T>(),
            })?;
        self.capture(accessor.as_ref());
        debug!(
            "Tween on `{}` tag {}: {:?} -> {:?}",
            any::type_name::<T>(),
            self.tag,
            self.from,
            self.to
        );
        self.accessor = Some(accessor);
        self.playback.start();
        Ok(())
    }

    fn update(&mut self, dt: f64) -> Result<f64> {
        let Self {
            playback,
            accessor,
            target,
            tag,
            from,
            to,
            values,
            ..
        } = self;
        Ok(playback.advance(dt, |position| {
            let Some(accessor) = accessor else {
                return;
            };
            for ((value, from), to) in values.iter_mut().zip(from.iter()).zip(to.iter()) {
                *value = f32::evaluate(position, from, to);
            }
            accessor.set(&mut target.lock(), *tag, values);
        }))
    }

    fn stop(&mut self) {
        self.playback.stop();
    }

    fn total_duration(&self) -> Limit<f64> {
        self.playback.total_duration()
    }
}
