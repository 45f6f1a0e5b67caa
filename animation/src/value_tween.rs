use std::fmt;

use crate::{
    Animation, CombineOp, Evaluator, Lifecycle, Limit, PlaybackOptions, Playback, Result,
};

/// Builders for [`ValueTween`].
///
/// ```ignore
/// let tween = interpolate::from(0.0).to(10.0, options).apply(move |v| set_width(v));
/// ```
pub mod interpolate {
    use super::InterpolateFrom;

    pub fn from<V>(from: V) -> InterpolateFrom<V> {
        InterpolateFrom { from }
    }
}

#[derive(Debug)]
pub struct InterpolateFrom<V> {
    from: V,
}

impl<V> InterpolateFrom<V> {
    pub fn to(self, to: V, options: PlaybackOptions) -> InterpolateFromTo<V> {
        InterpolateFromTo {
            from: self.from,
            to,
            op: CombineOp::None,
            options,
        }
    }
}

#[derive(Debug)]
pub struct InterpolateFromTo<V> {
    from: V,
    to: V,
    op: CombineOp,
    options: PlaybackOptions,
}

impl<V> InterpolateFromTo<V> {
    pub fn combine(self, op: CombineOp) -> Self {
        Self { op, ..self }
    }

    pub fn apply<F: FnMut(V)>(self, f: F) -> ValueTween<V, F> {
        ValueTween {
            playback: Playback::new(self.options),
            from: self.from,
            to: self.to,
            op: self.op,
            target: None,
            apply: f,
        }
    }
}

/// Animates a value of any [`Evaluator`] domain and hands every new value to a closure.
pub struct ValueTween<V, F> {
    playback: Playback,
    from: V,
    to: V,
    op: CombineOp,
    /// `calculate(op, from, to)`, fixed at start.
    target: Option<V>,
    apply: F,
}

impl<V: fmt::Debug, F> fmt::Debug for ValueTween<V, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueTween")
            .field("playback", &self.playback)
            .field("from", &self.from)
            .field("to", &self.to)
            .field("op", &self.op)
            .finish()
    }
}

impl<V, F> ValueTween<V, F> {
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.playback.lifecycle_mut().set_name(name);
        self
    }

    pub fn options_mut(&mut self) -> Option<&mut PlaybackOptions> {
        self.playback.options_mut()
    }
}

impl<V: Evaluator, F: FnMut(V)> Animation for ValueTween<V, F> {
    fn lifecycle(&self) -> &Lifecycle {
        self.playback.lifecycle()
    }

    fn lifecycle_mut(&mut self) -> &mut Lifecycle {
        self.playback.lifecycle_mut()
    }

    fn start(&mut self) -> Result<()> {
        if self.playback.start() {
            self.target = Some(V::calculate(self.op, &self.from, &self.to));
        }
        Ok(())
    }

    fn update(&mut self, dt: f64) -> Result<f64> {
        let Self {
            playback,
            from,
            target,
            apply,
            ..
        } = self;
        Ok(playback.advance(dt, |position| {
            if let Some(target) = target {
                apply(V::evaluate(position, from, target));
            }
        }))
    }

    fn stop(&mut self) {
        self.playback.stop();
    }

    fn total_duration(&self) -> Limit<f64> {
        self.playback.total_duration()
    }
}
