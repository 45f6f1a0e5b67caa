//! Easing curves.
//!
//! Formulas adapted from: <https://github.com/pistondevelopers/interpolation> version 0.3.0
//!
//! Every curve maps 0 to 0 and 1 to 1. Inputs are clamped to `0..=1`, outputs are not: elastic and
//! back curves overshoot.

use std::f64::consts::{PI, TAU};

use serde::{Deserialize, Serialize};

#[allow(missing_docs)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Easing {
    #[default]
    Linear,

    QuadraticIn,
    QuadraticOut,
    QuadraticInOut,

    CubicIn,
    CubicOut,
    CubicInOut,

    QuarticIn,
    QuarticOut,
    QuarticInOut,

    QuinticIn,
    QuinticOut,
    QuinticInOut,

    SineIn,
    SineOut,
    SineInOut,

    CircularIn,
    CircularOut,
    CircularInOut,

    ExponentialIn,
    ExponentialOut,
    ExponentialInOut,

    ElasticIn,
    ElasticOut,
    ElasticInOut,

    BackIn,
    BackOut,
    BackInOut,

    BounceIn,
    BounceOut,
    BounceInOut,
}

impl Easing {
    /// Map raw progress `t` to eased progress.
    pub fn apply(self, t: f64) -> f64 {
        use Easing::*;

        let p = t.clamp(0.0, 1.0);
        match self {
            Linear => p,

            QuadraticIn => p * p,
            QuadraticOut => -(p * (p - 2.0)),
            QuadraticInOut => in_out(p, |p| p * p),

            CubicIn => p * p * p,
            CubicOut => {
                let f = p - 1.0;
                f * f * f + 1.0
            }
            CubicInOut => in_out(p, |p| p * p * p),

            QuarticIn => p.powi(4),
            QuarticOut => 1.0 - (1.0 - p).powi(4),
            QuarticInOut => in_out(p, |p| p.powi(4)),

            QuinticIn => p.powi(5),
            QuinticOut => (p - 1.0).powi(5) + 1.0,
            QuinticInOut => in_out(p, |p| p.powi(5)),

            SineIn => 1.0 - (p * PI / 2.0).cos(),
            SineOut => (p * PI / 2.0).sin(),
            SineInOut => 0.5 * (1.0 - (p * PI).cos()),

            CircularIn => 1.0 - (1.0 - p * p).sqrt(),
            CircularOut => ((2.0 - p) * p).sqrt(),
            CircularInOut => in_out(p, |p| 1.0 - (1.0 - p * p).sqrt()),

            ExponentialIn => exponential_in(p),
            ExponentialOut => 1.0 - exponential_in(1.0 - p),
            ExponentialInOut => in_out(p, exponential_in),

            ElasticIn => elastic_in(p),
            ElasticOut => 1.0 - elastic_in(1.0 - p),
            ElasticInOut => in_out(p, elastic_in),

            BackIn => back_in(p),
            BackOut => 1.0 - back_in(1.0 - p),
            BackInOut => in_out(p, back_in),

            BounceIn => 1.0 - bounce_out(1.0 - p),
            BounceOut => bounce_out(p),
            BounceInOut => {
                if p < 0.5 {
                    0.5 * (1.0 - bounce_out(1.0 - p * 2.0))
                } else {
                    0.5 * bounce_out(p * 2.0 - 1.0) + 0.5
                }
            }
        }
    }
}

/// Mirror an "in" curve into an "in-out" curve.
fn in_out(p: f64, ease_in: impl Fn(f64) -> f64) -> f64 {
    if p < 0.5 {
        0.5 * ease_in(2.0 * p)
    } else {
        1.0 - 0.5 * ease_in(2.0 - 2.0 * p)
    }
}

fn exponential_in(p: f64) -> f64 {
    if p <= 0.0 {
        0.0
    } else {
        2f64.powf(10.0 * (p - 1.0))
    }
}

fn elastic_in(p: f64) -> f64 {
    (13.0 * TAU / 4.0 * p).sin() * 2f64.powf(10.0 * (p - 1.0))
}

fn back_in(p: f64) -> f64 {
    p * p * p - p * (p * PI).sin()
}

fn bounce_out(p: f64) -> f64 {
    if p < 4.0 / 11.0 {
        (121.0 * p * p) / 16.0
    } else if p < 8.0 / 11.0 {
        (363.0 / 40.0 * p * p) - (99.0 / 10.0 * p) + 17.0 / 5.0
    } else if p < 9.0 / 10.0 {
        (4356.0 / 361.0 * p * p) - (35442.0 / 1805.0 * p) + 16061.0 / 1805.0
    } else {
        (54.0 / 5.0 * p * p) - (513.0 / 25.0 * p) + 268.0 / 25.0
    }
}
