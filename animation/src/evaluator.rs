use kinema_geometry::{PackedColor, Vector2, Vector3, Vector4};
use serde::{Deserialize, Serialize};

/// Arithmetic used to combine a start value with a target value.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CombineOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    /// The target is taken as is.
    #[default]
    None,
}

impl CombineOp {
    pub fn apply(self, from: f64, to: f64) -> f64 {
        match self {
            CombineOp::Add => from + to,
            CombineOp::Sub => from - to,
            CombineOp::Mul => from * to,
            CombineOp::Div => from / to,
            CombineOp::Mod => from % to,
            CombineOp::None => to,
        }
    }

    /// Integer variant used for packed channels. Division and remainder by zero yield zero.
    fn apply_int(self, from: i64, to: i64) -> i64 {
        match self {
            CombineOp::Add => from + to,
            CombineOp::Sub => from - to,
            CombineOp::Mul => from * to,
            CombineOp::Div => from.checked_div(to).unwrap_or(0),
            CombineOp::Mod => from.checked_rem(to).unwrap_or(0),
            CombineOp::None => to,
        }
    }
}

/// Interpolation and combination over one value domain.
///
/// `position` is never clamped, so easing curves that overshoot produce values outside of the
/// `from`..`to` range.
pub trait Evaluator: Clone {
    fn evaluate(position: f64, from: &Self, to: &Self) -> Self;
    fn calculate(op: CombineOp, from: &Self, to: &Self) -> Self;
}

impl Evaluator for f64 {
    fn evaluate(position: f64, from: &Self, to: &Self) -> Self {
        from + position * (to - from)
    }

    fn calculate(op: CombineOp, from: &Self, to: &Self) -> Self {
        op.apply(*from, *to)
    }
}

impl Evaluator for f32 {
    fn evaluate(position: f64, from: &Self, to: &Self) -> Self {
        from + (position as f32) * (to - from)
    }

    fn calculate(op: CombineOp, from: &Self, to: &Self) -> Self {
        op.apply((*from).into(), (*to).into()) as f32
    }
}

impl Evaluator for PackedColor {
    fn evaluate(position: f64, from: &Self, to: &Self) -> Self {
        from.zip_channels(*to, |a, b| {
            f64::evaluate(position, &(a as f64), &(b as f64)) as i64
        })
    }

    fn calculate(op: CombineOp, from: &Self, to: &Self) -> Self {
        from.zip_channels(*to, |a, b| op.apply_int(a, b))
    }
}

macro_rules! impl_vector_evaluator {
    ($vector:ty, $($component:ident),+) => {
        impl Evaluator for $vector {
            fn evaluate(position: f64, from: &Self, to: &Self) -> Self {
                <$vector>::new($(f64::evaluate(position, &from.$component, &to.$component)),+)
            }

            fn calculate(op: CombineOp, from: &Self, to: &Self) -> Self {
                <$vector>::new($(op.apply(from.$component, to.$component)),+)
            }
        }
    };
}

impl_vector_evaluator!(Vector2, x, y);
impl_vector_evaluator!(Vector3, x, y, z);
impl_vector_evaluator!(Vector4, x, y, z, w);

pub fn evaluate<T: Evaluator>(position: f64, from: &T, to: &T) -> T {
    T::evaluate(position, from, to)
}

pub fn calculate<T: Evaluator>(op: CombineOp, from: &T, to: &T) -> T {
    T::calculate(op, from, to)
}
