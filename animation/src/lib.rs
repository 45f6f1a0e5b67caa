//! Frame driven animations: easing, interpolation over value domains, tweens of shared targets and
//! composites that schedule other animations.
//!
//! Nothing in here owns a clock. Time advances only through [`Animation::update`], usually driven
//! by a [`Tickery`] from the application's frame loop.

mod accessor;
mod animation;
mod composite;
mod easing;
mod error;
mod evaluator;
mod lifecycle;
mod options;
mod playback;
mod playhead;
mod plugin;
mod session;
mod tickery;
mod timeline;
mod tween;
mod value_tween;

pub use accessor::*;
pub use animation::*;
pub use composite::{Concurrent, Sequential};
pub use easing::*;
pub use error::{Error, Result};
pub use evaluator::*;
pub use lifecycle::*;
pub use options::*;
pub use playback::*;
pub use playhead::*;
pub use plugin::*;
pub use session::*;
pub use tickery::*;
pub use timeline::*;
pub use tween::*;
pub use value_tween::*;
