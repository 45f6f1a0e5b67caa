use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

use crate::Easing;

/// A count or a length that may be unbounded.
///
/// The unbounded case is a separate variant so that it can never take part in ordinary
/// arithmetic. It is persisted as the string `"infinity"`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Limit<T> {
    Finite(T),
    Infinite,
}

impl<T: Copy> Limit<T> {
    pub fn finite(&self) -> Option<T> {
        match self {
            Limit::Finite(v) => Some(*v),
            Limit::Infinite => None,
        }
    }

    pub fn is_infinite(&self) -> bool {
        matches!(self, Limit::Infinite)
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Limit<U> {
        match self {
            Limit::Finite(v) => Limit::Finite(f(v)),
            Limit::Infinite => Limit::Infinite,
        }
    }
}

impl<T> From<T> for Limit<T> {
    fn from(value: T) -> Self {
        Limit::Finite(value)
    }
}

const INFINITY: &str = "infinity";

impl<T: Serialize> Serialize for Limit<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Limit::Finite(v) => v.serialize(serializer),
            Limit::Infinite => serializer.serialize_str(INFINITY),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Limit<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr<T> {
            Finite(T),
            Word(String),
        }

        match Repr::<T>::deserialize(deserializer)? {
            Repr::Finite(v) => Ok(Limit::Finite(v)),
            Repr::Word(word) if word == INFINITY => Ok(Limit::Infinite),
            Repr::Word(word) => Err(de::Error::invalid_value(
                de::Unexpected::Str(&word),
                &"a number or \"infinity\"",
            )),
        }
    }
}

/// The unit in which durations and elapsed ticks are expressed.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TimeMode {
    Milliseconds,
    #[default]
    Seconds,
    /// Ticks count frames. Durations and delays are seconds; elapsed frames are quantized to whole
    /// frames and divided by the frame rate.
    Frames,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PlayMode {
    #[default]
    Forward,
    Backward,
    /// Forward on even cycles, backward on odd ones.
    Yoyo,
}

impl PlayMode {
    /// Apply the play direction to the raw progress of the given cycle.
    pub fn apply(self, raw: f64, cycle: u32) -> f64 {
        match self {
            PlayMode::Forward => raw,
            PlayMode::Backward => 1.0 - raw,
            PlayMode::Yoyo if cycle % 2 == 0 => raw,
            PlayMode::Yoyo => 1.0 - raw,
        }
    }
}

/// Timing configuration of one animation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlaybackOptions {
    pub duration: Limit<f64>,
    pub delay: f64,
    pub fps: u32,
    pub time_scale: f64,
    pub easing: Easing,
    /// Additional cycles after the first one.
    pub repeat: Limit<u32>,
    pub repeat_delay: f64,
    pub time_mode: TimeMode,
    pub play_mode: PlayMode,
}

impl Default for PlaybackOptions {
    fn default() -> Self {
        Self {
            duration: Limit::Finite(1.0),
            delay: 0.0,
            fps: 60,
            time_scale: 1.0,
            easing: Easing::Linear,
            repeat: Limit::Finite(0),
            repeat_delay: 0.0,
            time_mode: TimeMode::Seconds,
            play_mode: PlayMode::Forward,
        }
    }
}

impl PlaybackOptions {
    pub fn with_duration(duration: f64) -> Self {
        Self {
            duration: Limit::Finite(duration),
            ..Default::default()
        }
    }

    /// Options of a single cycle that never completes by time.
    pub fn infinite() -> Self {
        Self {
            duration: Limit::Infinite,
            ..Default::default()
        }
    }

    pub fn delay(mut self, delay: f64) -> Self {
        self.delay = delay;
        self
    }

    pub fn fps(mut self, fps: u32) -> Self {
        self.fps = fps;
        self
    }

    pub fn time_scale(mut self, time_scale: f64) -> Self {
        self.time_scale = time_scale;
        self
    }

    pub fn easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn repeat(mut self, repeat: u32) -> Self {
        self.repeat = Limit::Finite(repeat);
        self
    }

    pub fn repeat_forever(mut self) -> Self {
        self.repeat = Limit::Infinite;
        self
    }

    pub fn repeat_delay(mut self, repeat_delay: f64) -> Self {
        self.repeat_delay = repeat_delay;
        self
    }

    pub fn time_mode(mut self, time_mode: TimeMode) -> Self {
        self.time_mode = time_mode;
        self
    }

    pub fn play_mode(mut self, play_mode: PlayMode) -> Self {
        self.play_mode = play_mode;
        self
    }

    /// Number of cycles, `Infinite` if repeating forever.
    pub fn cycles(&self) -> Limit<u32> {
        self.repeat.map(|r| r.saturating_add(1))
    }

    /// Convert accumulated, already scaled driver ticks into local time.
    pub fn local_time(&self, scaled_ticks: f64) -> f64 {
        match self.time_mode {
            TimeMode::Milliseconds | TimeMode::Seconds => scaled_ticks,
            TimeMode::Frames if self.fps == 0 => 0.0,
            TimeMode::Frames => scaled_ticks.floor() / f64::from(self.fps),
        }
    }

    /// Convert a local time span back into driver ticks. `None` if no amount of ticks reaches it.
    pub fn driver_ticks(&self, local: f64) -> Option<f64> {
        if self.time_scale <= 0.0 {
            return None;
        }
        let scaled = match self.time_mode {
            TimeMode::Milliseconds | TimeMode::Seconds => local,
            TimeMode::Frames if self.fps == 0 => return None,
            TimeMode::Frames => local * f64::from(self.fps),
        };
        Some(scaled / self.time_scale)
    }

    /// Local time from the start until all cycles are finished: delay, all cycles and the repeat
    /// delays between them.
    pub fn local_span(&self) -> Limit<f64> {
        match (self.duration, self.cycles()) {
            (Limit::Finite(duration), Limit::Finite(cycles)) => {
                let cycles = f64::from(cycles);
                Limit::Finite(
                    self.delay + cycles * duration.max(0.0) + (cycles - 1.0) * self.repeat_delay,
                )
            }
            _ => Limit::Infinite,
        }
    }

    /// [`Self::local_span`] in driver ticks.
    pub fn total_duration(&self) -> Limit<f64> {
        match self.local_span() {
            Limit::Finite(local) => self
                .driver_ticks(local)
                .map_or(Limit::Infinite, Limit::Finite),
            Limit::Infinite => Limit::Infinite,
        }
    }
}

impl fmt::Display for Limit<f64> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Limit::Finite(v) => write!(f, "{v}"),
            Limit::Infinite => f.write_str(INFINITY),
        }
    }
}
