use crate::{Limit, PlaybackOptions};

/// Where a [`Playhead`] currently is.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Progress {
    /// The delay has not elapsed yet.
    Delayed,
    /// A cycle is running or waiting in its repeat delay.
    Running { cycle: u32, position: f64 },
    /// All cycles are done. `position` is the terminal value of the last cycle.
    Finished { cycle: u32, position: f64 },
}

impl Progress {
    pub fn position(&self) -> Option<f64> {
        match *self {
            Progress::Delayed => None,
            Progress::Running { position, .. } | Progress::Finished { position, .. } => {
                Some(position)
            }
        }
    }

    pub fn is_finished(&self) -> bool {
        matches!(self, Progress::Finished { .. })
    }
}

/// Accumulates driver ticks and maps them to an eased position through [`PlaybackOptions`].
///
/// The position is always derived from the total elapsed time, never from the previous position,
/// so uneven tick sizes produce the same results as even ones.
#[derive(Debug, Clone)]
pub struct Playhead {
    options: PlaybackOptions,
    /// Driver ticks, multiplied by the time scale.
    scaled_ticks: f64,
}

impl Playhead {
    pub fn new(options: PlaybackOptions) -> Self {
        Self {
            options,
            scaled_ticks: 0.0,
        }
    }

    pub fn options(&self) -> &PlaybackOptions {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut PlaybackOptions {
        &mut self.options
    }

    pub fn advance(&mut self, dt: f64) {
        self.scaled_ticks += dt * self.options.time_scale;
    }

    pub fn rewind(&mut self) {
        self.scaled_ticks = 0.0;
    }

    /// Elapsed local time including the delay.
    pub fn elapsed(&self) -> f64 {
        self.options.local_time(self.scaled_ticks)
    }

    /// Elapsed local time since the delay ended, `0.0` while delayed.
    pub fn running_time(&self) -> f64 {
        (self.elapsed() - self.options.delay).max(0.0)
    }

    /// `true` if the delay has fully elapsed.
    pub fn delay_elapsed(&self) -> bool {
        self.elapsed() >= self.options.delay
    }

    pub fn progress(&self) -> Progress {
        let options = &self.options;
        let t = self.elapsed() - options.delay;
        if t < 0.0 {
            return Progress::Delayed;
        }

        let duration = match options.duration {
            Limit::Finite(duration) => duration,
            Limit::Infinite => {
                return Progress::Running {
                    cycle: 0,
                    position: self.shape(0.0, 0),
                };
            }
        };

        let cycles = options.cycles();

        if duration <= 0.0 {
            return match cycles {
                Limit::Finite(cycles) => {
                    let last = cycles.saturating_sub(1);
                    Progress::Finished {
                        cycle: last,
                        position: self.shape(1.0, last),
                    }
                }
                Limit::Infinite => Progress::Running {
                    cycle: 0,
                    position: self.shape(1.0, 0),
                },
            };
        }

        if let Limit::Finite(end) = options.local_span()
            && let Limit::Finite(cycles) = cycles
            && t >= end - options.delay
        {
            let last = cycles.saturating_sub(1);
            return Progress::Finished {
                cycle: last,
                position: self.shape(1.0, last),
            };
        }

        let period = duration + options.repeat_delay.max(0.0);
        let cycle = (t / period).floor();
        let within = t - cycle * period;
        let cycle = cycle.min(f64::from(u32::MAX)) as u32;
        let raw = (within / duration).min(1.0);
        Progress::Running {
            cycle,
            position: self.shape(raw, cycle),
        }
    }

    /// Driver ticks that were not needed to reach the end of the last cycle. Zero while running.
    pub fn overflow(&self) -> f64 {
        let Limit::Finite(span) = self.options.local_span() else {
            return 0.0;
        };
        let over = self.elapsed() - span;
        if over <= 0.0 {
            return 0.0;
        }
        self.options.driver_ticks(over).unwrap_or(0.0)
    }

    fn shape(&self, raw: f64, cycle: u32) -> f64 {
        self.options
            .easing
            .apply(self.options.play_mode.apply(raw, cycle))
    }
}
