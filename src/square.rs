use num_traits::{AsPrimitive, Float};
use serde::{Deserialize, Serialize};

use crate::Process;

/// Output level of the square wave
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Level {
    /// Negative half cycle
    #[default]
    Low,
    /// Positive half cycle
    High,
}

impl Level {
    /// The opposite level
    pub fn flip(self) -> Self {
        match self {
            Self::Low => Self::High,
            Self::High => Self::Low,
        }
    }
}

/// Symmetric square wave generator
///
/// Emits `±AMPLITUDE` with an integer number of samples per half cycle.
/// The half period is rounded from the requested frequency, so the emitted
/// frequency is `sample_rate / (2 * half_period)` and may differ from the
/// requested one. There is no fractional sample switching.
///
/// ```
/// # use dspbench::*;
/// let mut sqw = SquareWave::new(12e3, 48e3);
/// assert_eq!(sqw.half_period(), 2);
/// let mut buf = [0.0f64; 6];
/// sqw.fill(&mut buf);
/// assert_eq!(buf, [-0.5, -0.5, 0.5, 0.5, -0.5, -0.5]);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SquareWave {
    half_period: usize,
    level: Level,
    progress: usize,
}

impl SquareWave {
    /// Peak amplitude
    pub const AMPLITUDE: f64 = 0.5;

    /// Create a generator for a frequency
    ///
    /// # Arguments
    /// * `frequency`: Requested fundamental, same units as `sample_rate`.
    /// * `sample_rate`: Sample rate.
    pub fn new(frequency: f64, sample_rate: f64) -> Self {
        Self::from_half_period(Self::half_period_for(frequency, sample_rate))
    }

    /// Create a generator switching every `half_period` samples
    pub fn from_half_period(half_period: usize) -> Self {
        Self {
            half_period,
            level: Level::Low,
            progress: 0,
        }
    }

    /// Samples per half cycle for a frequency: `round(sample_rate / frequency / 2)`
    pub fn half_period_for(frequency: f64, sample_rate: f64) -> usize {
        (sample_rate / frequency / 2.0).round() as usize
    }

    /// Samples per half cycle
    pub fn half_period(&self) -> usize {
        self.half_period
    }

    /// Current output level
    pub fn level(&self) -> Level {
        self.level
    }

    /// Samples emitted since the last level switch
    pub fn progress(&self) -> usize {
        self.progress
    }

    /// Frequency actually emitted given the rounded half period
    pub fn emitted_frequency(&self, sample_rate: f64) -> f64 {
        sample_rate / (2 * self.half_period) as f64
    }

    /// Return to the start of a low half cycle
    pub fn reset(&mut self) {
        self.level = Level::Low;
        self.progress = 0;
    }

    /// Advance by one sample and return its level
    #[inline]
    pub fn step(&mut self) -> Level {
        if self.progress == self.half_period {
            self.progress = 0;
            self.level = self.level.flip();
        }
        self.progress += 1;
        self.level
    }

    /// Overwrite `buf` with the next `buf.len()` samples
    pub fn fill<T>(&mut self, buf: &mut [T])
    where
        T: Float + 'static,
        f64: AsPrimitive<T>,
    {
        for y in buf.iter_mut() {
            *y = self.process(());
        }
    }
}

/// Pure source: the input is ignored.
impl<T> Process<(), T> for SquareWave
where
    T: Float + 'static,
    f64: AsPrimitive<T>,
{
    fn process(&mut self, _x: ()) -> T {
        match self.step() {
            Level::High => Self::AMPLITUDE.as_(),
            Level::Low => (-Self::AMPLITUDE).as_(),
        }
    }
}
