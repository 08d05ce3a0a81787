use core::ops::Range;

use serde::{Deserialize, Serialize};

use crate::{Error, SquareWave};

/// Benchmark run parameters
///
/// Immutable for the duration of a run. The defaults reproduce the
/// reference benchmark: a 50 Hz square wave at 48 kHz through 100 peaking
/// stages (±2 dB, Q 0.3), 2^19 samples per trial, buffers of 8 to 4096 samples.
///
/// Missing fields in serialized form take their default values.
///
/// ```
/// # use dspbench::BenchConfig;
/// let config = BenchConfig::from_json(r#"{"filter_count": 10, "log2_len": {"start": 4, "end": 6}}"#).unwrap();
/// assert_eq!(config.filter_count, 10);
/// assert_eq!(config.sample_rate, 48e3);
/// let lens: Vec<_> = config.trials().map(|t| t.buffer_len).collect();
/// assert_eq!(lens, [16, 32]);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchConfig {
    /// Sample rate in Hz
    pub sample_rate: f64,
    /// Samples processed per trial, independent of the buffer length
    pub sample_budget: usize,
    /// Number of cascaded biquads
    pub filter_count: usize,
    /// Buffer length exponents `l` (`buffer_len = 2^l`), end exclusive
    pub log2_len: Range<u32>,
    /// Square wave fundamental and filter center frequency in Hz
    pub frequency: f64,
    /// Filter quality factor
    pub q: f64,
    /// Gain of the even stages in dB, odd stages use the negated gain
    pub gain_db: f64,
    /// Label printed with each trial result
    pub label: String,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            sample_rate: 48e3,
            sample_budget: 1 << 19,
            filter_count: 100,
            log2_len: 3..13,
            frequency: 50.0,
            q: 0.3,
            gain_db: 2.0,
            label: "vector".into(),
        }
    }
}

impl BenchConfig {
    /// Parse and validate a JSON configuration
    pub fn from_json(json: &str) -> Result<Self, Error> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the parameters describe a runnable benchmark
    pub fn validate(&self) -> Result<(), Error> {
        let Range { start, end } = self.log2_len;
        if start >= end {
            return Err(Error::EmptySweep { start, end });
        }
        if end > usize::BITS - 1 {
            return Err(Error::SweepOverflow(end - 1));
        }
        if self.filter_count == 0 {
            return Err(Error::NoFilters);
        }
        if self.sample_budget == 0 {
            return Err(Error::NoSamples);
        }
        if !(self.sample_rate.is_finite() && self.sample_rate > 0.0) {
            return Err(Error::Design("sample rate must be positive and finite"));
        }
        if !(self.frequency.is_finite() && self.frequency > 0.0) {
            return Err(Error::Design("frequency must be positive and finite"));
        }
        if SquareWave::half_period_for(self.frequency, self.sample_rate) == 0 {
            return Err(Error::HalfPeriod {
                frequency: self.frequency,
                sample_rate: self.sample_rate,
            });
        }
        if self.frequency >= self.sample_rate / 2.0 {
            return Err(Error::Design("frequency must be below Nyquist"));
        }
        if !(self.q.is_finite() && self.q > 0.0) {
            return Err(Error::Design("Q must be positive and finite"));
        }
        if !self.gain_db.is_finite() {
            return Err(Error::Design("gain must be finite"));
        }
        Ok(())
    }

    /// The sweep plan, one trial per buffer length exponent in increasing order
    pub fn trials(&self) -> Trials {
        Trials {
            log2_len: self.log2_len.clone(),
            sample_budget: self.sample_budget,
        }
    }
}

/// One sweep step
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trial {
    /// Samples per buffer, `2^l`
    pub buffer_len: usize,
    /// Buffer fill and filter iterations, `sample_budget / buffer_len`
    pub buffer_count: usize,
}

/// Sweep plan iterator
///
/// See [`BenchConfig::trials()`].
#[derive(Clone, Debug)]
pub struct Trials {
    log2_len: Range<u32>,
    sample_budget: usize,
}

impl Iterator for Trials {
    type Item = Trial;

    fn next(&mut self) -> Option<Self::Item> {
        let l = self.log2_len.next()?;
        let buffer_len = 1usize << l;
        Some(Trial {
            buffer_len,
            buffer_count: self.sample_budget / buffer_len,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.log2_len.size_hint()
    }
}

impl ExactSizeIterator for Trials {}
