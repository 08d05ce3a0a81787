use core::fmt;
use std::time::{Duration, Instant};

use log::{debug, info, warn};
use serde::Serialize;

use crate::{BenchConfig, Error, Inplace, NullSink, Sink, SquareWave, Trial, iir::Cascade};

/// Timing result of one trial
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TrialReport {
    /// Samples per buffer
    pub buffer_len: usize,
    /// Buffers processed
    pub buffer_count: usize,
    /// Cascade stages
    pub filter_count: usize,
    /// Nominal samples per trial
    pub sample_budget: usize,
    /// Sample rate in Hz
    pub sample_rate: f64,
    /// Wall time spent generating and filtering
    pub elapsed: Duration,
    /// Label
    pub label: String,
}

impl TrialReport {
    /// Nanoseconds per sample and per filter stage
    ///
    /// Normalized by the nominal `sample_budget`, not by the samples
    /// actually processed (`buffer_count * buffer_len`).
    pub fn ns_per_sample(&self) -> f64 {
        self.elapsed.as_nanos() as f64 / self.filter_count as f64 / self.sample_budget as f64
    }

    /// Speed relative to real-time playback of one filter stage
    pub fn realtime(&self) -> f64 {
        1e9 / (self.ns_per_sample() * self.sample_rate)
    }

    /// Whether no samples were processed
    ///
    /// The buffer is longer than the sample budget. The timing figures then
    /// only measure loop overhead.
    pub fn is_empty(&self) -> bool {
        self.buffer_count == 0
    }
}

impl fmt::Display for TrialReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(
                f,
                "\t{}\tnothing processed, buffer exceeds the budget of {} samples",
                self.label, self.sample_budget
            );
        }
        write!(
            f,
            "\t{}\t{} ns\t{}x for generator + IIR filter",
            self.label,
            self.ns_per_sample(),
            self.realtime()
        )
    }
}

/// Buffer size sweep benchmark
///
/// Owns the generator, the filter cascade and the sink. Both the generator
/// and the cascade are built once and reset before every trial.
///
/// ```
/// # use dspbench::*;
/// let config = BenchConfig {
///     sample_budget: 1 << 10,
///     filter_count: 4,
///     log2_len: 3..5,
///     ..Default::default()
/// };
/// let mut bench = Bench::new(config).unwrap();
/// let reports = bench.run(|_| ()).unwrap();
/// assert_eq!(reports.len(), 2);
/// assert_eq!(reports[1].buffer_len, 16);
/// ```
#[derive(Debug)]
pub struct Bench<S = NullSink> {
    config: BenchConfig,
    generator: SquareWave,
    cascade: Cascade<f64>,
    sink: S,
}

impl Bench {
    /// Validate the configuration and build generator and cascade
    pub fn new(config: BenchConfig) -> Result<Self, Error> {
        Self::with_sink(config, NullSink)
    }
}

impl<S: Sink> Bench<S> {
    /// Like [`Bench::new()`] with processed buffers passed to `sink`
    pub fn with_sink(config: BenchConfig, sink: S) -> Result<Self, Error> {
        config.validate()?;
        let generator = SquareWave::new(config.frequency, config.sample_rate);
        let cascade = Cascade::alternating_peaking(
            config.filter_count,
            config.sample_rate,
            config.frequency,
            config.q,
            config.gain_db,
        );
        debug!(
            "Square wave half period {} samples, emitted {} Hz",
            generator.half_period(),
            generator.emitted_frequency(config.sample_rate)
        );
        debug!(
            "Cascade of {} peaking stages, net gain {} at {} Hz",
            cascade.len(),
            cascade
                .response(config.frequency / config.sample_rate)
                .norm(),
            config.frequency
        );
        Ok(Self {
            config,
            generator,
            cascade,
            sink,
        })
    }

    /// Run parameters
    pub fn config(&self) -> &BenchConfig {
        &self.config
    }

    /// The filter bank
    pub fn cascade(&self) -> &Cascade<f64> {
        &self.cascade
    }

    /// The signal source
    pub fn generator(&self) -> &SquareWave {
        &self.generator
    }

    /// Release the sink
    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Run one trial
    ///
    /// Generator and cascade start from reset state. Only generation and
    /// filtering are timed, writes to an active sink are excluded.
    pub fn run_trial(&mut self, trial: Trial) -> Result<TrialReport, Error> {
        let Trial {
            buffer_len,
            buffer_count,
        } = trial;
        debug!("Trial: {buffer_count} buffers of {buffer_len} samples");
        if buffer_count == 0 {
            warn!(
                "Buffer length {buffer_len} exceeds the sample budget {}, nothing to process",
                self.config.sample_budget
            );
        }
        let mut buf = vec![0.0f64; buffer_len];
        self.generator.reset();
        self.cascade.reset();
        self.sink.begin(buffer_len)?;
        let mut elapsed = Duration::ZERO;
        let mut start = Instant::now();
        for _ in 0..buffer_count {
            self.generator.fill(&mut buf);
            self.cascade.inplace(&mut buf);
            if S::ACTIVE {
                elapsed += start.elapsed();
                self.sink.write(&buf)?;
                start = Instant::now();
            }
        }
        elapsed += start.elapsed();
        self.sink.finish()?;
        let report = TrialReport {
            buffer_len,
            buffer_count,
            filter_count: self.config.filter_count,
            sample_budget: self.config.sample_budget,
            sample_rate: self.config.sample_rate,
            elapsed,
            label: self.config.label.clone(),
        };
        if !report.is_empty() {
            info!(
                "Buffer length {buffer_len}: {:?}, {} ns/sample, {}x realtime",
                report.elapsed,
                report.ns_per_sample(),
                report.realtime()
            );
        }
        Ok(report)
    }

    /// Run all trials in increasing buffer length
    ///
    /// `report` is called after each trial.
    pub fn run<F>(&mut self, mut report: F) -> Result<Vec<TrialReport>, Error>
    where
        F: FnMut(&TrialReport),
    {
        self.config
            .trials()
            .map(|trial| {
                let r = self.run_trial(trial)?;
                report(&r);
                Ok(r)
            })
            .collect()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{PcmSink, SplitInplace, iir::DirectForm1};

    /// Records everything written
    #[derive(Debug, Default)]
    struct Capture {
        trials: Vec<(usize, Vec<f64>)>,
        open: bool,
    }

    impl Sink for Capture {
        fn begin(&mut self, buffer_len: usize) -> Result<(), Error> {
            assert!(!self.open);
            self.open = true;
            self.trials.push((buffer_len, Vec::new()));
            Ok(())
        }

        fn write(&mut self, buf: &[f64]) -> Result<(), Error> {
            assert!(self.open);
            self.trials.last_mut().unwrap().1.extend_from_slice(buf);
            Ok(())
        }

        fn finish(&mut self) -> Result<(), Error> {
            assert!(self.open);
            self.open = false;
            Ok(())
        }
    }

    fn small() -> BenchConfig {
        BenchConfig {
            sample_budget: 1 << 9,
            filter_count: 3,
            log2_len: 2..6,
            frequency: 1e3,
            ..Default::default()
        }
    }

    #[test]
    fn sweep() {
        let mut seen = Vec::new();
        let reports = Bench::new(small())
            .unwrap()
            .run(|r| seen.push(r.buffer_len))
            .unwrap();
        assert_eq!(seen, [4, 8, 16, 32]);
        for r in reports.iter() {
            assert_eq!(r.buffer_count * r.buffer_len, 1 << 9);
            assert_eq!(r.filter_count, 3);
            assert_eq!(r.label, "vector");
        }
    }

    #[test]
    fn output_independent_of_buffer_len() {
        // Every trial starts from reset state and processes the same stream
        let mut capture = Capture::default();
        Bench::with_sink(small(), &mut capture)
            .unwrap()
            .run(|_| ())
            .unwrap();
        assert_eq!(capture.trials.len(), 4);
        let (_, first) = &capture.trials[0];
        assert_eq!(first.len(), 1 << 9);
        for (_, y) in capture.trials.iter() {
            assert_eq!(y, first);
        }
    }

    #[test]
    fn matches_direct_computation() {
        let config = small();
        let mut capture = Capture::default();
        let mut bench = Bench::with_sink(config.clone(), &mut capture).unwrap();
        bench
            .run_trial(Trial {
                buffer_len: 8,
                buffer_count: 10,
            })
            .unwrap();
        drop(bench);
        let mut want = vec![0.0; 80];
        SquareWave::new(config.frequency, config.sample_rate).fill(&mut want);
        for s in Cascade::alternating_peaking(3, 48e3, 1e3, 0.3, 2.0).sections() {
            s.inplace(&mut DirectForm1::default(), &mut want);
        }
        assert_eq!(capture.trials, [(8, want)]);
    }

    #[test]
    fn oversized_buffer() {
        let config = BenchConfig {
            sample_budget: 10,
            log2_len: 3..5,
            ..small()
        };
        let reports = Bench::new(config).unwrap().run(|_| ()).unwrap();
        assert_eq!(reports[0].buffer_count, 1);
        assert!(!reports[0].is_empty());
        assert!(reports[0].to_string().contains(" ns\t"));
        assert_eq!(reports[1].buffer_count, 0);
        assert!(reports[1].is_empty());
        assert_eq!(
            reports[1].to_string(),
            "\tvector\tnothing processed, buffer exceeds the budget of 10 samples"
        );
    }

    #[test]
    fn pcm_file_sizes() {
        let dir = std::env::temp_dir().join(format!("dspbench-{}-bench", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let config = BenchConfig {
            sample_budget: 100,
            log2_len: 2..8,
            ..small()
        };
        let reports = Bench::with_sink(config, PcmSink::new(&dir))
            .unwrap()
            .run(|_| ())
            .unwrap();
        let sizes: Vec<_> = reports
            .iter()
            .map(|r| {
                let len = std::fs::metadata(dir.join(format!("dspbench_{}", r.buffer_len)))
                    .unwrap()
                    .len() as usize;
                assert_eq!(len, r.buffer_count * r.buffer_len * 8);
                len
            })
            .collect();
        assert_eq!(sizes, [800, 768, 768, 768, 512, 0]);
        std::fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn invalid_config() {
        let config = BenchConfig {
            filter_count: 0,
            ..Default::default()
        };
        assert!(matches!(Bench::new(config), Err(Error::NoFilters)));
    }

    #[test]
    fn report() {
        let r = TrialReport {
            buffer_len: 8,
            buffer_count: 65536,
            filter_count: 100,
            sample_budget: 524288,
            sample_rate: 48e3,
            elapsed: Duration::from_nanos(524288 * 100 * 5),
            label: "vector".into(),
        };
        assert_eq!(r.ns_per_sample(), 5.0);
        assert!((r.realtime() - 1e9 / 5.0 / 48e3).abs() < 1e-9);
        assert_eq!(
            r.to_string(),
            format!("\tvector\t5 ns\t{}x for generator + IIR filter", r.realtime())
        );
    }
}
