use std::path::PathBuf;

/// Benchmark setup and output errors
///
/// The numeric core (generator, filters) has no error paths. These cover
/// configuration validation and the optional PCM output.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The buffer length exponent range contains no values
    #[error("buffer length exponent range {start}..{end} is empty")]
    EmptySweep {
        /// First exponent
        start: u32,
        /// Exclusive last exponent
        end: u32,
    },
    /// `2^exponent` does not fit the address width
    #[error("buffer length 2^{0} exceeds the address width")]
    SweepOverflow(u32),
    /// No filter stages
    #[error("filter count must be non-zero")]
    NoFilters,
    /// No samples to process
    #[error("sample budget must be non-zero")]
    NoSamples,
    /// The generator would not switch levels
    #[error("square wave half period rounds to zero samples ({frequency} Hz at {sample_rate} Hz)")]
    HalfPeriod {
        /// Requested frequency
        frequency: f64,
        /// Sample rate
        sample_rate: f64,
    },
    /// Parameters for which the peaking design is degenerate
    #[error("invalid filter design: {0}")]
    Design(&'static str),
    /// Configuration could not be parsed
    #[error("configuration: {0}")]
    Config(#[from] serde_json::Error),
    /// Configuration file could not be read
    #[error("configuration file {path}: {source}")]
    ConfigFile {
        /// Configuration file
        path: PathBuf,
        /// Underlying failure
        #[source]
        source: std::io::Error,
    },
    /// Writing to the PCM sink failed
    #[error("PCM sink {path}: {source}")]
    Sink {
        /// Output file
        path: PathBuf,
        /// Underlying failure
        #[source]
        source: std::io::Error,
    },
}
