use std::{env, fs, process::ExitCode};

use log::{error, info};

use dspbench::{Bench, BenchConfig, Error, PcmSink, Sink};

fn config() -> Result<BenchConfig, Error> {
    let Some(path) = env::var_os("DSPBENCH_CONFIG") else {
        info!("Default configuration");
        return Ok(BenchConfig::default());
    };
    info!("Configuration from {}", path.to_string_lossy());
    let json = fs::read_to_string(&path).map_err(|source| Error::ConfigFile {
        path: path.into(),
        source,
    })?;
    BenchConfig::from_json(&json)
}

fn sweep<S: Sink>(mut bench: Bench<S>) -> Result<(), Error> {
    let trials = bench.config().trials();
    for trial in trials {
        println!("Buffer size: {} samples", trial.buffer_len);
        println!("{}", bench.run_trial(trial)?);
    }
    Ok(())
}

fn run() -> Result<(), Error> {
    let config = config()?;
    println!("DSP Bench Rust");
    match env::var_os("DSPBENCH_PCM_DIR") {
        Some(dir) => sweep(Bench::with_sink(config, PcmSink::new(dir))?),
        None => sweep(Bench::new(config)?),
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
