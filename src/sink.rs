use std::{
    fs::{self, File},
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

use log::debug;

use crate::Error;

/// Destination for processed buffers
///
/// A sink sees one `begin()`, any number of `write()` calls, and one
/// `finish()` per trial. Inactive sinks are never written to, so the
/// benchmark loop does not touch them.
pub trait Sink {
    /// Whether buffers are passed to `write()`
    const ACTIVE: bool = true;

    /// Start a trial with the given buffer length
    fn begin(&mut self, buffer_len: usize) -> Result<(), Error>;

    /// Consume one processed buffer
    fn write(&mut self, buf: &[f64]) -> Result<(), Error>;

    /// End the trial and flush any output
    fn finish(&mut self) -> Result<(), Error>;
}

/// Discards everything
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct NullSink;

impl Sink for NullSink {
    const ACTIVE: bool = false;

    fn begin(&mut self, _buffer_len: usize) -> Result<(), Error> {
        Ok(())
    }

    fn write(&mut self, _buf: &[f64]) -> Result<(), Error> {
        Ok(())
    }

    fn finish(&mut self) -> Result<(), Error> {
        Ok(())
    }
}

/// Raw PCM file per trial
///
/// Writes `<dir>/<prefix>_<buffer_len>` as headerless little-endian `f64`
/// samples. An existing file of that name is replaced.
#[derive(Debug)]
pub struct PcmSink {
    dir: PathBuf,
    prefix: String,
    out: Option<(PathBuf, BufWriter<File>)>,
}

impl PcmSink {
    /// File name prefix used by [`PcmSink::new()`]
    pub const PREFIX: &'static str = "dspbench";

    /// Write trials into `dir`
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self::with_prefix(dir, Self::PREFIX)
    }

    /// Write trials into `dir` with a custom file name prefix
    pub fn with_prefix(dir: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            prefix: prefix.into(),
            out: None,
        }
    }

    /// Output file for a buffer length
    pub fn path(&self, buffer_len: usize) -> PathBuf {
        self.dir.join(format!("{}_{}", self.prefix, buffer_len))
    }

    fn create(path: &Path) -> io::Result<BufWriter<File>> {
        match fs::remove_file(path) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => return Err(e),
            _ => {}
        }
        Ok(BufWriter::new(File::create(path)?))
    }
}

impl Sink for PcmSink {
    fn begin(&mut self, buffer_len: usize) -> Result<(), Error> {
        self.finish()?;
        let path = self.path(buffer_len);
        debug!("PCM output to {}", path.display());
        let file = Self::create(&path).map_err(|source| Error::Sink {
            path: path.clone(),
            source,
        })?;
        self.out = Some((path, file));
        Ok(())
    }

    fn write(&mut self, buf: &[f64]) -> Result<(), Error> {
        let Some((path, file)) = self.out.as_mut() else {
            return Ok(());
        };
        buf.iter()
            .try_for_each(|y| file.write_all(&y.to_le_bytes()))
            .map_err(|source| Error::Sink {
                path: path.clone(),
                source,
            })
    }

    fn finish(&mut self) -> Result<(), Error> {
        if let Some((path, mut file)) = self.out.take() {
            file.flush()
                .map_err(|source| Error::Sink { path, source })?;
        }
        Ok(())
    }
}

impl<S: Sink> Sink for &mut S {
    const ACTIVE: bool = S::ACTIVE;

    fn begin(&mut self, buffer_len: usize) -> Result<(), Error> {
        (**self).begin(buffer_len)
    }

    fn write(&mut self, buf: &[f64]) -> Result<(), Error> {
        (**self).write(buf)
    }

    fn finish(&mut self) -> Result<(), Error> {
        (**self).finish()
    }
}
