//! Optional inspection hook for raw frame payloads.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Receives every raw payload the parser reads, before it is decoded.
///
/// Tracing is diagnostic only: a sink cannot fail a parse.
pub trait TraceSink {
    fn payload(&mut self, frame: usize, bytes: &[u8]) -> io::Result<()>;
}

/// Sink that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullTrace;

impl TraceSink for NullTrace {
    fn payload(&mut self, _frame: usize, _bytes: &[u8]) -> io::Result<()> {
        Ok(())
    }
}

/// Dumps each payload to `<dir>/frame_<i>.bmp`.
#[derive(Debug, Clone)]
pub struct DirTraceSink {
    dir: PathBuf,
}

impl DirTraceSink {
    /// Create the sink, creating `dir` if needed.
    pub fn new<P: AsRef<Path>>(dir: P) -> io::Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path the payload of `frame` is written to.
    pub fn path_for(&self, frame: usize) -> PathBuf {
        self.dir.join(format!("frame_{frame}.bmp"))
    }
}

impl TraceSink for DirTraceSink {
    fn payload(&mut self, frame: usize, bytes: &[u8]) -> io::Result<()> {
        fs::write(self.path_for(frame), bytes)
    }
}
