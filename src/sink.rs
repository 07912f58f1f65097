//! Best-effort persistence of emitted messages.
//!
//! Each message is written verbatim to its own file in the destination
//! directory. Filenames carry a microsecond-resolution timestamp, which is
//! unique at the emission rates this tool supports (at most 10 Hz).

use chrono::{DateTime, Local};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Filename timestamp format, microsecond granularity.
const FILENAME_FORMAT: &str = "%Y%m%d%H%M%S%6f";

/// Persistence errors.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Writes each message to a timestamped `.hl7` file.
#[derive(Debug, Clone)]
pub struct FileSink {
    dir: PathBuf,
}

impl FileSink {
    /// Create a sink targeting a destination directory.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The destination directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Ensure the destination directory exists.
    fn ensure_dir(&self) -> Result<(), PersistError> {
        fs::create_dir_all(&self.dir)?;
        Ok(())
    }

    /// Build the file path for a message written at `now`.
    fn message_path(&self, now: DateTime<Local>) -> PathBuf {
        self.dir
            .join(format!("hl7_message_{}.hl7", now.format(FILENAME_FORMAT)))
    }

    /// Write a message verbatim to a newly created file.
    ///
    /// Returns the path written. Failures are recoverable by contract:
    /// callers report them and keep transmitting.
    pub fn persist(&self, message: &str) -> Result<PathBuf, PersistError> {
        self.ensure_dir()?;
        let path = self.message_path(Local::now());
        fs::write(&path, message)?;
        Ok(path)
    }
}
