use crate::models::error::{AdminError, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

/// Body returned while no progress has been reported yet.
pub const DEFAULT_PROGRESS: &[u8] = b"0";

/// Source of the progress value reported by the running backup job.
pub trait ProgressSource: Send + Sync {
    /// Raw progress bytes, or `None` when nothing has been reported yet.
    fn read_progress(&self) -> Result<Option<Vec<u8>>>;
}

/// Reads the plain-text file the backup script keeps overwriting.
/// The content is passed through untouched, even when it is not UTF-8.
pub struct FileProgressSource {
    path: PathBuf,
}

impl FileProgressSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ProgressSource for FileProgressSource {
    fn read_progress(&self) -> Result<Option<Vec<u8>>> {
        match fs::read(&self.path) {
            Ok(content) => Ok(Some(content)),
            Err(cause) if cause.kind() == ErrorKind::NotFound => Ok(None),
            Err(cause) => Err(AdminError::ProgressRead {
                path: self.path.clone(),
                cause,
            }),
        }
    }
}
