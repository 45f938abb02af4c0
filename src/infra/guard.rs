//! Concurrent-run guard
//!
//! Takes an exclusive advisory lock on a file inside the project so two
//! packmule invocations cannot provision or bundle the same project at
//! once. The lock is released and the file removed when the guard drops.

use std::fs::File;
use std::path::{Path, PathBuf};

use fs2::FileExt;

use crate::config::defaults;
use crate::error::LockError;

/// Holds the project lock for the lifetime of a command
#[derive(Debug)]
pub struct RunGuard {
    file: File,
    path: PathBuf,
}

impl RunGuard {
    /// Acquire the project lock, failing immediately if another run holds it
    pub fn acquire(project_path: &Path) -> Result<Self, LockError> {
        let path = project_path.join(defaults::LOCK_FILE);
        let file = File::create(&path).map_err(|e| LockError::IoError {
            path: path.clone(),
            error: e.to_string(),
        })?;

        file.try_lock_exclusive().map_err(|e| {
            if e.raw_os_error() == fs2::lock_contended_error().raw_os_error() {
                LockError::Busy { path: path.clone() }
            } else {
                LockError::IoError {
                    path: path.clone(),
                    error: e.to_string(),
                }
            }
        })?;

        Ok(Self { file, path })
    }
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
        let _ = std::fs::remove_file(&self.path);
    }
}
