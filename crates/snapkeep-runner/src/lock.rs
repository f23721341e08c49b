//! Exclusive lock over a backup directory
//!
//! At most one run may operate on a backup directory at a time: a deletion
//! pass racing another run's creation could remove the artifact that run just
//! wrote. The lock is a file created with create-new semantics; it holds the
//! owner's process id and is removed when the guard drops.

use crate::error::LockError;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Name of the lock file inside the backup directory
pub const LOCK_FILE_NAME: &str = ".snapkeep.lock";

/// Guard holding the backup directory lock
#[derive(Debug)]
pub struct DirectoryLock {
    path: PathBuf,
}

impl DirectoryLock {
    /// Take the lock on `dir`, failing if another run holds it
    pub fn acquire(dir: &Path) -> Result<Self, LockError> {
        let path = dir.join(LOCK_FILE_NAME);

        let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                let holder = fs::read_to_string(&path)
                    .map(|s| s.trim().to_string())
                    .unwrap_or_else(|_| "unknown".to_string());
                return Err(LockError::Held { path, holder });
            }
            Err(source) => return Err(LockError::Io { path, source }),
        };

        let lock = Self { path };
        if let Err(source) = writeln!(file, "{}", std::process::id()) {
            return Err(LockError::Io {
                path: lock.path.clone(),
                source,
            });
        }

        tracing::debug!(lock = %lock.path.display(), "Acquired backup directory lock");
        Ok(lock)
    }

    /// Lock file path
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for DirectoryLock {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path) {
            tracing::warn!(lock = %self.path.display(), error = %e, "Failed to release backup directory lock");
        }
    }
}
