//! Backup directory as an [`ArtifactStore`]

use snapkeep_domain::traits::ArtifactStore;
use snapkeep_domain::DeletionError;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Regular files directly inside a backup directory
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    root: PathBuf,
}

impl DirectoryStore {
    /// Store over `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Backup directory
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ArtifactStore for DirectoryStore {
    type Error = io::Error;

    fn list(&self) -> Result<Vec<String>, Self::Error> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            // Non-UTF-8 names cannot follow the naming convention
            if let Ok(name) = entry.file_name().into_string() {
                names.push(name);
            }
        }
        Ok(names)
    }

    fn delete(&mut self, file_name: &str) -> Result<(), DeletionError> {
        fs::remove_file(self.root.join(file_name)).map_err(|e| DeletionError::new(file_name, e))
    }
}
