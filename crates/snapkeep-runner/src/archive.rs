//! Archive creation
//!
//! [`DirectoryArchiver`] owns naming and placement: it derives the artifact
//! name, stages the archive in a hidden temporary directory inside the backup
//! directory, and renames it into place only once it is complete. The staging
//! directory is removed on every exit path, so a failed run never leaves a
//! partial artifact behind. A [`Packer`] does the actual compression.

use crate::command::{diagnostic, CommandTemplate};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use snapkeep_domain::traits::Archiver;
use snapkeep_domain::{ArchiveCreationError, Artifact, ArtifactName};
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

/// Prefix of staging directories; never parses as an artifact name
const STAGING_PREFIX: &str = ".snapkeep-staging-";

/// Writes one compressed archive of a directory
pub trait Packer {
    /// File extension of produced archives, without the leading dot
    fn extension(&self) -> &str;

    /// Archive the contents of `source_dir` into `output`
    ///
    /// `output` does not exist beforehand.
    fn pack(&self, source_dir: &Path, output: &Path) -> Result<(), ArchiveCreationError>;
}

/// Packer backed by an external program
///
/// The program runs with the source directory as working directory.
/// Placeholders: `{archive}` (output path) and `{source}` (source directory).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandPacker {
    /// Command line to run
    #[serde(flatten)]
    pub template: CommandTemplate,

    /// Extension of the produced archive
    #[serde(default = "default_extension")]
    pub extension: String,
}

fn default_extension() -> String {
    "zip".to_string()
}

impl Default for CommandPacker {
    /// `zip -r -q {archive} .`
    fn default() -> Self {
        Self {
            template: CommandTemplate::new("zip", ["-r", "-q", "{archive}", "."]),
            extension: default_extension(),
        }
    }
}

impl Packer for CommandPacker {
    fn extension(&self) -> &str {
        &self.extension
    }

    fn pack(&self, source_dir: &Path, output: &Path) -> Result<(), ArchiveCreationError> {
        let vars = [
            ("archive", output.as_os_str()),
            ("source", source_dir.as_os_str()),
        ];
        let program = &self.template.program;

        let result = self.template.run(&vars, Some(source_dir)).map_err(|e| {
            ArchiveCreationError::Archiver(format!("failed to launch {program}: {e}"))
        })?;

        if !result.status.success() {
            return Err(ArchiveCreationError::Archiver(format!(
                "{program} exited with {}: {}",
                result.status,
                diagnostic(&result)
            )));
        }

        if !output.is_file() {
            return Err(ArchiveCreationError::Archiver(format!(
                "{program} reported success but wrote no archive"
            )));
        }

        Ok(())
    }
}

/// Creates artifacts in a backup directory using a [`Packer`]
#[derive(Debug, Clone, Default)]
pub struct DirectoryArchiver<P = CommandPacker> {
    packer: P,
}

impl<P: Packer> DirectoryArchiver<P> {
    /// Create an archiver using `packer`
    pub fn new(packer: P) -> Self {
        Self { packer }
    }
}

impl<P: Packer> Archiver for DirectoryArchiver<P> {
    fn create(
        &self,
        source_dir: &Path,
        backup_dir: &Path,
        created_at: DateTime<Utc>,
    ) -> Result<Artifact, ArchiveCreationError> {
        let project = project_name(source_dir)?;

        fs::read_dir(source_dir).map_err(|source| ArchiveCreationError::SourceUnreadable {
            path: source_dir.to_path_buf(),
            source,
        })?;

        let name = ArtifactName::new(project, created_at);
        let file_name = name.file_name(self.packer.extension());
        let location = backup_dir.join(&file_name);

        if location.symlink_metadata().is_ok() {
            return Err(ArchiveCreationError::AlreadyExists(location));
        }

        let staging = tempfile::Builder::new()
            .prefix(STAGING_PREFIX)
            .tempdir_in(backup_dir)
            .map_err(|source| ArchiveCreationError::DestinationNotWritable {
                path: backup_dir.to_path_buf(),
                source,
            })?;
        let staged = staging.path().join(&file_name);

        self.packer.pack(source_dir, &staged)?;
        fs::rename(&staged, &location)?;

        if let Err(e) = staging.close() {
            tracing::warn!(error = %e, "Failed to remove archive staging directory");
        }

        Ok(Artifact {
            name,
            file_name,
            location,
        })
    }
}

/// Project name of a source directory: its base name after resolving `.`,
/// `..` and symlinks
pub fn project_name(source_dir: &Path) -> Result<String, ArchiveCreationError> {
    let resolved: PathBuf =
        fs::canonicalize(source_dir).map_err(|source| ArchiveCreationError::SourceUnreadable {
            path: source_dir.to_path_buf(),
            source,
        })?;

    resolved
        .file_name()
        .and_then(OsStr::to_str)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .ok_or_else(|| ArchiveCreationError::NoProjectName(source_dir.to_path_buf()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::io::Write;

    /// Writes a fixed payload, or fails after leaving a partial file
    struct FakePacker {
        fail: bool,
    }

    impl Packer for FakePacker {
        fn extension(&self) -> &str {
            "zip"
        }

        fn pack(&self, _source_dir: &Path, output: &Path) -> Result<(), ArchiveCreationError> {
            let mut file = fs::File::create(output)?;
            file.write_all(b"PK partial")?;
            if self.fail {
                return Err(ArchiveCreationError::Archiver("disk full".to_string()));
            }
            Ok(())
        }
    }

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 10, 8, 30, 0).unwrap()
    }

    fn project_dir(root: &Path) -> PathBuf {
        let dir = root.join("webapp");
        fs::create_dir(&dir).unwrap();
        fs::write(dir.join("index.html"), "<html></html>").unwrap();
        dir
    }

    fn entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_create_names_and_places_artifact() {
        let root = tempfile::tempdir().unwrap();
        let source = project_dir(root.path());
        let backups = tempfile::tempdir().unwrap();

        let archiver = DirectoryArchiver::new(FakePacker { fail: false });
        let artifact = archiver.create(&source, backups.path(), at()).unwrap();

        assert_eq!(artifact.file_name, "webapp_20240110-083000.zip");
        assert_eq!(artifact.project(), "webapp");
        assert_eq!(artifact.location, backups.path().join("webapp_20240110-083000.zip"));
        assert_eq!(entries(backups.path()), vec!["webapp_20240110-083000.zip"]);
    }

    #[test]
    fn test_failed_pack_leaves_nothing_behind() {
        let root = tempfile::tempdir().unwrap();
        let source = project_dir(root.path());
        let backups = tempfile::tempdir().unwrap();

        let archiver = DirectoryArchiver::new(FakePacker { fail: true });
        let err = archiver.create(&source, backups.path(), at()).unwrap_err();

        assert!(matches!(err, ArchiveCreationError::Archiver(_)));
        assert!(entries(backups.path()).is_empty());
    }

    #[test]
    fn test_missing_source_is_unreadable() {
        let root = tempfile::tempdir().unwrap();
        let backups = tempfile::tempdir().unwrap();

        let archiver = DirectoryArchiver::new(FakePacker { fail: false });
        let err = archiver
            .create(&root.path().join("missing"), backups.path(), at())
            .unwrap_err();

        assert!(matches!(err, ArchiveCreationError::SourceUnreadable { .. }));
        assert!(entries(backups.path()).is_empty());
    }

    #[test]
    fn test_missing_backup_dir_not_writable() {
        let root = tempfile::tempdir().unwrap();
        let source = project_dir(root.path());

        let archiver = DirectoryArchiver::new(FakePacker { fail: false });
        let err = archiver
            .create(&source, &root.path().join("nope"), at())
            .unwrap_err();

        assert!(matches!(err, ArchiveCreationError::DestinationNotWritable { .. }));
    }

    #[test]
    fn test_existing_artifact_not_overwritten() {
        let root = tempfile::tempdir().unwrap();
        let source = project_dir(root.path());
        let backups = tempfile::tempdir().unwrap();
        let existing = backups.path().join("webapp_20240110-083000.zip");
        fs::write(&existing, "original").unwrap();

        let archiver = DirectoryArchiver::new(FakePacker { fail: false });
        let err = archiver.create(&source, backups.path(), at()).unwrap_err();

        assert!(matches!(err, ArchiveCreationError::AlreadyExists(_)));
        assert_eq!(fs::read_to_string(existing).unwrap(), "original");
    }

    #[test]
    fn test_project_name_resolves_dot() {
        let root = tempfile::tempdir().unwrap();
        let source = project_dir(root.path());
        let name = project_name(&source.join(".")).unwrap();
        assert_eq!(name, "webapp");
    }

    #[test]
    fn test_default_packer_is_zip() {
        let packer = CommandPacker::default();
        assert_eq!(packer.extension(), "zip");
        assert_eq!(packer.template.program, "zip");
    }

    #[cfg(unix)]
    #[test]
    fn test_command_packer_failure_reports_diagnostic() {
        let root = tempfile::tempdir().unwrap();
        let source = project_dir(root.path());
        let backups = tempfile::tempdir().unwrap();

        let packer = CommandPacker {
            template: CommandTemplate::new("sh", ["-c", "echo 'no space left' >&2; exit 12"]),
            extension: "zip".to_string(),
        };
        let err = DirectoryArchiver::new(packer)
            .create(&source, backups.path(), at())
            .unwrap_err();

        assert!(err.to_string().contains("no space left"));
        assert!(entries(backups.path()).is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_command_packer_writes_archive() {
        let root = tempfile::tempdir().unwrap();
        let source = project_dir(root.path());
        let backups = tempfile::tempdir().unwrap();

        // `$0` is the first argument after the script for `sh -c`
        let packer = CommandPacker {
            template: CommandTemplate::new("sh", ["-c", "cat index.html > \"$0\"", "{archive}"]),
            extension: "html".to_string(),
        };
        let artifact = DirectoryArchiver::new(packer)
            .create(&source, backups.path(), at())
            .unwrap();

        assert_eq!(artifact.file_name, "webapp_20240110-083000.html");
        assert_eq!(fs::read_to_string(artifact.location).unwrap(), "<html></html>");
    }
}
