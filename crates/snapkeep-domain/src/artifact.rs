//! Artifact module - naming and identity of backup snapshots
//!
//! The artifact file name is the only place a snapshot's project and creation
//! time are recorded, so the naming convention is load-bearing:
//!
//! ```text
//! <project_name>_<YYYYMMDD-HHMMSS>.<ext>
//! ```
//!
//! Timestamps are UTC. Parsing splits on the last `_`, which lets project
//! names themselves contain underscores.

use chrono::{DateTime, NaiveDateTime, SubsecRound, Utc};
use std::fmt;
use std::path::{Path, PathBuf};

/// `strftime` layout of the timestamp embedded in artifact names
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d-%H%M%S";

/// Length of a formatted timestamp (`YYYYMMDD-HHMMSS`)
const TIMESTAMP_LEN: usize = 15;

/// Project and creation time of one snapshot, as encoded in its file name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArtifactName {
    project: String,
    created_at: DateTime<Utc>,
}

impl ArtifactName {
    /// Create a name for `project` at `created_at`
    ///
    /// Sub-second precision is dropped because the name only carries seconds.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::{TimeZone, Utc};
    /// use snapkeep_domain::ArtifactName;
    ///
    /// let at = Utc.with_ymd_and_hms(2024, 1, 10, 8, 30, 0).unwrap();
    /// let name = ArtifactName::new("webapp", at);
    /// assert_eq!(name.file_name("zip"), "webapp_20240110-083000.zip");
    /// ```
    pub fn new(project: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            project: project.into(),
            created_at: created_at.trunc_subsecs(0),
        }
    }

    /// Project the snapshot belongs to
    pub fn project(&self) -> &str {
        &self.project
    }

    /// Creation time of the snapshot
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Name without extension: `<project>_<YYYYMMDD-HHMMSS>`
    pub fn stem(&self) -> String {
        format!("{}_{}", self.project, self.created_at.format(TIMESTAMP_FORMAT))
    }

    /// Full file name with the given extension (without leading dot)
    pub fn file_name(&self, extension: &str) -> String {
        format!("{}.{}", self.stem(), extension)
    }

    /// Calendar date of the snapshot as `YYYYMMDD`
    pub fn date(&self) -> String {
        self.created_at.format("%Y%m%d").to_string()
    }

    /// Parse a file name following the naming convention
    ///
    /// Returns the name and the extension, or `None` when the file name does
    /// not follow the convention.
    ///
    /// # Examples
    ///
    /// ```
    /// use snapkeep_domain::ArtifactName;
    ///
    /// let (name, ext) = ArtifactName::parse("my_app_20240305-120000.tar.gz").unwrap();
    /// assert_eq!(name.project(), "my_app");
    /// assert_eq!(ext, "tar.gz");
    ///
    /// assert!(ArtifactName::parse("notes.txt").is_none());
    /// ```
    pub fn parse(file_name: &str) -> Option<(Self, &str)> {
        let (project, rest) = file_name.rsplit_once('_')?;
        if project.is_empty() {
            return None;
        }

        let stamp = rest.get(..TIMESTAMP_LEN)?;
        let extension = rest.get(TIMESTAMP_LEN..)?.strip_prefix('.')?;
        if extension.is_empty() || !is_canonical_stamp(stamp) {
            return None;
        }

        let naive = NaiveDateTime::parse_from_str(stamp, TIMESTAMP_FORMAT).ok()?;
        Some((Self::new(project, naive.and_utc()), extension))
    }
}

impl fmt::Display for ArtifactName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.stem())
    }
}

/// Only `DDDDDDDD-DDDDDD` is accepted, so formatting a parsed name gives back
/// the exact same text.
fn is_canonical_stamp(stamp: &str) -> bool {
    stamp.bytes().enumerate().all(|(i, b)| {
        if i == 8 {
            b == b'-'
        } else {
            b.is_ascii_digit()
        }
    })
}

/// A snapshot file found in (or written to) a backup directory
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Artifact {
    /// Parsed identity
    pub name: ArtifactName,

    /// File name within the backup directory
    pub file_name: String,

    /// Full path of the file
    pub location: PathBuf,
}

impl Artifact {
    /// Build an artifact from a path whose file name follows the convention
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();
        let file_name = path.file_name()?.to_str()?;
        let (name, _) = ArtifactName::parse(file_name)?;

        Some(Self {
            name,
            file_name: file_name.to_string(),
            location: path.to_path_buf(),
        })
    }

    /// Project the artifact belongs to
    pub fn project(&self) -> &str {
        self.name.project()
    }

    /// Creation time encoded in the file name
    pub fn created_at(&self) -> DateTime<Utc> {
        self.name.created_at()
    }
}
