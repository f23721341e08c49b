//! Configuration management for the CLI.
//!
//! Values come from a TOML file; command-line flags override them.

use crate::cli::{PlanArgs, RetentionArgs, RunArgs};
use crate::error::{CliError, Result};
use serde::{Deserialize, Serialize};
use snapkeep_janitor::JanitorConfig;
use snapkeep_runner::{project_name, CommandPacker, CommandPublisher, RetryPolicy, RunRequest};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// CLI configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Directory to back up
    #[serde(default)]
    pub project_dir: Option<PathBuf>,

    /// Directory holding the backups
    #[serde(default)]
    pub backup_dir: Option<PathBuf>,

    /// Remote destination identifier
    #[serde(default)]
    pub destination: Option<String>,

    /// Log file
    #[serde(default)]
    pub log_file: Option<PathBuf>,

    /// Retention quotas and dry-run switch
    #[serde(default)]
    pub retention: JanitorConfig,

    /// Archive program
    #[serde(default)]
    pub archiver: CommandPacker,

    /// Upload program and retries
    #[serde(default)]
    pub publisher: PublisherSettings,

    /// Completion notification
    #[serde(default)]
    pub notifier: NotifierSettings,
}

/// `[publisher]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublisherSettings {
    /// Upload command
    #[serde(flatten)]
    pub command: CommandPublisher,

    /// Total upload attempts
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Delay before the first retry, in seconds
    #[serde(default = "default_base_delay_secs")]
    pub base_delay_secs: u64,
}

/// `[notifier]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotifierSettings {
    /// Send the completion notification
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Webhook receiving the completion event
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webhook_url: Option<String>,
}

/// Everything a backup run needs, after layering flags over the file.
#[derive(Debug, Clone)]
pub struct RunSettings {
    /// Directories and destination
    pub request: RunRequest,

    /// Retention configuration
    pub janitor: JanitorConfig,

    /// Archive program
    pub archiver: CommandPacker,

    /// Upload program
    pub publisher: CommandPublisher,

    /// Upload retries
    pub retry: RetryPolicy,

    /// Webhook URL, `None` when notification is off
    pub webhook_url: Option<String>,

    /// Log file
    pub log_file: PathBuf,
}

/// Default log file, relative to the working directory.
pub const DEFAULT_LOG_FILE: &str = "backup_log.txt";

impl Config {
    /// Get the default configuration file path.
    pub fn path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".snapkeep").join("config.toml"))
    }

    /// Load configuration.
    ///
    /// An explicit path must exist. Without one, the default path is used if
    /// present, otherwise all defaults apply.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        match Self::path() {
            Ok(path) if path.exists() => Self::from_file(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            CliError::Config(format!("Cannot read {}: {}", path.display(), e))
        })?;
        Ok(toml::from_str(&contents)?)
    }

    /// Layer run flags over this configuration.
    pub fn resolve_run(self, args: &RunArgs) -> Result<RunSettings> {
        let project_dir = args
            .project_dir
            .clone()
            .or(self.project_dir)
            .ok_or_else(|| missing("project directory", "--project-dir", "project_dir"))?;
        let backup_dir = args
            .backup_dir
            .clone()
            .or(self.backup_dir)
            .ok_or_else(|| missing("backup directory", "--backup-dir", "backup_dir"))?;
        let destination = args
            .destination
            .clone()
            .or(self.destination)
            .ok_or_else(|| missing("destination", "--destination", "destination"))?;

        let dry_run = args.dry_run || self.retention.dry_run;
        let janitor = apply_retention(self.retention, &args.retention).with_dry_run(dry_run);

        let max_attempts = match args.publish_retries {
            Some(retries) => retries.saturating_add(1),
            None => self.publisher.max_attempts,
        };
        let retry = RetryPolicy::new(
            max_attempts,
            Duration::from_secs(self.publisher.base_delay_secs),
        );

        let webhook_url = if args.no_notify || !self.notifier.enabled {
            None
        } else {
            args.webhook_url.clone().or(self.notifier.webhook_url)
        };

        Ok(RunSettings {
            request: RunRequest {
                project_dir,
                backup_dir,
                destination,
            },
            janitor,
            archiver: self.archiver,
            publisher: self.publisher.command,
            retry,
            webhook_url,
            log_file: args
                .log_file
                .clone()
                .or(self.log_file)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE)),
        })
    }

    /// Backup directory, project and retention for the plan command.
    pub fn resolve_plan(self, args: &PlanArgs) -> Result<(PathBuf, String, JanitorConfig)> {
        let backup_dir = args
            .backup_dir
            .clone()
            .or(self.backup_dir)
            .ok_or_else(|| missing("backup directory", "--backup-dir", "backup_dir"))?;

        let project = match (&args.project, &self.project_dir) {
            (Some(project), _) => project.clone(),
            (None, Some(project_dir)) => {
                project_name(project_dir).map_err(|e| CliError::Config(e.to_string()))?
            }
            (None, None) => return Err(missing("project", "--project", "project_dir")),
        };

        Ok((backup_dir, project, apply_retention(self.retention, &args.retention)))
    }
}

impl Default for PublisherSettings {
    fn default() -> Self {
        Self {
            command: CommandPublisher::default(),
            max_attempts: default_max_attempts(),
            base_delay_secs: default_base_delay_secs(),
        }
    }
}

impl Default for NotifierSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            webhook_url: None,
        }
    }
}

fn apply_retention(mut config: JanitorConfig, args: &RetentionArgs) -> JanitorConfig {
    if let Some(n) = args.keep_daily {
        config.policy.keep_daily = n;
    }
    if let Some(n) = args.keep_weekly {
        config.policy.keep_weekly = n;
    }
    if let Some(n) = args.keep_monthly {
        config.policy.keep_monthly = n;
    }
    config
}

fn missing(what: &str, flag: &str, key: &str) -> CliError {
    CliError::Config(format!("No {what} given; pass {flag} or set `{key}` in the config file"))
}

fn default_true() -> bool {
    true
}

fn default_max_attempts() -> u32 {
    1
}

fn default_base_delay_secs() -> u64 {
    2
}
