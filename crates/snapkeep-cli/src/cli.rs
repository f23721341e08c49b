//! CLI command definitions and argument parsing.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Snapkeep - Back up a project directory with tiered retention.
///
/// Without a subcommand, performs one backup run: archive, upload, apply
/// retention, notify.
#[derive(Debug, Parser)]
#[command(name = "snapkeep")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Configuration file path (default: ~/.snapkeep/config.toml)
    #[arg(short, long, global = true, env = "SNAPKEEP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(flatten)]
    pub run: RunArgs,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show how retention would classify a backup directory, without deleting
    Plan(PlanArgs),
}

/// Arguments for a backup run.
#[derive(Debug, Default, Args)]
pub struct RunArgs {
    /// Directory to back up
    #[arg(long)]
    pub project_dir: Option<PathBuf>,

    /// Directory holding the project's backups
    #[arg(long)]
    pub backup_dir: Option<PathBuf>,

    /// Remote destination identifier for the upload
    #[arg(long)]
    pub destination: Option<String>,

    /// Skip the completion notification
    #[arg(long)]
    pub no_notify: bool,

    /// Webhook receiving the completion notification
    #[arg(long, env = "SNAPKEEP_WEBHOOK_URL")]
    pub webhook_url: Option<String>,

    /// Report deletions without performing them
    #[arg(long)]
    pub dry_run: bool,

    /// Append log lines to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Upload retries after the first failed attempt
    #[arg(long)]
    pub publish_retries: Option<u32>,

    #[command(flatten)]
    pub retention: RetentionArgs,
}

/// Arguments for the plan command.
#[derive(Debug, Default, Args)]
pub struct PlanArgs {
    /// Directory holding the backups
    #[arg(long)]
    pub backup_dir: Option<PathBuf>,

    /// Project whose backups to classify (default: name of the configured project directory)
    #[arg(short, long)]
    pub project: Option<String>,

    #[command(flatten)]
    pub retention: RetentionArgs,
}

/// Retention quota overrides.
#[derive(Debug, Default, Clone, Copy, Args)]
pub struct RetentionArgs {
    /// Most recent backups to keep
    #[arg(long)]
    pub keep_daily: Option<usize>,

    /// Weekly backups to keep
    #[arg(long)]
    pub keep_weekly: Option<usize>,

    /// Monthly backups to keep
    #[arg(long)]
    pub keep_monthly: Option<usize>,
}
