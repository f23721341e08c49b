//! Output formatting for the CLI.

use colored::*;
use snapkeep_domain::{Artifact, RunStatus, Tier};
use snapkeep_janitor::{newest_first, RetentionPlan};
use snapkeep_runner::{NotificationOutcome, RunOutcome};
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(color_enabled: bool) -> Self {
        Self { color_enabled }
    }

    /// Summary of a run whose artifact was created.
    pub fn run_summary(&self, outcome: &RunOutcome) -> String {
        let mut lines = vec![self.success(&format!(
            "Backup created: {}",
            outcome.artifact.location.display()
        ))];

        match &outcome.publish {
            Ok(()) => lines.push(self.success("Backup uploaded")),
            Err(e) => lines.push(self.error(&format!("Upload failed: {}", e))),
        }

        match &outcome.sweep {
            Ok(report) => {
                let verb = if report.dry_run { "would delete" } else { "deleted" };
                lines.push(self.info(&format!(
                    "Retention: {} kept ({} daily, {} weekly, {} monthly), {} {}",
                    report.total_retained(),
                    report.retained_in(Tier::Daily),
                    report.retained_in(Tier::Weekly),
                    report.retained_in(Tier::Monthly),
                    verb,
                    report.total_deleted()
                )));
                for failure in &report.failures {
                    lines.push(self.error(&failure.to_string()));
                }
            }
            Err(e) => lines.push(self.error(&format!("Retention failed: {}", e))),
        }

        match &outcome.notification {
            NotificationOutcome::Disabled => lines.push(self.info("Notification disabled")),
            NotificationOutcome::Sent(status) => {
                lines.push(self.success(&format!("Notification sent ({})", status)))
            }
            NotificationOutcome::Failed { error, .. } => {
                lines.push(self.warning(&format!("Notification failed: {}", error)))
            }
        }

        lines.push(match outcome.status() {
            RunStatus::Success => self.success("Run completed"),
            RunStatus::Failure => self.warning("Run completed with failures"),
        });

        lines.join("\n")
    }

    /// Retention plan as a table, newest first.
    pub fn plan_table(&self, project: &str, plan: &RetentionPlan) -> String {
        if plan.is_empty() {
            return self.colorize(&format!("No backups found for '{}'.", project), "yellow");
        }

        let mut rows: Vec<(&Artifact, Option<Tier>)> = plan
            .retained()
            .iter()
            .map(|(artifact, tier)| (artifact, Some(*tier)))
            .chain(plan.deleted().iter().map(|artifact| (artifact, None)))
            .collect();
        rows.sort_by(|a, b| newest_first(a.0, b.0));

        let mut builder = Builder::default();
        builder.push_record(["Backup", "Created (UTC)", "Action"]);

        for (artifact, tier) in rows {
            let created = artifact.created_at().format("%Y-%m-%d %H:%M:%S").to_string();
            let action = match tier {
                Some(tier) => self.colorize(&format!("keep ({})", tier), "green"),
                None => self.colorize("delete", "red"),
            };
            builder.push_record([artifact.file_name.clone(), created, action]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        format!(
            "{}\n{}",
            table,
            self.info(&format!(
                "{} kept, {} to delete",
                plan.retained().len(),
                plan.deleted().len()
            ))
        )
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}
