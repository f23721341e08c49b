//! Backup run implementation.

use crate::config::RunSettings;
use crate::error::Result;
use crate::output::Formatter;
use snapkeep_janitor::Janitor;
use snapkeep_runner::{
    DirectoryArchiver, RetryingPublisher, RunController, RunOutcome, WebhookNotifier,
};

/// Execute one backup run.
///
/// Returns the outcome once the artifact exists, whatever happened in the
/// later stages. Failing to lock the backup directory or to create the
/// artifact is an error.
pub fn execute_run(settings: RunSettings, formatter: &Formatter) -> Result<RunOutcome> {
    let notifier = match settings.webhook_url {
        Some(url) => Some(WebhookNotifier::new(url)?),
        None => None,
    };

    let controller = RunController::new(
        DirectoryArchiver::new(settings.archiver),
        RetryingPublisher::new(settings.publisher, settings.retry),
        notifier,
        Janitor::new(settings.janitor),
    );

    let outcome = controller.execute(&settings.request)?;
    println!("{}", formatter.run_summary(&outcome));
    Ok(outcome)
}
