//! Plan command implementation.

use crate::cli::PlanArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use snapkeep_janitor::Janitor;
use snapkeep_runner::DirectoryStore;

/// Execute the plan command.
///
/// Lists the backup directory and prints the classification; nothing is
/// deleted.
pub fn execute_plan(args: PlanArgs, config: Config, formatter: &Formatter) -> Result<()> {
    let (backup_dir, project, janitor_config) = config.resolve_plan(&args)?;

    let store = DirectoryStore::new(backup_dir);
    let plan = Janitor::new(janitor_config).plan(&store, &project)?;

    println!("{}", formatter.plan_table(&project, &plan));
    Ok(())
}
