//! Snapkeep CLI - back up a project directory with tiered retention.

use clap::Parser;
use snapkeep_cli::commands;
use snapkeep_cli::logging;
use snapkeep_cli::{Cli, Command, Config, Formatter};

fn main() {
    let cli = Cli::parse();
    let formatter = Formatter::new(!cli.no_color);

    // Exit status reflects archive creation only; later failures are reported
    // in the summary and the log
    if let Err(e) = run(cli, &formatter) {
        eprintln!("{}", formatter.error(&e.to_string()));
        std::process::exit(1);
    }
}

fn run(cli: Cli, formatter: &Formatter) -> snapkeep_cli::Result<()> {
    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Some(Command::Plan(args)) => commands::execute_plan(args, config, formatter),
        None => {
            let settings = config.resolve_run(&cli.run)?;
            logging::init(&settings.log_file)?;
            commands::execute_run(settings, formatter)?;
            Ok(())
        }
    }
}
