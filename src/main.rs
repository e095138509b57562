mod cli;
mod settings;
mod workflow;

use anyhow::Result;
use cli::{OutputFormat, parse_cli, print_json, print_plain};
use livequery::logging;
use settings::ResolvedConfig;
use workflow::SessionWorkflow;

fn main() -> Result<()> {
    let cli = parse_cli();
    logging::initialize(logging::level_for_verbosity(cli.verbose));

    let resolved = settings::load(&cli)?;

    if cli.print_config {
        resolved.print_summary();
    }

    run_session(cli.output, resolved)
}

/// Run one session to completion and print its outcome in the chosen format.
fn run_session(format: OutputFormat, settings: ResolvedConfig) -> Result<()> {
    let workflow = SessionWorkflow::from_config(settings)?;
    let outcome = workflow.run()?;

    match format {
        OutputFormat::Plain => print_plain(&outcome),
        OutputFormat::Json => print_json(&outcome)?,
    }

    Ok(())
}
