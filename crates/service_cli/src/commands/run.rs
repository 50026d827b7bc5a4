//! Run command implementation
//!
//! Prorates every series in the run file against the stay and renders the
//! statement.

use proration_core::series::{prorate_all, StatementTotals};
use proration_core::types::ProrationError;
use tracing::{debug, info};

use crate::config::{OutputFormat, RunFile};
use crate::report::{render_json, render_statement};
use crate::{CliError, Result};

/// Prorate all series and return the statement
///
/// The run file is validated first. A failing series is reported under its
/// own name.
pub fn prorate(run_file: &RunFile) -> Result<StatementTotals> {
    run_file.validate()?;

    info!(
        stay_start = %run_file.stay.start,
        stay_end = %run_file.stay.end,
        series = run_file.series.len(),
        "Prorating utility charges"
    );

    super::warn_continuity(&run_file.series)?;

    let statement = prorate_all(&run_file.stay, &run_file.series).map_err(|err| match err {
        ProrationError::Series { name, source, .. } => CliError::proration(name, *source),
        other => CliError::Engine(other),
    })?;

    for charge in &statement.series {
        debug!(
            series = %charge.name,
            lines = charge.result.lines.len(),
            total = %charge.result.total,
            "Series prorated"
        );
    }
    Ok(statement)
}

/// Render the statement in the requested format
pub fn render(statement: &StatementTotals, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Table => Ok(render_statement(statement)),
        OutputFormat::Json => Ok(render_json(statement)?),
    }
}

/// Run the run command
pub fn run(run_file: &RunFile, format: OutputFormat) -> Result<()> {
    let statement = prorate(run_file)?;
    let output = render(&statement, format)?;
    print!("{}", output);
    if format == OutputFormat::Json {
        println!();
    }
    info!(grand_total = %statement.grand_total, "Statement complete");
    Ok(())
}
