//! Check command implementation
//!
//! Validates a run file without printing a statement: every invoice must
//! yield a daily rate, and continuity gaps or overlaps are reported as
//! warnings.

use tracing::info;

use crate::config::RunFile;
use crate::{CliError, Result};

/// Summary of a successful check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckSummary {
    /// Number of series in the run file
    pub series: usize,
    /// Number of invoices across all series
    pub invoices: usize,
    /// Number of continuity gaps and overlaps found
    pub continuity_warnings: usize,
}

/// Validate every invoice of every series
pub fn check(run_file: &RunFile) -> Result<CheckSummary> {
    run_file.validate()?;

    let mut invoices = 0;
    for series in &run_file.series {
        for invoice in &series.invoices {
            invoice
                .daily_rate(series.convention)
                .map_err(|e| CliError::proration(&series.name, e))?;
            invoices += 1;
        }
    }

    let continuity_warnings = super::warn_continuity(&run_file.series)?;

    Ok(CheckSummary {
        series: run_file.series.len(),
        invoices,
        continuity_warnings,
    })
}

/// Run the check command
pub fn run(run_file: &RunFile) -> Result<()> {
    info!("Checking run file...");
    let summary = check(run_file)?;
    println!(
        "OK: {} series, {} invoices, {} continuity warning(s)",
        summary.series, summary.invoices, summary.continuity_warnings
    );
    Ok(())
}
