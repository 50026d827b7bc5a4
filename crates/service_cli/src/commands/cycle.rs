//! Cycle command implementation
//!
//! Extrapolates a full billing-cycle invoice from the payment for its first
//! part and prints it as a run-file invoice entry.

use proration_core::cycle::{extrapolate_cycle_invoice, CycleEstimate};
use proration_core::invoice::Invoice;
use proration_core::types::EndDateConvention;
use tracing::{debug, info};

use crate::Result;

/// Build the extrapolated invoice
pub fn extrapolate(estimate: &CycleEstimate, convention: EndDateConvention) -> Result<Invoice> {
    let invoice = extrapolate_cycle_invoice(estimate, convention)?;
    debug!(
        end = %invoice.end,
        amount = %invoice.amount,
        "Cycle extrapolated"
    );
    Ok(invoice)
}

/// Format an invoice as an inline TOML table for a run file
pub fn toml_entry(invoice: &Invoice) -> String {
    format!(
        "{{ start = \"{}\", end = \"{}\", amount = \"{}\" }}",
        invoice.start,
        invoice.end,
        invoice.amount.round_dp(2)
    )
}

/// Run the cycle command
pub fn run(estimate: &CycleEstimate, convention: EndDateConvention) -> Result<()> {
    info!(
        cycle_start = %estimate.cycle_start,
        total_days = estimate.total_calendar_days,
        convention = %convention,
        "Extrapolating billing cycle"
    );
    let invoice = extrapolate(estimate, convention)?;
    println!("{}", toml_entry(&invoice));
    Ok(())
}
