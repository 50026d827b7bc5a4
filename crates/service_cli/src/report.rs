//! Statement rendering
//!
//! Turns engine results into the text shown to the occupant. Rounding to
//! cents happens here and nowhere else.

use proration_core::series::{SeriesCharge, StatementTotals};
use rust_decimal::{Decimal, RoundingStrategy};
use std::fmt::{self, Write};

const GRAND_TOTAL_LABEL: &str = "GRAND TOTAL OWED";

/// Converts a number to its ordinal form (1 -> "1st", 12 -> "12th", 22 -> "22nd")
pub fn ordinal(number: usize) -> String {
    let suffix = if (11..=13).contains(&(number % 100)) {
        "th"
    } else {
        match number % 10 {
            1 => "st",
            2 => "nd",
            3 => "rd",
            _ => "th",
        }
    };
    format!("{}{}", number, suffix)
}

/// Formats an amount as dollars with thousands separators, rounded to cents
///
/// Midpoints round away from zero.
pub fn format_money(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let sign = if rounded < Decimal::ZERO { "-" } else { "" };

    let digits = format!("{:.2}", rounded.abs());
    let (whole, cents) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{}${}.{}", sign, grouped, cents)
}

fn write_series<W: Write>(out: &mut W, charge: &SeriesCharge) -> fmt::Result {
    writeln!(out)?;
    writeln!(out, "--- Calculating Charges for {} ---", charge.name)?;

    if charge.result.is_empty() {
        return writeln!(out, "  No {} invoice overlaps the stay.", charge.name);
    }

    for line in &charge.result.lines {
        writeln!(
            out,
            "  {} {} Invoice [{} to {}]:",
            ordinal(line.ordinal()),
            charge.name,
            line.invoice_start,
            line.invoice_end
        )?;
        writeln!(out, "    - Overlapped for {} days.", line.overlap_days)?;
        writeln!(out, "    - Prorated charge: {}", format_money(line.charge))?;
    }
    Ok(())
}

/// Writes the full text statement for a stay
pub fn write_statement<W: Write>(out: &mut W, statement: &StatementTotals) -> fmt::Result {
    let stay = &statement.stay;
    writeln!(
        out,
        "Guest Stay: {} to {} ({} days)",
        stay.start,
        stay.end,
        stay.duration_days()
    )?;

    for charge in &statement.series {
        write_series(out, charge)?;
    }

    let labels: Vec<String> = statement
        .series
        .iter()
        .map(|s| format!("Total Prorated {} Charge", s.name))
        .collect();
    let width = labels
        .iter()
        .map(String::len)
        .chain(std::iter::once(GRAND_TOTAL_LABEL.len()))
        .max()
        .unwrap_or(GRAND_TOTAL_LABEL.len());

    writeln!(out)?;
    writeln!(out, "--- Final Summary ---")?;
    for (label, charge) in labels.iter().zip(&statement.series) {
        writeln!(
            out,
            "{:<width$}: {}",
            label,
            format_money(charge.result.total),
            width = width
        )?;
    }
    writeln!(out, "{}", "-".repeat(width + 2))?;
    writeln!(
        out,
        "{:<width$}: {}",
        GRAND_TOTAL_LABEL,
        format_money(statement.grand_total),
        width = width
    )
}

/// Renders the full text statement for a stay
pub fn render_statement(statement: &StatementTotals) -> String {
    let mut out = String::new();
    // Writing to a String never fails.
    let _ = write_statement(&mut out, statement);
    out
}

/// Renders the statement as pretty-printed JSON
pub fn render_json(statement: &StatementTotals) -> serde_json::Result<String> {
    serde_json::to_string_pretty(statement)
}
