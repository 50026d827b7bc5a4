//! # proration_core: Utility Charge Proration for Partial Stays
//!
//! ## Layer 1 (Kernel) Role
//!
//! proration_core computes what an occupant owes for utilities over a stay
//! that only partly covers the provider's billing periods:
//! - Date and end-date convention types (`types::time`)
//! - Closed date intervals and stay periods (`types::interval`)
//! - Invoice value type with daily-rate calculation (`invoice`)
//! - The prorating engine and its breakdown result (`engine`)
//! - Named utility series, continuity checks, multi-series totals (`series`)
//! - Full-cycle invoice extrapolation from a first payment (`cycle`)
//! - Error types: `ProrationError`, `DateError` (`types::error`)
//!
//! ## Pure Computation
//!
//! Nothing in this crate performs I/O or logs. Every function is a pure
//! function of its inputs and may be called from any number of threads.
//! Amounts use `rust_decimal::Decimal` and are never rounded internally.
//!
//! ## Usage Examples
//!
//! ```rust
//! use proration_core::prelude::*;
//! use rust_decimal::Decimal;
//!
//! let d = |m, day| Date::from_ymd(2025, m, day).unwrap();
//! let stay = StayPeriod::try_new(d(5, 11), d(6, 27)).unwrap();
//! let light = UtilitySeries::new(
//!     "Light",
//!     EndDateConvention::Exclusive,
//!     vec![Invoice::new(d(5, 22), d(7, 22), Decimal::new(19387918, 2))],
//! );
//!
//! let charge = light.prorate(&stay).unwrap();
//! assert_eq!(charge.result.lines[0].invoice_days, 61);
//! assert_eq!(charge.result.lines[0].overlap_days, 36);
//! assert_eq!(charge.result.rounded_total(2), Decimal::new(11442050, 2));
//! ```
//!
//! ## Feature Flags
//!
//! - `serde` (default): Serialisation for dates, conventions, invoices and results
//! - `parallel` (default): Evaluate independent series with rayon in `series::prorate_all`

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod cycle;
pub mod engine;
pub mod invoice;
pub mod series;
pub mod types;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::cycle::{extrapolate_cycle_invoice, CycleEstimate};
    pub use crate::engine::{prorate_charges, ChargeBreakdownLine, ChargeResult};
    pub use crate::invoice::Invoice;
    pub use crate::series::{
        prorate_all, prorate_all_sequential, ContinuityIssue, ContinuityKind, SeriesCharge,
        StatementTotals, UtilitySeries,
    };
    pub use crate::types::{
        Date, DateError, DateInterval, EndDateConvention, ProrationError, StayPeriod,
    };
}
