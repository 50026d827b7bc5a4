//! CLI command implementations
//!
//! Each submodule implements a specific CLI command.

pub mod check;
pub mod cycle;
pub mod run;

use proration_core::series::UtilitySeries;
use tracing::warn;

/// Log every continuity issue of every series as a warning
///
/// Returns the number of issues found.
pub(crate) fn warn_continuity(series: &[UtilitySeries]) -> crate::Result<usize> {
    let mut count = 0;
    for s in series {
        for issue in s.continuity_issues()? {
            warn!(series = %s.name, convention = %s.convention, "{}", issue);
            count += 1;
        }
    }
    Ok(count)
}
