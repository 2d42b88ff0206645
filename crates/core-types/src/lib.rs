pub mod enums;
pub mod error;

use chrono::NaiveDate;

// Re-export the core types to provide a clean public API.
pub use enums::{EventTag, FlagSet};
pub use error::CoreError;

/// The only date format accepted at the system boundary.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parses a `YYYY-MM-DD` string into a real calendar date.
///
/// Strings that match the shape but name an impossible day (e.g. `2025-02-30`) are
/// rejected as well.
pub fn parse_report_date(input: &str) -> Result<NaiveDate, CoreError> {
    NaiveDate::parse_from_str(input.trim(), DATE_FORMAT).map_err(|e| {
        CoreError::InvalidDateFormat {
            input: input.to_string(),
            reason: e.to_string(),
        }
    })
}
