//! Market conventions for option chains.
//!
//! Expiry labels arrive as ISO dates (`YYYY-MM-DD`). Time to expiry is the
//! whole-day count between the snapshot date and expiry over a 365-day year.

use chrono::NaiveDate;

use crate::error::IvSurfError;

/// Format of expiry labels supplied by option chain sources.
pub const EXPIRY_FORMAT: &str = "%Y-%m-%d";

/// Day-count denominator for ACT/365.
pub const DAYS_PER_YEAR: f64 = 365.0;

/// Parse an expiry label such as `"2025-12-19"`.
///
/// # Errors
/// Returns [`IvSurfError::InvalidInput`] if the label is not a valid
/// `YYYY-MM-DD` calendar date.
///
/// ```
/// use ivsurf::conventions::parse_expiry;
///
/// let date = parse_expiry("2025-12-19")?;
/// assert_eq!(date.to_string(), "2025-12-19");
/// assert!(parse_expiry("19/12/2025").is_err());
/// # Ok::<(), ivsurf::IvSurfError>(())
/// ```
pub fn parse_expiry(label: &str) -> crate::error::Result<NaiveDate> {
    NaiveDate::parse_from_str(label.trim(), EXPIRY_FORMAT).map_err(|e| {
        IvSurfError::InvalidInput {
            message: format!("expiry '{label}' is not a {EXPIRY_FORMAT} date: {e}"),
        }
    })
}

/// Year fraction from `as_of` to `expiry`: whole days / 365.
///
/// Negative when `expiry` is before `as_of`, zero on the same day.
pub fn year_fraction(as_of: NaiveDate, expiry: NaiveDate) -> f64 {
    (expiry - as_of).num_days() as f64 / DAYS_PER_YEAR
}
