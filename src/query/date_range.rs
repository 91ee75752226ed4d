//! Inclusive calendar-day range filter

use crate::core::field::{FieldAccess, calendar_date};
use chrono::NaiveDate;

/// Whether the record's date falls inside `[start, end]`
///
/// Both bounds are inclusive at day granularity and either may be open.
/// With no bounds every record passes; with any bound a record whose date
/// is missing or unreadable is excluded.
pub fn matches_date_range<R: FieldAccess + ?Sized>(
    record: &R,
    date_field: Option<&str>,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> bool {
    if start.is_none() && end.is_none() {
        return true;
    }

    let Some(day) = date_field
        .and_then(|field| record.present(field))
        .and_then(calendar_date)
    else {
        return false;
    };

    let after_start = start.is_none_or(|s| day >= s);
    let before_end = end.is_none_or(|e| day <= e);
    after_start && before_end
}
