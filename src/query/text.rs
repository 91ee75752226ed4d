//! Free-text filter

use crate::core::field::{FieldAccess, search_text};

/// Case-insensitive substring match over `fields`
///
/// An empty query matches every record. Null, absent and non-text fields
/// are skipped.
pub fn matches_text<R: FieldAccess + ?Sized>(record: &R, query: &str, fields: &[String]) -> bool {
    if query.is_empty() {
        return true;
    }
    let needle = query.to_lowercase();
    contains_lowercase(record, &needle, fields)
}

/// Same as [`matches_text`] with an already lower-cased, non-empty needle
pub(crate) fn contains_lowercase<R: FieldAccess + ?Sized>(
    record: &R,
    needle: &str,
    fields: &[String],
) -> bool {
    fields.iter().any(|field| {
        record
            .present(field)
            .and_then(search_text)
            .is_some_and(|text| text.to_lowercase().contains(needle))
    })
}
