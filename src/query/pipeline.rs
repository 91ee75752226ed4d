//! Sort-then-filter pipeline over an in-memory collection

use crate::core::field::FieldAccess;
use crate::core::schema::RecordSchema;
use crate::query::comparator::{SortDirection, get_comparator};
use crate::query::date_range::matches_date_range;
use crate::query::text::contains_lowercase;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Current filter and sort choices of one table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    /// Free-text query, empty when unused
    #[serde(default)]
    pub text: String,

    /// First calendar day included
    #[serde(default)]
    pub start_date: Option<NaiveDate>,

    /// Last calendar day included
    #[serde(default)]
    pub end_date: Option<NaiveDate>,

    pub sort_field: String,

    #[serde(default)]
    pub sort_direction: SortDirection,
}

impl FilterCriteria {
    /// Ascending on `sort_field`, nothing filtered
    pub fn new(sort_field: impl Into<String>) -> Self {
        Self {
            sort_field: sort_field.into(),
            ..Self::default()
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_date_range(mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        self.start_date = start;
        self.end_date = end;
        self
    }

    pub fn sorted_by(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.sort_field = field.into();
        self.sort_direction = direction;
        self
    }

    /// True when any criterion narrows the collection
    pub fn is_filtering(&self) -> bool {
        !self.text.is_empty() || self.start_date.is_some() || self.end_date.is_some()
    }
}

/// Stable sort, then text filter, then date filter
///
/// The input is never modified. Filtering keeps the sorted order, and
/// records that compare equal keep their input order.
pub fn apply_filter<R, C>(
    records: &[R],
    comparator: C,
    schema: &RecordSchema,
    text_query: &str,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Vec<R>
where
    R: FieldAccess + Clone,
    C: Fn(&R, &R) -> Ordering,
{
    let mut decorated: Vec<(usize, &R)> = records.iter().enumerate().collect();
    decorated.sort_by(|(ia, a), (ib, b)| comparator(a, b).then_with(|| ia.cmp(ib)));

    let needle = text_query.to_lowercase();
    let date_field = schema.date_field.as_deref();

    decorated
        .into_iter()
        .map(|(_, record)| record)
        .filter(|record| needle.is_empty() || contains_lowercase(*record, &needle, &schema.search_fields))
        .filter(|record| matches_date_range(*record, date_field, start, end))
        .cloned()
        .collect()
}

/// Query engine bound to one record schema
#[derive(Debug, Clone)]
pub struct QueryEngine {
    schema: RecordSchema,
}

impl QueryEngine {
    pub fn new(schema: RecordSchema) -> Self {
        Self { schema }
    }

    pub fn schema(&self) -> &RecordSchema {
        &self.schema
    }

    /// Criteria with this schema's default sort and no filters
    pub fn default_criteria(&self) -> FilterCriteria {
        FilterCriteria::new(self.schema.default_sort.clone())
    }

    /// Ordered, filtered view of `records` under `criteria`
    pub fn apply<R>(&self, records: &[R], criteria: &FilterCriteria) -> Vec<R>
    where
        R: FieldAccess + Clone,
    {
        let comparator = get_comparator::<R>(criteria.sort_direction, criteria.sort_field.as_str());
        let rows = apply_filter(
            records,
            comparator,
            &self.schema,
            &criteria.text,
            criteria.start_date,
            criteria.end_date,
        );

        tracing::debug!(
            schema = %self.schema.name,
            input = records.len(),
            output = rows.len(),
            sort_field = %criteria.sort_field,
            sort_direction = %criteria.sort_direction,
            "applied list query"
        );

        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::record::Record;
    use crate::record;

    fn names(rows: &[Record]) -> Vec<&str> {
        rows.iter().map(|r| r.get_str("customer_name").unwrap_or("-")).collect()
    }

    fn day(s: &str) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
    }

    fn sample() -> Vec<Record> {
        vec![
            record! { "customer_name" => "Alice", "measurement_date" => "2024-01-05" },
            record! { "customer_name" => "Bob", "measurement_date" => null },
            record! { "customer_name" => "Carl", "measurement_date" => "2024-01-10" },
        ]
    }

    #[test]
    fn test_sort_then_filter_by_date() {
        let engine = QueryEngine::new(RecordSchema::measurement());
        let criteria = engine
            .default_criteria()
            .with_date_range(day("2024-01-01"), day("2024-01-07"));
        let rows = engine.apply(&sample(), &criteria);
        assert_eq!(names(&rows), vec!["Alice"]);
    }

    #[test]
    fn test_stable_for_equal_keys() {
        let rows = vec![
            record! { "customer_name" => "A", "group" => 1 },
            record! { "customer_name" => "B", "group" => 0 },
            record! { "customer_name" => "C", "group" => 1 },
            record! { "customer_name" => "D", "group" => 0 },
        ];
        let engine = QueryEngine::new(RecordSchema::measurement());

        let asc = engine.apply(&rows, &FilterCriteria::new("group"));
        assert_eq!(names(&asc), vec!["B", "D", "A", "C"]);

        let desc = engine.apply(
            &rows,
            &FilterCriteria::new("group").sorted_by("group", SortDirection::Desc),
        );
        assert_eq!(names(&desc), vec!["A", "C", "B", "D"]);
    }

    #[test]
    fn test_input_not_modified() {
        let rows = sample();
        let before = rows.clone();
        let engine = QueryEngine::new(RecordSchema::measurement());
        let _ = engine.apply(
            &rows,
            &FilterCriteria::new("customer_name").sorted_by("customer_name", SortDirection::Desc),
        );
        assert_eq!(rows, before);
    }

    #[test]
    fn test_text_filter_keeps_sorted_order() {
        let rows = vec![
            record! { "customer_name" => "Zara Khan" },
            record! { "customer_name" => "Amir Khan" },
            record! { "customer_name" => "Bob" },
        ];
        let engine = QueryEngine::new(RecordSchema::measurement());
        let out = engine.apply(&rows, &FilterCriteria::new("customer_name").with_text("KHAN"));
        assert_eq!(names(&out), vec!["Amir Khan", "Zara Khan"]);
    }

    #[test]
    fn test_empty_input() {
        let engine = QueryEngine::new(RecordSchema::measurement());
        let rows: Vec<Record> = Vec::new();
        assert!(engine.apply(&rows, &engine.default_criteria().with_text("x")).is_empty());
    }

    #[test]
    fn test_apply_filter_with_custom_comparator() {
        let rows = sample();
        let by_name_len = |a: &Record, b: &Record| {
            let len = |r: &Record| r.get_str("customer_name").map(str::len).unwrap_or(0);
            len(a).cmp(&len(b))
        };
        let out = apply_filter(&rows, by_name_len, &RecordSchema::measurement(), "", None, None);
        assert_eq!(names(&out), vec!["Bob", "Carl", "Alice"]);
    }

    #[test]
    fn test_criteria_is_filtering() {
        assert!(!FilterCriteria::new("x").is_filtering());
        assert!(FilterCriteria::new("x").with_text("a").is_filtering());
        assert!(FilterCriteria::new("x").with_date_range(None, day("2024-01-01")).is_filtering());
    }
}
