//! Table state held by the presentation layer
//!
//! A [`TableState`] is everything a list screen remembers between renders:
//! the filter inputs, the sort column and the page. Rendering is a call to
//! [`TableState::view`] with the freshly fetched collection.

use crate::config::TableConfig;
use crate::core::error::ValidationError;
use crate::core::field::FieldAccess;
use crate::query::comparator::SortDirection;
use crate::query::pagination::{PaginationMeta, empty_rows, page_window};
use crate::query::pipeline::{FilterCriteria, QueryEngine};
use chrono::NaiveDate;

/// What the table body should show
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableOutcome {
    /// At least one row matched
    Rows,
    /// Nothing matched an active filter
    NoResults { query: String },
    /// The collection itself is empty
    NoData,
}

/// Rendered state of one table
#[derive(Debug, Clone)]
pub struct TableView<R> {
    /// Rows of the current page, in display order
    pub rows: Vec<R>,
    /// Number of rows after filtering
    pub filtered_len: usize,
    /// Placeholder rows to pad the page with
    pub empty_rows: usize,
    pub pagination: PaginationMeta,
    pub outcome: TableOutcome,
}

/// Filter, sort and page state of one list screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableState {
    criteria: FilterCriteria,
    page: usize,
    page_size: usize,
    page_size_options: Vec<usize>,
}

impl TableState {
    /// Fresh state sorted ascending on `default_sort`
    pub fn new(default_sort: impl Into<String>, config: &TableConfig) -> Self {
        Self {
            criteria: FilterCriteria::new(default_sort),
            page: 0,
            page_size: config.default_page_size,
            page_size_options: config.page_size_options.clone(),
        }
    }

    /// Fresh state for the engine's schema
    pub fn for_engine(engine: &QueryEngine, config: &TableConfig) -> Self {
        Self::new(engine.schema().default_sort.clone(), config)
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn page_size_options(&self) -> &[usize] {
        &self.page_size_options
    }

    /// Clicking a column header
    ///
    /// The current column flips from ascending to descending; anything
    /// else (a new column, or the current column already descending)
    /// sorts ascending.
    pub fn request_sort(&mut self, field: &str) {
        let is_asc = self.criteria.sort_field == field
            && self.criteria.sort_direction == SortDirection::Asc;
        self.criteria.sort_direction = if is_asc {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        };
        self.criteria.sort_field = field.to_string();
    }

    /// Keeps the current page
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.criteria.text = text.into();
    }

    /// Keeps the current page
    pub fn set_date_range(&mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) {
        self.criteria.start_date = start;
        self.criteria.end_date = end;
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = page;
    }

    /// Change rows per page and go back to the first page
    pub fn set_page_size(&mut self, page_size: usize) -> Result<(), ValidationError> {
        if !self.page_size_options.contains(&page_size) {
            return Err(ValidationError::FieldError {
                field: "page_size".to_string(),
                message: format!(
                    "{} is not one of the allowed page sizes {:?}",
                    page_size, self.page_size_options
                ),
            });
        }
        self.page_size = page_size;
        self.page = 0;
        Ok(())
    }

    /// Run the query and cut out the current page
    pub fn view<R>(&self, engine: &QueryEngine, records: &[R]) -> TableView<R>
    where
        R: FieldAccess + Clone,
    {
        let filtered = engine.apply(records, &self.criteria);

        let outcome = if !filtered.is_empty() {
            TableOutcome::Rows
        } else if self.criteria.is_filtering() {
            TableOutcome::NoResults {
                query: self.criteria.text.clone(),
            }
        } else {
            TableOutcome::NoData
        };

        TableView {
            rows: page_window(&filtered, self.page, self.page_size).to_vec(),
            filtered_len: filtered.len(),
            // Padding is counted against the unfiltered collection
            empty_rows: empty_rows(self.page, self.page_size, records.len()),
            pagination: PaginationMeta::new(self.page, self.page_size, filtered.len()),
            outcome,
        }
    }
}
