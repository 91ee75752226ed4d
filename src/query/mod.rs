//! List query engine
//!
//! Every list screen of the dashboard (measurements, users) shows the same
//! thing: the fetched collection, sorted on one column, narrowed by a text
//! query and an inclusive date range, then cut into pages. This module is
//! that pipeline, as pure functions over any [`FieldAccess`] record.
//!
//! [`FieldAccess`]: crate::core::field::FieldAccess

pub mod comparator;
pub mod date_range;
pub mod pagination;
pub mod pipeline;
pub mod table;
pub mod text;

pub use comparator::{SortDirection, get_comparator};
pub use date_range::matches_date_range;
pub use pagination::{Page, PaginationMeta, empty_rows, page_window};
pub use pipeline::{FilterCriteria, QueryEngine, apply_filter};
pub use table::{TableOutcome, TableState, TableView};
pub use text::matches_text;
