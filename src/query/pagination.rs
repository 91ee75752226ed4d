//! Pagination windowing

use serde::Serialize;

/// Placeholder rows needed to keep the last page at full height
///
/// The first page never pads. Every later page pads up to `page_size`
/// rows counted against `total`.
pub fn empty_rows(page: usize, page_size: usize, total: usize) -> usize {
    if page == 0 {
        return 0;
    }
    (page + 1).saturating_mul(page_size).saturating_sub(total)
}

/// Rows shown on `page` (0-based); empty past the end
pub fn page_window<R>(rows: &[R], page: usize, page_size: usize) -> &[R] {
    let start = page.saturating_mul(page_size);
    if start >= rows.len() {
        return &[];
    }
    let end = start.saturating_add(page_size).min(rows.len());
    &rows[start..end]
}

/// One page of rows with its metadata
#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub pagination: PaginationMeta,
}

impl<T: Clone> Page<T> {
    pub fn of(rows: &[T], page: usize, page_size: usize) -> Self {
        Self {
            data: page_window(rows, page, page_size).to_vec(),
            pagination: PaginationMeta::new(page, page_size, rows.len()),
        }
    }
}

/// Pagination metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaginationMeta {
    /// Current page number (starts at 0)
    pub page: usize,

    /// Number of rows per page
    pub page_size: usize,

    /// Total number of rows (after filters)
    pub total: usize,

    pub total_pages: usize,

    pub has_next: bool,

    pub has_prev: bool,
}

impl PaginationMeta {
    pub fn new(page: usize, page_size: usize, total: usize) -> Self {
        // Zero-sized pages would divide by zero
        let page_size = page_size.max(1);
        let total_pages = total.div_ceil(page_size);
        let start = page.saturating_mul(page_size);

        Self {
            page,
            page_size,
            total,
            total_pages,
            has_next: start.saturating_add(page_size) < total,
            has_prev: page > 0,
        }
    }
}
