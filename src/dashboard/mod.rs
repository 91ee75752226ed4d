//! Dashboard home page aggregates

pub mod overview;

pub use overview::{Overview, StatusSlice, TimelineEntry};
