//! Storage implementations for the record services and drafts

pub mod drafts;
pub mod http;
pub mod in_memory;

pub use drafts::{DraftStore, MEASUREMENT_FORM_DRAFT, USER_FORM_DRAFT};
pub use http::{HttpPhotoUploader, HttpRecordService};
pub use in_memory::InMemoryRecordService;
