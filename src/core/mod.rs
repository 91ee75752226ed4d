//! Core module containing fundamental traits and types for the dashboard

pub mod auth;
pub mod entity;
pub mod error;
pub mod field;
pub mod record;
pub mod schema;
pub mod service;
pub mod status;
pub mod validation;

pub use auth::{AccessPolicy, Action, ActionSet, Capabilities, Role, Session};
pub use entity::{Entity, RecordId};
pub use error::{DeskError, DeskResult};
pub use field::{FieldAccess, FieldFormat};
pub use record::Record;
pub use schema::RecordSchema;
pub use service::{PhotoUpload, PhotoUploader, RecordService};
pub use status::MeasurementStatus;
