//! # desk-rs
//!
//! Core of a measurement-and-installation administration dashboard. Staff
//! record customer measurement appointments, assign them to field users and
//! follow them from `created` to `approved`; every list screen runs through
//! one generic query engine.
//!
//! ## Features
//!
//! - **List Query Engine**: stable sort, text search, inclusive date range and pagination
//! - **Schema-Driven**: one engine for every record kind, configured by [`RecordSchema`]
//! - **Explicit Sessions**: capabilities derived from role and record status
//! - **REST Collaborators**: async record and photo-upload services over `reqwest`
//! - **Forms & Drafts**: validation, payload building and session drafts
//! - **Configuration-Based**: YAML configuration with layered merging
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use desk::prelude::*;
//!
//! let config = DeskConfig::default_config();
//! let engine = QueryEngine::new(config.schema("measurement")?.clone());
//! let service = HttpRecordService::<Measurement>::new(&config.api)?;
//!
//! let records = to_records(&service.list().await?)?;
//! let mut table = TableState::for_engine(&engine, &config.table);
//! table.set_text("raj");
//! table.request_sort("measurement_date");
//!
//! let view = table.view(&engine, &records);
//! println!("{} rows, {} placeholders", view.rows.len(), view.empty_rows);
//! ```
//!
//! [`RecordSchema`]: crate::core::schema::RecordSchema

pub mod config;
pub mod core;
pub mod dashboard;
pub mod entities;
pub mod query;
pub mod share;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        auth::{
            AccessPolicy, Action, ActionSet, Authenticator, Capabilities, LoginForm, Role,
            Session, SessionUser, StaticAuthenticator,
        },
        entity::{Entity, RecordId, to_records},
        error::{DeskError, DeskResult},
        field::{FieldAccess, FieldFormat},
        record::Record,
        schema::RecordSchema,
        service::{PhotoUpload, PhotoUploader, RecordService},
        status::MeasurementStatus,
    };

    // === Macros ===
    pub use crate::{impl_entity, record};

    // === Query Engine ===
    pub use crate::query::{
        FilterCriteria, Page, PaginationMeta, QueryEngine, SortDirection, TableOutcome,
        TableState, TableView, apply_filter, empty_rows, get_comparator, matches_date_range,
        matches_text, page_window,
    };

    // === Entities ===
    pub use crate::entities::{
        Area, AreaForm, Measurement, MeasurementForm, PhotoRef, User, UserForm, assignable_users,
    };

    // === Storage ===
    pub use crate::storage::{
        DraftStore, HttpPhotoUploader, HttpRecordService, InMemoryRecordService,
        MEASUREMENT_FORM_DRAFT, USER_FORM_DRAFT,
    };

    // === Share & Dashboard ===
    pub use crate::dashboard::Overview;
    pub use crate::share::{Platform, WhatsAppLink};

    // === Config ===
    pub use crate::config::{ApiConfig, DeskConfig, PhotoConfig, ShareConfig, TableConfig};

    // === External dependencies ===
    pub use async_trait::async_trait;
    pub use chrono::{NaiveDate, Utc};
    pub use serde::{Deserialize, Serialize};
}
