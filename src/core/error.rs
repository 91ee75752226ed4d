//! Typed error handling for desk-rs
//!
//! The query engine itself never fails. Everything around it (the REST
//! collaborator, configuration, forms, drafts, sessions) reports failures
//! through [`DeskError`] so callers can match on the category instead of
//! inspecting strings.
//!
//! # Error Categories
//!
//! - [`ApiError`]: the remote backend answered badly or not at all
//! - [`ConfigError`]: configuration parsing and validation
//! - [`ValidationError`]: form and input validation
//! - [`StorageError`]: record stores and draft persistence
//! - [`AuthError`]: login and capability checks
//!
//! # Example
//!
//! ```rust,ignore
//! match service.get(&id).await {
//!     Ok(record) => println!("Found: {:?}", record),
//!     Err(DeskError::Storage(StorageError::NotFound { id, .. })) => {
//!         println!("Record {} not found", id);
//!     }
//!     Err(e) => eprintln!("Other error: {}", e),
//! }
//! ```

use serde::Serialize;
use thiserror::Error;

/// The main error type for desk-rs
#[derive(Debug, Error)]
pub enum DeskError {
    /// Remote backend errors
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Configuration errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Record store and draft errors
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Session and permission errors
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Internal errors (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Serializable error summary handed to the presentation layer
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl DeskError {
    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            DeskError::Api(e) => e.error_code(),
            DeskError::Config(_) => "CONFIG_ERROR",
            DeskError::Validation(_) => "VALIDATION_ERROR",
            DeskError::Storage(e) => e.error_code(),
            DeskError::Auth(e) => e.error_code(),
            DeskError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Convert to an error response
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.error_code().to_string(),
            message: self.to_string(),
            details: self.details(),
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            DeskError::Storage(StorageError::NotFound { kind, id }) => Some(serde_json::json!({
                "kind": kind,
                "id": id,
            })),
            DeskError::Api(ApiError::Status { status, url }) => Some(serde_json::json!({
                "status": status,
                "url": url,
            })),
            DeskError::Validation(ValidationError::FieldErrors(errors)) => {
                Some(serde_json::json!({ "fields": errors }))
            }
            _ => None,
        }
    }
}

// =============================================================================
// API Errors
// =============================================================================

/// Errors talking to the remote backend
#[derive(Debug, Error)]
pub enum ApiError {
    /// The backend answered with a non-success status
    #[error("Request to {url} failed with status {status}")]
    Status { status: u16, url: String },

    /// The request never completed
    #[error("Transport error: {message}")]
    Transport { message: String },

    /// The response body could not be decoded
    #[error("Failed to decode response from {url}: {message}")]
    Decode { url: String, message: String },

    /// The backend answered but left out something the client needs
    #[error("Unexpected response from {url}: {message}")]
    UnexpectedResponse { url: String, message: String },
}

impl ApiError {
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::Status { .. } => "API_STATUS",
            ApiError::Transport { .. } => "API_TRANSPORT",
            ApiError::Decode { .. } => "API_DECODE",
            ApiError::UnexpectedResponse { .. } => "API_UNEXPECTED_RESPONSE",
        }
    }
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors related to configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to parse configuration
    #[error("Failed to parse config{}: {message}", .file.as_ref().map(|f| format!(" file '{}'", f)).unwrap_or_default())]
    ParseError {
        file: Option<String>,
        message: String,
    },

    /// Invalid value in configuration
    #[error("Invalid value '{value}' for field '{field}': {message}")]
    InvalidValue {
        field: String,
        value: String,
        message: String,
    },

    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },

    /// IO error while reading configuration
    #[error("IO error: {message}")]
    IoError { message: String },

    /// No schema registered under that name
    #[error("Unknown record schema: {name}")]
    UnknownSchema { name: String },

    /// A message template failed to render
    #[error("Template error: {message}")]
    Template { message: String },
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Errors related to input validation
#[derive(Debug, Error)]
pub enum ValidationError {
    /// Single field validation error
    #[error("Validation error for field '{field}': {message}")]
    FieldError { field: String, message: String },

    /// Multiple field validation errors, in form order
    #[error("Validation errors: {}", .0.iter().map(|e| format!("{}: {}", e.field, e.message)).collect::<Vec<_>>().join(", "))]
    FieldErrors(Vec<FieldValidationError>),

    /// Invalid JSON format
    #[error("Invalid JSON: {message}")]
    InvalidJson { message: String },

    /// Unknown measurement status
    #[error("Unknown measurement status: {value}")]
    InvalidStatus { value: String },

    /// Status change not allowed by the lifecycle
    #[error("Cannot move a measurement from '{from}' to '{to}'")]
    InvalidTransition { from: String, to: String },

    /// Photo exceeds the upload size limit
    #[error("\"{name}\" exceeds {max_kb} KB and will not be uploaded.")]
    PhotoTooLarge {
        name: String,
        size: usize,
        max_kb: usize,
    },
}

/// A single field validation error
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldValidationError {
    pub field: String,
    pub message: String,
}

impl FieldValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl ValidationError {
    /// Message recorded for `field`, if any
    pub fn message_for(&self, field: &str) -> Option<&str> {
        match self {
            ValidationError::FieldError { field: f, message } if f == field => {
                Some(message.as_str())
            }
            ValidationError::FieldErrors(errors) => errors
                .iter()
                .find(|e| e.field == field)
                .map(|e| e.message.as_str()),
            _ => None,
        }
    }
}

// =============================================================================
// Storage Errors
// =============================================================================

/// Errors related to record stores and drafts
#[derive(Debug, Error)]
pub enum StorageError {
    /// Record was not found
    #[error("{kind} with id '{id}' not found")]
    NotFound { kind: String, id: String },

    /// A lock guarding shared state was poisoned
    #[error("Failed to acquire {mode} lock: {message}")]
    Lock { mode: &'static str, message: String },

    /// A stored draft could not be read back
    #[error("Draft '{key}' is unreadable: {message}")]
    CorruptDraft { key: String, message: String },
}

impl StorageError {
    pub fn error_code(&self) -> &'static str {
        match self {
            StorageError::NotFound { .. } => "RECORD_NOT_FOUND",
            StorageError::Lock { .. } => "STORAGE_LOCK",
            StorageError::CorruptDraft { .. } => "CORRUPT_DRAFT",
        }
    }
}

// =============================================================================
// Auth Errors
// =============================================================================

/// Errors related to sessions and capabilities
#[derive(Debug, Error)]
pub enum AuthError {
    /// Login rejected
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// No session token present
    #[error("Not authenticated")]
    Unauthenticated,

    /// The role may not perform the action in the record's current state
    #[error("Role '{role}' may not {action}")]
    Forbidden { role: String, action: String },
}

impl AuthError {
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::InvalidCredentials => "INVALID_CREDENTIALS",
            AuthError::Unauthenticated => "UNAUTHENTICATED",
            AuthError::Forbidden { .. } => "FORBIDDEN",
        }
    }
}

// =============================================================================
// Conversions from external errors
// =============================================================================

impl From<serde_json::Error> for DeskError {
    fn from(err: serde_json::Error) -> Self {
        DeskError::Validation(ValidationError::InvalidJson {
            message: err.to_string(),
        })
    }
}

impl From<std::io::Error> for DeskError {
    fn from(err: std::io::Error) -> Self {
        DeskError::Config(ConfigError::IoError {
            message: err.to_string(),
        })
    }
}

impl From<serde_yaml::Error> for DeskError {
    fn from(err: serde_yaml::Error) -> Self {
        DeskError::Config(ConfigError::ParseError {
            file: None,
            message: err.to_string(),
        })
    }
}

impl From<reqwest::Error> for DeskError {
    fn from(err: reqwest::Error) -> Self {
        let url = err.url().map(|u| u.to_string()).unwrap_or_default();
        if let Some(status) = err.status() {
            DeskError::Api(ApiError::Status {
                status: status.as_u16(),
                url,
            })
        } else if err.is_decode() {
            DeskError::Api(ApiError::Decode {
                url,
                message: err.to_string(),
            })
        } else {
            DeskError::Api(ApiError::Transport {
                message: err.to_string(),
            })
        }
    }
}

impl From<tera::Error> for DeskError {
    fn from(err: tera::Error) -> Self {
        DeskError::Config(ConfigError::Template {
            message: err.to_string(),
        })
    }
}

impl From<anyhow::Error> for DeskError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<DeskError>() {
            Ok(desk_err) => desk_err,
            Err(other) => DeskError::Internal(other.to_string()),
        }
    }
}

// =============================================================================
// Result type alias
// =============================================================================

/// A specialized Result type for desk-rs operations
pub type DeskResult<T> = Result<T, DeskError>;
