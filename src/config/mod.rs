//! Configuration loading and management

use crate::core::error::{ConfigError, DeskResult};
use crate::core::schema::RecordSchema;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Remote backend settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL every API path and relative photo URL is resolved against
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://digiflex-backend.up.railway.app".to_string(),
            timeout_secs: 30,
        }
    }
}

/// List table defaults
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    pub default_page_size: usize,
    pub page_size_options: Vec<usize>,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            default_page_size: 5,
            page_size_options: vec![5, 10, 25],
        }
    }
}

/// WhatsApp share link settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShareConfig {
    /// Prefix added to the assignee's local number
    pub country_code: String,
    pub mobile_base_url: String,
    pub web_base_url: String,
    /// Tera template for the message body
    pub template: String,
}

pub const DEFAULT_SHARE_TEMPLATE: &str = "Hello {{ first_name }} {{ last_name }},\n\n\
Here are your measurement appointment details:\n\
👤 Name: {{ customer_name }}\n\
📞 Phone: {{ customer_mobile }}\n\
🏠 Address: {{ customer_address }}\n\
📅 Date: {{ measurement_date }}";

impl Default for ShareConfig {
    fn default() -> Self {
        Self {
            country_code: "91".to_string(),
            mobile_base_url: "https://api.whatsapp.com/send".to_string(),
            web_base_url: "https://web.whatsapp.com/send".to_string(),
            template: DEFAULT_SHARE_TEMPLATE.to_string(),
        }
    }
}

/// Photo upload limits
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhotoConfig {
    pub max_bytes: usize,
}

impl Default for PhotoConfig {
    fn default() -> Self {
        Self { max_bytes: 102_400 }
    }
}

/// Complete dashboard configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeskConfig {
    pub api: ApiConfig,
    pub table: TableConfig,
    pub schemas: Vec<RecordSchema>,
    pub share: ShareConfig,
    pub photos: PhotoConfig,
}

impl Default for DeskConfig {
    fn default() -> Self {
        Self::default_config()
    }
}

impl DeskConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> DeskResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|err| {
            if err.kind() == std::io::ErrorKind::NotFound {
                ConfigError::FileNotFound {
                    path: path.display().to_string(),
                }
            } else {
                ConfigError::IoError {
                    message: err.to_string(),
                }
            }
        })?;
        let config: Self =
            serde_yaml::from_str(&content).map_err(|err| ConfigError::ParseError {
                file: Some(path.display().to_string()),
                message: err.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> DeskResult<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Built-in configuration: the hosted backend, both record schemas
    pub fn default_config() -> Self {
        Self {
            api: ApiConfig::default(),
            table: TableConfig::default(),
            schemas: vec![RecordSchema::measurement(), RecordSchema::user()],
            share: ShareConfig::default(),
            photos: PhotoConfig::default(),
        }
    }

    /// Merge several configurations, later ones taking precedence
    ///
    /// A section (or built-in schema) still at its default value does not
    /// override an earlier one. Schemas are merged by name: a later schema
    /// replaces an earlier one with the same name, new names are appended.
    pub fn merge(configs: Vec<DeskConfig>) -> DeskConfig {
        let mut configs = configs.into_iter();
        let Some(mut merged) = configs.next() else {
            return Self::default_config();
        };

        for config in configs {
            if config.api != ApiConfig::default() {
                merged.api = config.api;
            }
            if config.table != TableConfig::default() {
                merged.table = config.table;
            }
            if config.share != ShareConfig::default() {
                merged.share = config.share;
            }
            if config.photos != PhotoConfig::default() {
                merged.photos = config.photos;
            }
            let builtin = Self::default_config().schemas;
            for schema in config.schemas {
                if builtin.contains(&schema) && merged.schemas.iter().any(|s| s.name == schema.name) {
                    continue;
                }
                match merged.schemas.iter_mut().find(|s| s.name == schema.name) {
                    Some(existing) => {
                        tracing::debug!(schema = %schema.name, "schema overridden by later config");
                        *existing = schema;
                    }
                    None => merged.schemas.push(schema),
                }
            }
        }

        merged
    }

    /// Reject values the dashboard cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api.base_url.trim().is_empty() {
            return Err(invalid("api.base_url", "", "must not be empty"));
        }
        if self.table.default_page_size == 0 {
            return Err(invalid("table.default_page_size", "0", "must be at least 1"));
        }
        if self.table.page_size_options.contains(&0) {
            return Err(invalid(
                "table.page_size_options",
                &format!("{:?}", self.table.page_size_options),
                "page sizes must be at least 1",
            ));
        }
        if !self
            .table
            .page_size_options
            .contains(&self.table.default_page_size)
        {
            return Err(invalid(
                "table.default_page_size",
                &self.table.default_page_size.to_string(),
                "must be one of table.page_size_options",
            ));
        }
        if self.photos.max_bytes == 0 {
            return Err(invalid("photos.max_bytes", "0", "must be at least 1"));
        }
        Ok(())
    }

    /// Look up a record schema by name
    pub fn schema(&self, name: &str) -> Result<&RecordSchema, ConfigError> {
        self.schemas
            .iter()
            .find(|s| s.name == name)
            .ok_or_else(|| ConfigError::UnknownSchema {
                name: name.to_string(),
            })
    }

    /// Absolute URL for an API path
    pub fn api_url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.api.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

fn invalid(field: &str, value: &str, message: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        message: message.to_string(),
    }
}
