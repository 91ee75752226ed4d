//! Record schemas: which fields the query engine reads for a record kind

use serde::{Deserialize, Serialize};

/// Field-accessor configuration for one kind of record
///
/// A single generic engine serves every list in the dashboard; the schema
/// is what tells it where the searchable text, the date and the default
/// sort key live.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSchema {
    /// Schema name used for lookup (e.g. "measurement", "user")
    pub name: String,

    /// Fields searched by the free-text filter
    pub search_fields: Vec<String>,

    /// Field holding the calendar date used by the date-range filter
    #[serde(default)]
    pub date_field: Option<String>,

    /// Sort field used when the table is first shown
    pub default_sort: String,

    /// Field holding the record identifier
    #[serde(default = "default_id_field")]
    pub id_field: String,
}

fn default_id_field() -> String {
    "id".to_string()
}

impl RecordSchema {
    pub fn new(name: impl Into<String>, search_fields: &[&str], default_sort: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            search_fields: search_fields.iter().map(|f| f.to_string()).collect(),
            date_field: None,
            default_sort: default_sort.into(),
            id_field: default_id_field(),
        }
    }

    pub fn with_date_field(mut self, field: impl Into<String>) -> Self {
        self.date_field = Some(field.into());
        self
    }

    pub fn with_id_field(mut self, field: impl Into<String>) -> Self {
        self.id_field = field.into();
        self
    }

    /// Measurement appointments as the backend returns them
    pub fn measurement() -> Self {
        Self::new(
            "measurement",
            &["customer_name", "customer_mobile", "customer_address"],
            "customer_name",
        )
        .with_date_field("measurement_date")
    }

    /// Users of the directory
    pub fn user() -> Self {
        Self::new("user", &["first_name", "last_name", "phone", "email"], "first_name")
            .with_date_field("created_at")
            .with_id_field("user_id")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measurement_schema() {
        let schema = RecordSchema::measurement();
        assert_eq!(schema.name, "measurement");
        assert_eq!(
            schema.search_fields,
            vec!["customer_name", "customer_mobile", "customer_address"]
        );
        assert_eq!(schema.date_field.as_deref(), Some("measurement_date"));
        assert_eq!(schema.id_field, "id");
    }

    #[test]
    fn test_user_schema() {
        let schema = RecordSchema::user();
        assert!(schema.search_fields.contains(&"email".to_string()));
        assert_eq!(schema.id_field, "user_id");
    }

    #[test]
    fn test_schema_yaml_defaults() {
        let yaml = r#"
name: customer
search_fields: [name]
default_sort: name
"#;
        let schema: RecordSchema = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(schema.date_field, None);
        assert_eq!(schema.id_field, "id");
    }
}
