//! The untyped record handed to the query engine

use crate::core::field::FieldAccess;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One measurement appointment or user entry, as a loose field map
///
/// Backends return whatever shape they like; the engine only needs named
/// access. Typed entities convert into a `Record` when they are listed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Builder-style insert
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(field.into(), value.into());
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(field.into(), value.into())
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// String value of `field`, if it is a string
    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.0.get(field).and_then(Value::as_str)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FieldAccess for Record {
    fn field(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }
}

impl From<Map<String, Value>> for Record {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl TryFrom<Value> for Record {
    type Error = Value;

    /// Only JSON objects are records; anything else is handed back
    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(other),
        }
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        record.into_value()
    }
}

/// Build a [`Record`] from `field => value` pairs
///
/// Values are single JSON tokens (`null`, literals); wrap anything longer
/// in parentheses.
///
/// ```rust,ignore
/// let r = record! { "customer_name" => "Alice", "measurement_date" => null };
/// let n = record! { "seq" => (i * 2) };
/// ```
#[macro_export]
macro_rules! record {
    () => { $crate::core::record::Record::new() };
    ($($field:tt => $value:tt),+ $(,)?) => {{
        let mut record = $crate::core::record::Record::new();
        $( record.insert($field, ::serde_json::json!($value)); )+
        record
    }};
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_builder() {
        let record = Record::new()
            .with("customer_name", "Alice")
            .with("measurement_date", Value::Null);
        assert_eq!(record.get_str("customer_name"), Some("Alice"));
        assert_eq!(record.get("measurement_date"), Some(&Value::Null));
        assert!(record.present("measurement_date").is_none());
        assert_eq!(record.len(), 2);
    }

    #[test]
    fn test_record_macro() {
        let record = crate::record! { "name" => "Raj Kumar", "score" => 5 };
        assert_eq!(record.get("score"), Some(&json!(5)));
        assert!(crate::record! {}.is_empty());
    }

    #[test]
    fn test_record_serde_is_transparent() {
        let value = json!({"name": "Bob", "date": null});
        let record: Record = serde_json::from_value(value.clone()).unwrap();
        assert_eq!(serde_json::to_value(&record).unwrap(), value);
    }

    #[test]
    fn test_try_from_non_object() {
        assert!(Record::try_from(json!([1, 2])).is_err());
        assert!(Record::try_from(json!({"a": 1})).is_ok());
    }
}
