//! Server-defined records.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One entry returned by either service: a package, location, space,
/// pipeline, transfer or unit.
///
/// Records are open bags of fields in server order. Only a handful of keys
/// have accessors; everything else is reached through [`Record::get`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Wrap a JSON value, which must be an object.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(fields) => Some(Self(fields)),
            _ => None,
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// A field as a string, if present and a string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn uuid(&self) -> Option<&str> {
        self.get_str("uuid")
    }

    pub fn current_path(&self) -> Option<&str> {
        self.get_str("current_path")
    }

    pub fn package_type(&self) -> Option<&str> {
        self.get_str("package_type")
    }

    pub fn resource_uri(&self) -> Option<&str> {
        self.get_str("resource_uri")
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_fields(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for Record {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        Value::Object(record.0)
    }
}
