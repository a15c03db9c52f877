//! Populated result tree produced by decoding a response against a document.

use chrono::{DateTime, NaiveDate, Utc};
use indexmap::IndexMap;
use thiserror::Error;
use url::Url;

/// A decoded response value.
///
/// Leaves carry the type their scalar kind resolved to, so timestamps and
/// URIs arrive parsed rather than as raw strings.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Absent or explicit null.
    Null,
    /// Boolean leaf.
    Boolean(bool),
    /// Integer leaf.
    Int(i64),
    /// Float leaf.
    Float(f64),
    /// Text, identifier, or HTML leaf.
    String(String),
    /// Enum member.
    Enum(String),
    /// URI leaf.
    Uri(Url),
    /// Calendar date leaf.
    Date(NaiveDate),
    /// Timestamp leaf, normalised to UTC.
    DateTime(DateTime<Utc>),
    /// Nested object.
    Object(Object),
    /// Sequence.
    List(Vec<Value>),
}

impl Value {
    /// Returns the object payload when this value is an object.
    #[must_use]
    pub const fn as_object(&self) -> Option<&Object> {
        match self {
            Self::Object(object) => Some(object),
            _ => None,
        }
    }

    /// Returns true for [`Value::Null`].
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

/// Decoded object: ordered fields plus the concrete type when fragments were
/// selected.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Object {
    type_name: Option<String>,
    fields: IndexMap<String, Value>,
}

impl Object {
    /// Creates an empty object.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the concrete type reported by `__typename`.
    #[must_use]
    pub fn with_type_name(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = Some(type_name.into());
        self
    }

    /// Concrete type reported by the server, when requested.
    #[must_use]
    pub fn type_name(&self) -> Option<&str> {
        self.type_name.as_deref()
    }

    /// Inserts or replaces a field, keeping first insertion order.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.fields.insert(key.into(), value);
    }

    /// Builder-style [`Object::insert`].
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: Value) -> Self {
        self.insert(key, value);
        self
    }

    /// Looks up a field.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Iterates over fields in selection order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true when the object has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// A response did not match the shape of the document that requested it.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("response does not match query at `{path}`: {message}")]
pub struct DecodeError {
    /// Dotted path of the offending field.
    pub path: String,
    /// What was expected.
    pub message: String,
}

impl DecodeError {
    pub(crate) fn new(path: &str, message: impl Into<String>) -> Self {
        Self {
            path: path.to_owned(),
            message: message.into(),
        }
    }
}
