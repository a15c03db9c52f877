//! Schema-agnostic dictionary view over a populated result.
//!
//! [`Response`] lets callers navigate decoded results by field name without a
//! static type for every query shape. Conversion flattens the typed leaves
//! that callers only ever display: timestamps become `YYYY-MM-DD, HH:MM:SS`,
//! URIs and enums become plain strings.

use indexmap::IndexMap;
use thiserror::Error;

use super::value::{Object, Value};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d, %H:%M:%S";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Errors raised while reading a [`Response`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ResponseError {
    /// Conversion was given no value.
    #[error("cannot convert an absent value")]
    NilInput,

    /// The requested key is not present.
    #[error("key `{key}` not found")]
    KeyNotFound {
        /// Requested key.
        key: String,
    },

    /// The value under `key` does not have the requested shape.
    #[error("value at `{key}` is not {expected}")]
    UnexpectedShape {
        /// Key whose value was inspected.
        key: String,
        /// Shape the caller asked for.
        expected: &'static str,
    },
}

/// Runtime shape of a child entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildKind {
    /// A nested dictionary.
    SingleObject,
    /// A sequence of dictionaries, possibly with null entries.
    ObjectList,
    /// Anything else, including null and scalar lists.
    Other,
}

/// An entry in a [`Response`].
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseValue {
    /// Null or absent.
    Null,
    /// Boolean.
    Boolean(bool),
    /// Integer.
    Int(i64),
    /// Float.
    Float(f64),
    /// Text, including rendered timestamps, URIs, and enum members.
    Text(String),
    /// Nested dictionary.
    Object(Response),
    /// Sequence of converted entries.
    List(Vec<ResponseValue>),
}

impl ResponseValue {
    fn from_value(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Boolean(flag) => Self::Boolean(*flag),
            Value::Int(number) => Self::Int(*number),
            Value::Float(number) => Self::Float(*number),
            Value::String(text) | Value::Enum(text) => Self::Text(text.clone()),
            Value::Uri(uri) => Self::Text(uri.as_str().to_owned()),
            Value::Date(date) => Self::Text(date.format(DATE_FORMAT).to_string()),
            Value::DateTime(timestamp) => {
                Self::Text(timestamp.format(TIMESTAMP_FORMAT).to_string())
            }
            Value::Object(object) => Self::Object(Response::from_object(object)),
            Value::List(items) => Self::List(items.iter().map(Self::from_value).collect()),
        }
    }

    fn kind(&self) -> ChildKind {
        match self {
            Self::Object(_) => ChildKind::SingleObject,
            Self::List(items)
                if items
                    .iter()
                    .all(|item| matches!(item, Self::Object(_) | Self::Null)) =>
            {
                ChildKind::ObjectList
            }
            _ => ChildKind::Other,
        }
    }
}

/// String-keyed dictionary over a decoded object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Response {
    type_name: Option<String>,
    entries: IndexMap<String, ResponseValue>,
}

impl Response {
    /// Converts a populated value.
    ///
    /// # Errors
    ///
    /// Returns [`ResponseError::NilInput`] for `None` and
    /// [`ResponseError::UnexpectedShape`] when the value is not an object.
    pub fn from_value(value: Option<&Value>) -> Result<Self, ResponseError> {
        match value.ok_or(ResponseError::NilInput)? {
            Value::Object(object) => Ok(Self::from_object(object)),
            _ => Err(ResponseError::UnexpectedShape {
                key: String::new(),
                expected: "an object",
            }),
        }
    }

    /// Converts a decoded object.
    #[must_use]
    pub fn from_object(object: &Object) -> Self {
        Self {
            type_name: object.type_name().map(ToOwned::to_owned),
            entries: object
                .iter()
                .map(|(key, value)| (key.to_owned(), ResponseValue::from_value(value)))
                .collect(),
        }
    }

    /// Concrete type reported by the server when fragments were selected.
    #[must_use]
    pub fn type_name(&self) -> Option<&str> {
        self.type_name.as_deref()
    }

    /// Keys in selection order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Returns the entry under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`ResponseError::KeyNotFound`] when absent.
    pub fn get(&self, key: &str) -> Result<&ResponseValue, ResponseError> {
        self.entries
            .get(key)
            .ok_or_else(|| ResponseError::KeyNotFound {
                key: key.to_owned(),
            })
    }

    /// Classifies the entry under `key` without assuming its shape.
    ///
    /// # Errors
    ///
    /// Returns [`ResponseError::KeyNotFound`] when absent.
    pub fn child_kind(&self, key: &str) -> Result<ChildKind, ResponseError> {
        self.get(key).map(ResponseValue::kind)
    }

    /// Reads a text entry.
    ///
    /// # Errors
    ///
    /// Fails when the key is absent or the entry is not text.
    pub fn str(&self, key: &str) -> Result<&str, ResponseError> {
        match self.get(key)? {
            ResponseValue::Text(text) => Ok(text),
            _ => Err(unexpected(key, "text")),
        }
    }

    /// Reads a nullable text entry.
    ///
    /// # Errors
    ///
    /// Fails when the key is absent or the entry is neither text nor null.
    pub fn opt_str(&self, key: &str) -> Result<Option<&str>, ResponseError> {
        match self.get(key)? {
            ResponseValue::Text(text) => Ok(Some(text)),
            ResponseValue::Null => Ok(None),
            _ => Err(unexpected(key, "text")),
        }
    }

    /// Reads an integer entry.
    ///
    /// # Errors
    ///
    /// Fails when the key is absent or the entry is not an integer.
    pub fn int(&self, key: &str) -> Result<i64, ResponseError> {
        match self.get(key)? {
            ResponseValue::Int(number) => Ok(*number),
            _ => Err(unexpected(key, "an integer")),
        }
    }

    /// Reads a boolean entry.
    ///
    /// # Errors
    ///
    /// Fails when the key is absent or the entry is not a boolean.
    pub fn bool(&self, key: &str) -> Result<bool, ResponseError> {
        match self.get(key)? {
            ResponseValue::Boolean(flag) => Ok(*flag),
            _ => Err(unexpected(key, "a boolean")),
        }
    }

    /// Reads a nested dictionary.
    ///
    /// # Errors
    ///
    /// Fails when the key is absent or the entry is not an object.
    pub fn object(&self, key: &str) -> Result<&Self, ResponseError> {
        self.opt_object(key)?
            .ok_or_else(|| unexpected(key, "an object"))
    }

    /// Reads a nullable nested dictionary.
    ///
    /// # Errors
    ///
    /// Fails when the key is absent or the entry is neither object nor null.
    pub fn opt_object(&self, key: &str) -> Result<Option<&Self>, ResponseError> {
        match self.get(key)? {
            ResponseValue::Object(object) => Ok(Some(object)),
            ResponseValue::Null => Ok(None),
            _ => Err(unexpected(key, "an object")),
        }
    }

    /// Reads a list of dictionaries, skipping null items.
    ///
    /// # Errors
    ///
    /// Fails when the key is absent, the entry is not a list, or an item is
    /// neither object nor null.
    pub fn objects(&self, key: &str) -> Result<Vec<&Self>, ResponseError> {
        let ResponseValue::List(items) = self.get(key)? else {
            return Err(unexpected(key, "a list"));
        };
        items
            .iter()
            .filter_map(|item| match item {
                ResponseValue::Object(object) => Some(Ok(object)),
                ResponseValue::Null => None,
                _ => Some(Err(unexpected(key, "a list of objects"))),
            })
            .collect()
    }
}

fn unexpected(key: &str, expected: &'static str) -> ResponseError {
    ResponseError::UnexpectedShape {
        key: key.to_owned(),
        expected,
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone, Utc};
    use rstest::{fixture, rstest};
    use url::Url;

    use super::{ChildKind, Response, ResponseError, ResponseValue};
    use crate::graphql::value::{Object, Value};

    #[fixture]
    fn populated() -> Value {
        let created = Utc
            .with_ymd_and_hms(2024, 3, 9, 7, 5, 1)
            .single()
            .expect("timestamp should be valid");
        let label = |name: &str| {
            Value::Object(
                Object::new()
                    .with("name", Value::String(name.to_owned()))
                    .with("color", Value::String("ededed".to_owned())),
            )
        };
        Value::Object(
            Object::new()
                .with("number", Value::Int(7))
                .with("createdAt", Value::DateTime(created))
                .with("dueOn", Value::Date(NaiveDate::from_ymd_opt(2024, 4, 1).expect("date")))
                .with(
                    "url",
                    Value::Uri(Url::parse("https://github.com/o/r/pull/7").expect("url")),
                )
                .with("mergeable", Value::Enum("MERGEABLE".to_owned()))
                .with("milestone", Value::Null)
                .with(
                    "author",
                    Value::Object(Object::new().with("login", Value::String("octocat".to_owned()))),
                )
                .with(
                    "labels",
                    Value::Object(
                        Object::new().with("nodes", Value::List(vec![label("bug"), label("ui")])),
                    ),
                )
                .with("tags", Value::List(vec![Value::String("a".to_owned())])),
        )
    }

    #[rstest]
    fn nil_input_is_rejected() {
        assert_eq!(Response::from_value(None), Err(ResponseError::NilInput));
    }

    #[rstest]
    fn scalar_input_is_rejected() {
        let result = Response::from_value(Some(&Value::Int(1)));
        assert!(
            matches!(result, Err(ResponseError::UnexpectedShape { .. })),
            "expected UnexpectedShape, got {result:?}"
        );
    }

    #[rstest]
    fn normalises_leaves_to_strings(populated: Value) {
        let response = Response::from_value(Some(&populated)).expect("conversion should succeed");

        assert_eq!(response.str("createdAt"), Ok("2024-03-09, 07:05:01"));
        assert_eq!(response.str("dueOn"), Ok("2024-04-01"));
        assert_eq!(response.str("url"), Ok("https://github.com/o/r/pull/7"));
        assert_eq!(response.str("mergeable"), Ok("MERGEABLE"));
        assert_eq!(response.int("number"), Ok(7));
        assert_eq!(response.opt_str("milestone"), Ok(None));
    }

    #[rstest]
    fn nested_lists_become_dictionaries(populated: Value) {
        let response = Response::from_value(Some(&populated)).expect("conversion should succeed");
        let labels = response
            .object("labels")
            .and_then(|labels| labels.objects("nodes"))
            .expect("labels should be a list of objects");

        assert_eq!(labels.len(), 2);
        let keys: Vec<&str> = labels
            .first()
            .map(|label| label.keys().collect())
            .unwrap_or_default();
        assert_eq!(keys, vec!["name", "color"]);
        assert_eq!(labels.get(1).map(|label| label.str("name")), Some(Ok("ui")));
    }

    #[rstest]
    fn reconversion_is_idempotent(populated: Value) {
        let first = Response::from_value(Some(&populated)).expect("conversion should succeed");
        let second = Response::from_value(Some(&populated)).expect("conversion should succeed");
        assert_eq!(first, second);
    }

    #[rstest]
    #[case("author", ChildKind::SingleObject)]
    #[case("labels", ChildKind::SingleObject)]
    #[case("number", ChildKind::Other)]
    #[case("milestone", ChildKind::Other)]
    #[case("tags", ChildKind::Other)]
    fn classifies_children(populated: Value, #[case] key: &str, #[case] expected: ChildKind) {
        let response = Response::from_value(Some(&populated)).expect("conversion should succeed");
        assert_eq!(response.child_kind(key), Ok(expected));
    }

    #[rstest]
    fn classifies_object_lists(populated: Value) {
        let response = Response::from_value(Some(&populated)).expect("conversion should succeed");
        let labels = response.object("labels").expect("labels should be an object");
        assert_eq!(labels.child_kind("nodes"), Ok(ChildKind::ObjectList));
    }

    #[rstest]
    fn null_entries_keep_a_list_of_objects() {
        let label = Value::Object(Object::new().with("name", Value::String("x".to_owned())));
        let value = Value::Object(Object::new().with(
            "labels",
            Value::Object(Object::new().with("nodes", Value::List(vec![Value::Null, label]))),
        ));
        let response = Response::from_value(Some(&value)).expect("conversion should succeed");
        let labels = response.object("labels").expect("labels should be an object");

        assert_eq!(labels.child_kind("nodes"), Ok(ChildKind::ObjectList));
        let nodes = labels.objects("nodes").expect("nodes should be objects");
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes.first().map(|node| node.str("name")), Some(Ok("x")));
    }

    #[rstest]
    fn missing_key_is_reported(populated: Value) {
        let response = Response::from_value(Some(&populated)).expect("conversion should succeed");
        assert_eq!(
            response.get("absent"),
            Err(ResponseError::KeyNotFound {
                key: "absent".to_owned()
            })
        );
        assert!(response.child_kind("absent").is_err());
    }

    #[rstest]
    fn mismatched_shape_is_an_error_not_a_panic(populated: Value) {
        let response = Response::from_value(Some(&populated)).expect("conversion should succeed");
        assert!(matches!(
            response.int("createdAt"),
            Err(ResponseError::UnexpectedShape { .. })
        ));
        assert!(matches!(
            response.objects("number"),
            Err(ResponseError::UnexpectedShape { .. })
        ));
        assert!(matches!(
            response.objects("tags"),
            Err(ResponseError::UnexpectedShape { .. })
        ));
        assert_eq!(
            response.get("tags"),
            Ok(&ResponseValue::List(vec![ResponseValue::Text("a".to_owned())]))
        );
    }

    #[rstest]
    fn keeps_type_name() {
        let value = Value::Object(
            Object::new()
                .with_type_name("Issue")
                .with("number", Value::Int(1)),
        );
        let response = Response::from_value(Some(&value)).expect("conversion should succeed");
        assert_eq!(response.type_name(), Some("Issue"));
    }
}
