//! Variable bindings sent alongside a document.

use std::collections::BTreeMap;

use serde_json::{Map, Value as JsonValue};

use super::arguments::VariableName;

/// A bound variable value and, implicitly, its schema type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VariableValue {
    /// Required string (`String!`).
    String(String),
    /// Nullable string (`String`), used for cursors.
    OptionalString(Option<String>),
    /// Required integer (`Int!`).
    Int(i64),
    /// Required boolean (`Boolean!`).
    Boolean(bool),
}

impl VariableValue {
    /// Schema type used in the operation's variable declarations.
    #[must_use]
    pub const fn graphql_type(&self) -> &'static str {
        match self {
            Self::String(_) => "String!",
            Self::OptionalString(_) => "String",
            Self::Int(_) => "Int!",
            Self::Boolean(_) => "Boolean!",
        }
    }

    fn to_json(&self) -> JsonValue {
        match self {
            Self::String(text) => JsonValue::from(text.as_str()),
            Self::OptionalString(text) => text
                .as_deref()
                .map_or(JsonValue::Null, JsonValue::from),
            Self::Int(number) => JsonValue::from(*number),
            Self::Boolean(flag) => JsonValue::from(*flag),
        }
    }
}

/// Variable bindings keyed by name, kept in name order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Variables {
    bindings: BTreeMap<VariableName, VariableValue>,
}

impl Variables {
    /// Creates an empty binding map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds or rebinds `name`.
    pub fn set(&mut self, name: VariableName, value: VariableValue) {
        self.bindings.insert(name, value);
    }

    /// Looks up a binding.
    #[must_use]
    pub fn get(&self, name: &VariableName) -> Option<&VariableValue> {
        self.bindings.get(name)
    }

    /// Looks up a binding by its textual name.
    #[must_use]
    pub fn get_str(&self, name: &str) -> Option<&VariableValue> {
        self.bindings
            .iter()
            .find(|(key, _)| key.as_str() == name)
            .map(|(_, value)| value)
    }

    /// Serialises the bindings as the JSON `variables` object.
    #[must_use]
    pub fn to_json(&self) -> JsonValue {
        let map: Map<String, JsonValue> = self
            .bindings
            .iter()
            .map(|(name, value)| (name.as_str().to_owned(), value.to_json()))
            .collect();
        JsonValue::Object(map)
    }
}
