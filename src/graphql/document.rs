//! Compiled query documents.
//!
//! A [`QueryDocument`] is a tagged tree mirroring the element model it was
//! compiled from. It renders to GraphQL text and guides decoding of the JSON
//! `data` payload into a typed [`Value`] tree. Documents are immutable; page
//! to page only the [`Variables`] change.

use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value as JsonValue;
use url::Url;

use super::arguments::VariableName;
use super::error::QueryError;
use super::registry::LeafType;
use super::value::{DecodeError, Object, Value};
use super::variables::Variables;

const TYPENAME_FIELD: &str = "__typename";

/// Shape of a compiled field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shape {
    /// Scalar leaf.
    Leaf(LeafType),
    /// Nested selection set.
    Object(SelectionSet),
    /// Repeated shape.
    List(Box<Shape>),
}

/// One compiled field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    response_key: String,
    tag: String,
    shape: Shape,
}

impl Selection {
    pub(crate) const fn new(response_key: String, tag: String, shape: Shape) -> Self {
        Self {
            response_key,
            tag,
            shape,
        }
    }

    /// Key under which the field appears in the response.
    #[must_use]
    pub fn response_key(&self) -> &str {
        &self.response_key
    }

    /// Rendered field head, e.g. `openItems: search(first: 100)`.
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Compiled shape.
    #[must_use]
    pub const fn shape(&self) -> &Shape {
        &self.shape
    }
}

/// A type-conditional fragment inside a selection set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    type_name: String,
    selections: SelectionSet,
}

impl Fragment {
    pub(crate) const fn new(type_name: String, selections: SelectionSet) -> Self {
        Self {
            type_name,
            selections,
        }
    }

    /// Concrete type the fragment applies to.
    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Rendered fragment marker.
    #[must_use]
    pub fn marker(&self) -> String {
        format!("... on {}", self.type_name)
    }

    /// Fragment selections.
    #[must_use]
    pub const fn selections(&self) -> &SelectionSet {
        &self.selections
    }
}

/// Fields and fragments selected on one object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    fields: Vec<Selection>,
    fragments: Vec<Fragment>,
}

impl SelectionSet {
    pub(crate) fn push_field(&mut self, selection: Selection) {
        self.fields.push(selection);
    }

    pub(crate) fn push_fragment(&mut self, fragment: Fragment) {
        self.fragments.push(fragment);
    }

    /// Returns true when nothing is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.fragments.is_empty()
    }

    /// Selected fields in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[Selection] {
        &self.fields
    }

    /// Fragments in declaration order.
    #[must_use]
    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    /// Finds a field by response key.
    #[must_use]
    pub fn field(&self, response_key: &str) -> Option<&Selection> {
        self.fields
            .iter()
            .find(|selection| selection.response_key == response_key)
    }

    fn render_into(&self, out: &mut String) {
        out.push_str("{ ");
        for selection in &self.fields {
            out.push_str(&selection.tag);
            out.push(' ');
            if let Some(nested) = object_set(&selection.shape) {
                nested.render_into(out);
                out.push(' ');
            }
        }
        if !self.fragments.is_empty() {
            out.push_str(TYPENAME_FIELD);
            out.push(' ');
        }
        for fragment in &self.fragments {
            out.push_str(&fragment.marker());
            out.push(' ');
            fragment.selections.render_into(out);
            out.push(' ');
        }
        out.push('}');
    }

    fn decode(&self, json: &JsonValue, path: &str) -> Result<Object, DecodeError> {
        let JsonValue::Object(map) = json else {
            return Err(DecodeError::new(path, "expected an object"));
        };

        let mut object = Object::new();
        for selection in &self.fields {
            let child_path = join_path(path, &selection.response_key);
            let value = match map.get(&selection.response_key) {
                None | Some(JsonValue::Null) => Value::Null,
                Some(raw) => decode_shape(&selection.shape, raw, &child_path)?,
            };
            object.insert(selection.response_key.clone(), value);
        }

        if self.fragments.is_empty() {
            return Ok(object);
        }

        let type_name = map
            .get(TYPENAME_FIELD)
            .and_then(JsonValue::as_str)
            .ok_or_else(|| DecodeError::new(path, "fragment selection without `__typename`"))?;
        for fragment in &self.fragments {
            let value = if fragment.type_name == type_name {
                Value::Object(fragment.selections.decode(json, path)?)
            } else {
                Value::Null
            };
            object.insert(fragment.type_name.clone(), value);
        }
        Ok(object.with_type_name(type_name))
    }
}

fn object_set(shape: &Shape) -> Option<&SelectionSet> {
    match shape {
        Shape::Leaf(_) => None,
        Shape::Object(set) => Some(set),
        Shape::List(inner) => object_set(inner),
    }
}

fn join_path(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_owned()
    } else {
        format!("{parent}.{key}")
    }
}

fn decode_shape(shape: &Shape, json: &JsonValue, path: &str) -> Result<Value, DecodeError> {
    match shape {
        Shape::Leaf(leaf) => decode_leaf(*leaf, json, path),
        Shape::Object(set) => set.decode(json, path).map(Value::Object),
        Shape::List(inner) => {
            let JsonValue::Array(items) = json else {
                return Err(DecodeError::new(path, "expected a list"));
            };
            items
                .iter()
                .enumerate()
                .map(|(index, item)| {
                    let item_path = format!("{path}[{index}]");
                    if item.is_null() {
                        Ok(Value::Null)
                    } else {
                        decode_shape(inner, item, &item_path)
                    }
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Value::List)
        }
    }
}

fn decode_leaf(leaf: LeafType, json: &JsonValue, path: &str) -> Result<Value, DecodeError> {
    match leaf {
        LeafType::String | LeafType::Html => {
            expect_str(json, path).map(|text| Value::String(text.to_owned()))
        }
        LeafType::Id => match json {
            JsonValue::Number(number) => Ok(Value::String(number.to_string())),
            _ => expect_str(json, path).map(|text| Value::String(text.to_owned())),
        },
        LeafType::Int => json
            .as_i64()
            .map(Value::Int)
            .ok_or_else(|| DecodeError::new(path, "expected an integer")),
        LeafType::Float => json
            .as_f64()
            .map(Value::Float)
            .ok_or_else(|| DecodeError::new(path, "expected a number")),
        LeafType::Boolean => json
            .as_bool()
            .map(Value::Boolean)
            .ok_or_else(|| DecodeError::new(path, "expected a boolean")),
        LeafType::Uri => {
            let text = expect_str(json, path)?;
            Url::parse(text)
                .map(Value::Uri)
                .map_err(|error| DecodeError::new(path, format!("invalid URI: {error}")))
        }
        LeafType::Date => {
            let text = expect_str(json, path)?;
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .map(Value::Date)
                .map_err(|error| DecodeError::new(path, format!("invalid date: {error}")))
        }
        LeafType::DateTime => {
            let text = expect_str(json, path)?;
            DateTime::parse_from_rfc3339(text)
                .map(|parsed| Value::DateTime(parsed.with_timezone(&Utc)))
                .map_err(|error| DecodeError::new(path, format!("invalid timestamp: {error}")))
        }
        LeafType::Enum(enum_type) => {
            let text = expect_str(json, path)?;
            if enum_type.accepts(text) {
                Ok(Value::Enum(text.to_owned()))
            } else {
                Err(DecodeError::new(
                    path,
                    format!("`{text}` is not a member of {}", enum_type.name()),
                ))
            }
        }
    }
}

fn expect_str<'json>(json: &'json JsonValue, path: &str) -> Result<&'json str, DecodeError> {
    json.as_str()
        .ok_or_else(|| DecodeError::new(path, "expected a string"))
}

/// A compiled query operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryDocument {
    operation: String,
    selections: SelectionSet,
    variables: BTreeSet<VariableName>,
}

impl QueryDocument {
    pub(crate) const fn new(
        operation: String,
        selections: SelectionSet,
        variables: BTreeSet<VariableName>,
    ) -> Self {
        Self {
            operation,
            selections,
            variables,
        }
    }

    /// Operation name.
    #[must_use]
    pub fn operation(&self) -> &str {
        &self.operation
    }

    /// Top-level selections.
    #[must_use]
    pub const fn selections(&self) -> &SelectionSet {
        &self.selections
    }

    /// Variables referenced anywhere in the document, in name order.
    pub fn variables(&self) -> impl Iterator<Item = &VariableName> {
        self.variables.iter()
    }

    /// Renders the operation text, declaring each referenced variable with
    /// the type implied by its binding.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::UnboundVariable`] when a referenced variable has
    /// no binding.
    pub fn render(&self, bindings: &Variables) -> Result<String, QueryError> {
        let declarations = self
            .variables
            .iter()
            .map(|name| {
                bindings
                    .get(name)
                    .map(|value| format!("${name}: {}", value.graphql_type()))
                    .ok_or_else(|| QueryError::UnboundVariable {
                        name: name.to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut out = format!("query {}", self.operation);
        if !declarations.is_empty() {
            out.push('(');
            out.push_str(&declarations.join(", "));
            out.push(')');
        }
        out.push(' ');
        self.selections.render_into(&mut out);
        Ok(out)
    }

    /// Populates the document's shape from a JSON `data` payload.
    ///
    /// Missing and null fields decode to [`Value::Null`].
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError`] when the payload contradicts the document.
    pub fn decode(&self, data: &JsonValue) -> Result<Value, DecodeError> {
        self.selections.decode(data, "").map(Value::Object)
    }
}
