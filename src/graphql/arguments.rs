//! Argument sets attached to a single query field.
//!
//! Only the pagination, filter, and search-type arguments are recognised.
//! Values are validated when set, and the set serialises to the
//! `field(key: value, ...)` form used in the rendered document.

use std::fmt;

use super::error::QueryError;
use super::identifier::Identifier;

/// Recognised argument keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArgumentKey {
    /// Take the first N items.
    First,
    /// Take the last N items.
    Last,
    /// Items before this cursor.
    Before,
    /// Items after this cursor.
    After,
    /// Search filter text.
    Query,
    /// Search target kind.
    Type,
}

impl ArgumentKey {
    /// Wire name of the key.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::First => "first",
            Self::Last => "last",
            Self::Before => "before",
            Self::After => "after",
            Self::Query => "query",
            Self::Type => "type",
        }
    }
}

/// Allowed values for the `type` argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchType {
    /// Issues and pull requests.
    Issue,
    /// Repositories.
    Repository,
    /// Users and organisations.
    User,
    /// Discussions.
    Discussion,
}

impl SearchType {
    /// Parses a search type, ignoring case and surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::InvalidArgument`] for anything outside the
    /// allow-list.
    pub fn parse(value: &str) -> Result<Self, QueryError> {
        let trimmed = value.trim();
        [Self::Issue, Self::Repository, Self::User, Self::Discussion]
            .into_iter()
            .find(|candidate| candidate.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| QueryError::InvalidArgument {
                key: ArgumentKey::Type.as_str(),
                message: format!("`{trimmed}` is not a supported search type"),
            })
    }

    /// Enum literal as sent on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Issue => "ISSUE",
            Self::Repository => "REPOSITORY",
            Self::User => "USER",
            Self::Discussion => "DISCUSSION",
        }
    }
}

/// Name of a document variable, without the `$` sigil.
///
/// Unlike [`Identifier`], the case is preserved as written.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VariableName(String);

impl VariableName {
    /// Validates a variable name.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::InvalidIdentifier`] when `value` is empty or not
    /// alphabetic.
    pub fn new(value: &str) -> Result<Self, QueryError> {
        Identifier::new(value)?;
        Ok(Self(value.to_owned()))
    }

    /// Borrow the name.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for VariableName {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

/// A validated argument value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgumentValue {
    /// Positive page size.
    Count(u32),
    /// Pagination cursor, quoted when rendered.
    Cursor(String),
    /// Filter text, quoted when rendered.
    Text(String),
    /// Search type enum literal.
    Search(SearchType),
    /// Reference to a document variable.
    Variable(VariableName),
}

impl ArgumentValue {
    fn render(&self) -> String {
        match self {
            Self::Count(count) => count.to_string(),
            Self::Cursor(text) | Self::Text(text) => quote(text),
            Self::Search(search) => search.as_str().to_owned(),
            Self::Variable(name) => format!("${name}"),
        }
    }
}

/// JSON string escaping is also valid GraphQL string escaping.
fn quote(text: &str) -> String {
    serde_json::Value::String(text.to_owned()).to_string()
}

/// Ordered, validated arguments for one field.
///
/// Keys keep their insertion position; setting a key again replaces the value
/// in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArgumentSet {
    entries: Vec<(ArgumentKey, ArgumentValue)>,
}

impl ArgumentSet {
    /// Creates an empty set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Returns true when no argument is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Looks up the value stored under `key`.
    #[must_use]
    pub fn get(&self, key: ArgumentKey) -> Option<&ArgumentValue> {
        self.entries
            .iter()
            .find(|(existing, _)| *existing == key)
            .map(|(_, value)| value)
    }

    /// Iterates over entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &(ArgumentKey, ArgumentValue)> {
        self.entries.iter()
    }

    /// Sets `first`.
    ///
    /// # Errors
    ///
    /// Fails when `count` is zero or `last` is already set.
    pub fn first(&mut self, count: u32) -> Result<&mut Self, QueryError> {
        let value = positive(ArgumentKey::First, count)?;
        self.set_page_size(ArgumentKey::First, value)
    }

    /// Sets `last`.
    ///
    /// # Errors
    ///
    /// Fails when `count` is zero or `first` is already set.
    pub fn last(&mut self, count: u32) -> Result<&mut Self, QueryError> {
        let value = positive(ArgumentKey::Last, count)?;
        self.set_page_size(ArgumentKey::Last, value)
    }

    /// Sets the `before` cursor.
    ///
    /// # Errors
    ///
    /// Fails when `cursor` is blank.
    pub fn before(&mut self, cursor: &str) -> Result<&mut Self, QueryError> {
        let value = non_blank(ArgumentKey::Before, cursor)?;
        Ok(self.insert(ArgumentKey::Before, ArgumentValue::Cursor(value)))
    }

    /// Sets the `after` cursor.
    ///
    /// # Errors
    ///
    /// Fails when `cursor` is blank.
    pub fn after(&mut self, cursor: &str) -> Result<&mut Self, QueryError> {
        let value = non_blank(ArgumentKey::After, cursor)?;
        Ok(self.insert(ArgumentKey::After, ArgumentValue::Cursor(value)))
    }

    /// Sets the `query` filter text.
    ///
    /// # Errors
    ///
    /// Fails when `text` is blank.
    pub fn query(&mut self, text: &str) -> Result<&mut Self, QueryError> {
        let value = non_blank(ArgumentKey::Query, text)?;
        Ok(self.insert(ArgumentKey::Query, ArgumentValue::Text(value)))
    }

    /// Sets the search `type` from its textual form.
    ///
    /// # Errors
    ///
    /// Fails when `kind` is not in the allow-list.
    pub fn search_type(&mut self, kind: &str) -> Result<&mut Self, QueryError> {
        let search = SearchType::parse(kind)?;
        Ok(self.insert(ArgumentKey::Type, ArgumentValue::Search(search)))
    }

    /// Binds `key` to the document variable `name`.
    ///
    /// # Errors
    ///
    /// Fails for the `type` key, for an invalid variable name, and for a
    /// `first`/`last` conflict.
    pub fn bind(&mut self, key: ArgumentKey, name: &str) -> Result<&mut Self, QueryError> {
        if key == ArgumentKey::Type {
            return Err(QueryError::InvalidArgument {
                key: key.as_str(),
                message: "search type must be a literal".to_owned(),
            });
        }
        let variable = ArgumentValue::Variable(VariableName::new(name)?);
        match key {
            ArgumentKey::First | ArgumentKey::Last => self.set_page_size(key, variable),
            _ => Ok(self.insert(key, variable)),
        }
    }

    /// Variables referenced by this set.
    pub fn variables(&self) -> impl Iterator<Item = &VariableName> {
        self.entries.iter().filter_map(|(_, value)| match value {
            ArgumentValue::Variable(name) => Some(name),
            _ => None,
        })
    }

    /// Serialises the set as a field tag: `pullRequest(first: 100, ...)`.
    ///
    /// Returns the bare field name when the set is empty.
    #[must_use]
    pub fn render(&self, field: &Identifier) -> String {
        let name = field.field_name();
        if self.entries.is_empty() {
            return name;
        }
        let pairs: Vec<String> = self
            .entries
            .iter()
            .map(|(key, value)| format!("{}: {}", key.as_str(), value.render()))
            .collect();
        format!("{name}({})", pairs.join(", "))
    }

    fn set_page_size(
        &mut self,
        key: ArgumentKey,
        value: ArgumentValue,
    ) -> Result<&mut Self, QueryError> {
        let opposite = if key == ArgumentKey::First {
            ArgumentKey::Last
        } else {
            ArgumentKey::First
        };
        if self.get(opposite).is_some() {
            return Err(QueryError::ConflictingPagination {
                requested: key.as_str(),
                existing: opposite.as_str(),
            });
        }
        Ok(self.insert(key, value))
    }

    fn insert(&mut self, key: ArgumentKey, value: ArgumentValue) -> &mut Self {
        if let Some(slot) = self
            .entries
            .iter_mut()
            .find(|(existing, _)| *existing == key)
        {
            slot.1 = value;
        } else {
            self.entries.push((key, value));
        }
        self
    }
}

fn positive(key: ArgumentKey, count: u32) -> Result<ArgumentValue, QueryError> {
    if count == 0 {
        return Err(QueryError::InvalidArgument {
            key: key.as_str(),
            message: "value must be greater than zero".to_owned(),
        });
    }
    Ok(ArgumentValue::Count(count))
}

fn non_blank(key: ArgumentKey, value: &str) -> Result<String, QueryError> {
    if value.trim().is_empty() {
        return Err(QueryError::InvalidArgument {
            key: key.as_str(),
            message: "value must not be blank".to_owned(),
        });
    }
    Ok(value.to_owned())
}
