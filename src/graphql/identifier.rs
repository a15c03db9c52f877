//! Validated field and type names.

use std::fmt;

use super::error::QueryError;

const RESERVED_ID: &str = "ID";

/// An alphabetic identifier, title-cased on construction.
///
/// `ID` is reserved: any casing of it normalises to upper case.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier(String);

impl Identifier {
    /// Validates and normalises `value`.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::InvalidIdentifier`] when `value` is empty or
    /// contains anything other than ASCII letters.
    pub fn new(value: &str) -> Result<Self, QueryError> {
        if value.is_empty() || !value.chars().all(|ch| ch.is_ascii_alphabetic()) {
            return Err(QueryError::InvalidIdentifier {
                value: value.to_owned(),
            });
        }

        if value.eq_ignore_ascii_case(RESERVED_ID) {
            return Ok(Self(RESERVED_ID.to_owned()));
        }

        let mut chars = value.chars();
        let normalised = chars.next().map_or_else(String::new, |first| {
            first.to_ascii_uppercase().to_string() + chars.as_str()
        });
        Ok(Self(normalised))
    }

    /// Borrow the normalised name.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Returns the wire field name: first character lower-cased.
    ///
    /// `ID` becomes `id`.
    #[must_use]
    pub fn field_name(&self) -> String {
        if self.0 == RESERVED_ID {
            return "id".to_owned();
        }
        let mut chars = self.0.chars();
        chars.next().map_or_else(String::new, |first| {
            first.to_ascii_lowercase().to_string() + chars.as_str()
        })
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

impl AsRef<str> for Identifier {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}
