//! Endpoint resolution and identity wrappers for query execution.

use std::fmt;

use url::Url;

use super::error::IntakeError;

const PUBLIC_ENDPOINT: &str = "https://api.github.com/graphql";
const ENTERPRISE_PATH: &str = "api/graphql";

/// GitHub login used to scope searches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Username(String);

impl Username {
    /// Validates a login.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::MissingUsername`] when blank and
    /// [`IntakeError::InvalidName`] when it contains whitespace or quotes.
    pub fn new(value: impl AsRef<str>) -> Result<Self, IntakeError> {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            return Err(IntakeError::MissingUsername);
        }
        qualifier_safe("username", trimmed).map(Self)
    }

    /// Borrow the login.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

/// Organisation login used as an `org:` search scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrganizationName(String);

impl OrganizationName {
    /// Validates an organisation login.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::InvalidName`] when blank or when it contains
    /// whitespace or quotes.
    pub fn new(value: impl AsRef<str>) -> Result<Self, IntakeError> {
        qualifier_safe("organization", value.as_ref().trim()).map(Self)
    }

    /// Borrow the organisation login.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for OrganizationName {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

fn qualifier_safe(kind: &'static str, value: &str) -> Result<String, IntakeError> {
    if value.is_empty() || value.chars().any(|ch| ch.is_whitespace() || ch == '"') {
        return Err(IntakeError::InvalidName {
            kind,
            value: value.to_owned(),
        });
    }
    Ok(value.to_owned())
}

/// Personal access token wrapper enforcing presence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonalAccessToken(String);

impl PersonalAccessToken {
    /// Validates that the token is non-empty and trims whitespace.
    ///
    /// # Errors
    ///
    /// Returns `IntakeError::MissingToken` when the supplied string is blank.
    pub fn new(token: impl AsRef<str>) -> Result<Self, IntakeError> {
        let trimmed = token.as_ref().trim();
        if trimmed.is_empty() {
            return Err(IntakeError::MissingToken);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the token value.
    #[must_use]
    pub const fn value(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for PersonalAccessToken {
    fn as_ref(&self) -> &str {
        self.value()
    }
}

/// Resolved GraphQL endpoint.
///
/// The public API lives at `https://api.github.com/graphql`; an enterprise
/// server exposes it at `<base>/api/graphql`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    url: Url,
}

impl Endpoint {
    /// Resolves the endpoint for an optional enterprise base URL.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::InvalidUrl`] when the base URL cannot be parsed,
    /// has no host, or cannot have the GraphQL path joined onto it.
    pub fn resolve(enterprise_base: Option<&str>) -> Result<Self, IntakeError> {
        match enterprise_base.map(str::trim).filter(|base| !base.is_empty()) {
            Some(base) => Self::enterprise(base),
            None => Self::public(),
        }
    }

    /// The public GitHub endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::InvalidUrl`] if the built-in URL fails to parse.
    pub fn public() -> Result<Self, IntakeError> {
        Url::parse(PUBLIC_ENDPOINT)
            .map(|url| Self { url })
            .map_err(|error| IntakeError::InvalidUrl(error.to_string()))
    }

    /// An enterprise endpoint below `base`.
    ///
    /// # Errors
    ///
    /// See [`Endpoint::resolve`].
    pub fn enterprise(base: &str) -> Result<Self, IntakeError> {
        let mut parsed =
            Url::parse(base).map_err(|error| IntakeError::InvalidUrl(error.to_string()))?;
        if parsed.cannot_be_a_base() || parsed.host_str().is_none() {
            return Err(IntakeError::InvalidUrl(format!(
                "{base}: URL must include a host"
            )));
        }
        if !parsed.path().ends_with('/') {
            let directory = format!("{}/", parsed.path());
            parsed.set_path(&directory);
        }
        parsed.set_query(None);
        parsed.set_fragment(None);
        parsed
            .join(ENTERPRISE_PATH)
            .map(|url| Self { url })
            .map_err(|error| IntakeError::InvalidUrl(format!("{base}: {error}")))
    }

    /// Full endpoint URL.
    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.url
    }

    /// Scheme, host, and port, used as the client's base URI.
    #[must_use]
    pub fn origin(&self) -> String {
        self.url.origin().ascii_serialization()
    }

    /// Path of the endpoint relative to [`Endpoint::origin`].
    #[must_use]
    pub fn path(&self) -> &str {
        self.url.path()
    }
}
