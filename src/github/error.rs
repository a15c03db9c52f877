//! Error types exposed by the GitHub query layer.

use thiserror::Error;

use super::rate_limit::RateLimitInfo;
use crate::graphql::{DecodeError, QueryError, ResponseError};

/// Errors surfaced while configuring, executing, or paginating queries.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IntakeError {
    /// The authentication token was missing.
    #[error("personal access token is required")]
    MissingToken,

    /// No subject username was configured.
    #[error("GitHub username is required")]
    MissingUsername,

    /// A username or organisation name cannot be used as a search qualifier.
    #[error("invalid {kind} `{value}`: names must be non-empty without whitespace or quotes")]
    InvalidName {
        /// Which name was rejected (`username` or `organization`).
        kind: &'static str,
        /// The rejected input.
        value: String,
    },

    /// The enterprise base URL could not be parsed or joined.
    #[error("GraphQL endpoint URL is invalid: {0}")]
    InvalidUrl(String),

    /// The authentication token was rejected by GitHub.
    #[error("GitHub rejected the token: {message}")]
    Authentication {
        /// GitHub error message returned with the 401/403 response.
        message: String,
    },

    /// GitHub returned a non-authentication API error, including GraphQL
    /// `errors` payloads.
    #[error("GitHub API error: {message}")]
    Api {
        /// Description of the failure.
        message: String,
    },

    /// Networking failed while calling GitHub.
    #[error("network error talking to GitHub: {message}")]
    Network {
        /// Transport-level error detail.
        message: String,
    },

    /// Rate limit exceeded.
    #[error("GitHub API rate limit exceeded: {message}")]
    RateLimitExceeded {
        /// Rate limit info if available.
        rate_limit: Option<RateLimitInfo>,
        /// Error message from GitHub.
        message: String,
    },

    /// The response did not match the query that requested it.
    #[error("malformed response: {message}")]
    MalformedResponse {
        /// Description of the mismatch.
        message: String,
    },

    /// Invalid pagination settings.
    #[error("invalid pagination: {message}")]
    InvalidPagination {
        /// Description of the invalid parameter.
        message: String,
    },

    /// A stream still reported more pages after the configured page budget.
    #[error("{stream} in scope {scope} still had more results after {pages} pages")]
    PaginationLimitExceeded {
        /// Sub-search that did not finish.
        stream: &'static str,
        /// Organisation scope, or `all` when unscoped.
        scope: String,
        /// Pages fetched in the scope.
        pages: u32,
    },

    /// Configuration could not be loaded.
    #[error("configuration error: {message}")]
    Configuration {
        /// Details about the configuration failure.
        message: String,
    },

    /// Local I/O operation failed.
    #[error("I/O error: {message}")]
    Io {
        /// Error detail from the underlying I/O operation.
        message: String,
    },

    /// The query description was invalid.
    #[error(transparent)]
    Query(#[from] QueryError),

    /// A result could not be read.
    #[error(transparent)]
    Response(#[from] ResponseError),
}

impl From<DecodeError> for IntakeError {
    fn from(error: DecodeError) -> Self {
        Self::MalformedResponse {
            message: error.to_string(),
        }
    }
}
