//! Octocrab client construction for the GraphQL gateway.

use http::Uri;
use octocrab::Octocrab;

use crate::github::error::IntakeError;
use crate::github::locator::{Endpoint, PersonalAccessToken};

use super::error_mapping::map_octocrab_error;

/// Builds an Octocrab client authenticated with `token` whose base URI is the
/// endpoint's origin.
///
/// # Errors
///
/// Returns `IntakeError::InvalidUrl` when the origin cannot be parsed or
/// `IntakeError::Api` when Octocrab fails to construct a client.
pub(super) fn build_octocrab_client(
    token: &PersonalAccessToken,
    endpoint: &Endpoint,
) -> Result<Octocrab, IntakeError> {
    let base_uri: Uri = endpoint
        .origin()
        .parse::<Uri>()
        .map_err(|error| IntakeError::InvalidUrl(error.to_string()))?;

    Octocrab::builder()
        .personal_token(token.as_ref())
        .base_uri(base_uri)
        .map_err(|error| IntakeError::Api {
            message: format!("build client failed: {error}"),
        })?
        .build()
        .map_err(|error| map_octocrab_error("build client", &error))
}
