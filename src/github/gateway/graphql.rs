//! Octocrab implementation of the query gateway.

use async_trait::async_trait;
use octocrab::Octocrab;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value as JsonValue, json};

use crate::github::error::IntakeError;
use crate::github::locator::{Endpoint, PersonalAccessToken};
use crate::github::rate_limit::RateLimitInfo;
use crate::graphql::{QueryDocument, Value, Variables};

use super::QueryGateway;
use super::client::build_octocrab_client;
use super::error_mapping::{
    ApiGraphQlError, is_rate_limit_error, map_graphql_errors, map_octocrab_error,
};

#[derive(Debug, Deserialize)]
struct GraphQlEnvelope {
    data: Option<JsonValue>,
    #[serde(default)]
    errors: Vec<ApiGraphQlError>,
}

/// Octocrab-backed GraphQL gateway.
pub struct OctocrabQueryGateway {
    client: Octocrab,
    endpoint: Endpoint,
}

impl OctocrabQueryGateway {
    /// Creates a gateway from an Octocrab client whose base URI is the
    /// endpoint's origin.
    #[must_use]
    pub const fn new(client: Octocrab, endpoint: Endpoint) -> Self {
        Self { client, endpoint }
    }

    /// Builds an authenticated gateway for `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns `IntakeError::InvalidUrl` when the endpoint origin cannot be
    /// parsed or `IntakeError::Api` when Octocrab fails to construct a client.
    pub fn for_token(
        token: &PersonalAccessToken,
        endpoint: &Endpoint,
    ) -> Result<Self, IntakeError> {
        let octocrab = build_octocrab_client(token, endpoint)?;
        Ok(Self::new(octocrab, endpoint.clone()))
    }

    /// Endpoint this gateway posts to.
    #[must_use]
    pub const fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Executes `document` and deserialises `data` straight into `T`.
    ///
    /// Useful when the caller owns a static type for the query shape and does
    /// not need the schema-agnostic [`Value`] tree.
    ///
    /// # Errors
    ///
    /// Propagates execution failures and returns
    /// [`IntakeError::MalformedResponse`] when `data` does not fit `T`.
    pub async fn execute_as<T: DeserializeOwned>(
        &self,
        document: &QueryDocument,
        variables: &Variables,
    ) -> Result<T, IntakeError> {
        let data = self.fetch_data(document, variables).await?;
        serde_json::from_value(data).map_err(|error| IntakeError::MalformedResponse {
            message: format!("{} data deserialisation failed: {error}", document.operation()),
        })
    }

    async fn fetch_data(
        &self,
        document: &QueryDocument,
        variables: &Variables,
    ) -> Result<JsonValue, IntakeError> {
        let operation = document.operation();
        let body = json!({
            "query": document.render(variables)?,
            "variables": variables.to_json(),
        });

        tracing::debug!(
            operation,
            endpoint = %self.endpoint.url(),
            "executing GraphQL query"
        );

        let envelope: GraphQlEnvelope =
            match self.client.post(self.endpoint.path(), Some(&body)).await {
                Ok(envelope) => envelope,
                Err(error) => {
                    return Err(self
                        .map_octocrab_error_with_rate_limit(operation, &error)
                        .await);
                }
            };

        if !envelope.errors.is_empty() {
            let error = map_graphql_errors(operation, &envelope.errors);
            tracing::warn!(operation, %error, "GraphQL query returned errors");
            return Err(error);
        }

        envelope.data.ok_or_else(|| IntakeError::Api {
            message: format!("{operation} failed: response contained no data"),
        })
    }

    async fn map_octocrab_error_with_rate_limit(
        &self,
        operation: &str,
        error: &octocrab::Error,
    ) -> IntakeError {
        match error {
            octocrab::Error::GitHub { source, .. } if is_rate_limit_error(source) => {
                let rate_limit = self.fetch_rate_limit_info().await;
                let base_message =
                    format!("{operation} failed: {message}", message = source.message);
                let message = match &rate_limit {
                    Some(info) => format!(
                        "{base_message} (resets at {reset})",
                        reset = info.reset_at()
                    ),
                    None => base_message,
                };

                IntakeError::RateLimitExceeded {
                    rate_limit,
                    message,
                }
            }
            _ => map_octocrab_error(operation, error),
        }
    }

    async fn fetch_rate_limit_info(&self) -> Option<RateLimitInfo> {
        let rate = self.client.ratelimit().get().await.ok()?.rate;
        let Ok(limit) = u32::try_from(rate.limit) else {
            return None;
        };
        let Ok(remaining) = u32::try_from(rate.remaining) else {
            return None;
        };
        Some(RateLimitInfo::new(limit, remaining, rate.reset))
    }
}

#[async_trait]
impl QueryGateway for OctocrabQueryGateway {
    async fn execute(
        &self,
        document: &QueryDocument,
        variables: &Variables,
    ) -> Result<Value, IntakeError> {
        let data = self.fetch_data(document, variables).await?;
        Ok(document.decode(&data)?)
    }
}
