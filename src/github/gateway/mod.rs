//! Gateways for executing compiled queries through Octocrab.
//!
//! The trait-based design lets the fetch engine run against a mock, while the
//! Octocrab implementation performs the real HTTP request.

mod client;
mod error_mapping;
mod graphql;

pub use graphql::OctocrabQueryGateway;

use async_trait::async_trait;

use crate::github::error::IntakeError;
use crate::graphql::{QueryDocument, Value, Variables};

/// Gateway that can execute a compiled query document.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QueryGateway: Send + Sync {
    /// Execute `document` with `variables`, returning the populated result.
    async fn execute(
        &self,
        document: &QueryDocument,
        variables: &Variables,
    ) -> Result<Value, IntakeError>;
}

#[cfg(test)]
mod tests;
