//! GitHub execution layer and the sidebar fetch engine.
//!
//! This module resolves the GraphQL endpoint, executes compiled documents
//! through Octocrab, and drives the paginated multi-stream fetch in [`lhs`].
//! Errors are mapped into [`IntakeError`] variants so that callers can surface
//! precise failures without exposing Octocrab internals.

pub mod error;
pub mod gateway;
pub mod lhs;
pub mod locator;
pub mod pagination;
pub mod rate_limit;

pub use error::IntakeError;
pub use gateway::{OctocrabQueryGateway, QueryGateway};
pub use lhs::{IssueSummary, Label, LhsData, LhsFetcher, PullRequestDetail, ScopeState, Stream};
pub use locator::{Endpoint, OrganizationName, PersonalAccessToken, Username};
pub use pagination::{PageInfo, PaginatedResult};
pub use rate_limit::RateLimitInfo;

#[cfg(test)]
pub use gateway::MockQueryGateway;

#[cfg(test)]
mod tests;
