//! Queryloom library crate: dynamic GraphQL query construction and a
//! paginated multi-stream fetch against the GitHub API.
//!
//! [`graphql`] turns an element tree into a compiled query document and reads
//! decoded results through a schema-agnostic [`graphql::Response`]. [`github`]
//! executes documents through Octocrab and drives the sidebar fetch that
//! merges review requests, assignments, and authored pull requests across
//! organisation scopes.

pub mod config;
pub mod github;
pub mod graphql;

pub use config::QueryloomConfig;
pub use github::{
    Endpoint, IntakeError, LhsData, LhsFetcher, OctocrabQueryGateway, OrganizationName,
    PersonalAccessToken, QueryGateway, Username,
};
pub use graphql::{CompositeObject, QueryBuilder, QueryDocument, Response, compile};
