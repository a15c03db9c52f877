//! Unit tests for configuration loading and precedence.
//!
//! - `helpers`: Shared test utilities
//! - `precedence`: Layer precedence tests
//! - `field_resolution`: Token, username, endpoint, and scope resolution
//! - `validation`: Pagination setting checks

mod field_resolution;
mod helpers;
mod validation;
