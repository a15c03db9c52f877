//! Unit tests for endpoint resolution and identity wrappers.
