//! Application configuration loaded from CLI, environment, and files.
//!
//! Values merge through `ortho_config`'s layers, lowest to highest:
//!
//! 1. **Defaults** – full pages, no page bound, public endpoint
//! 2. **Configuration file** – `.queryloom.toml` in the current directory,
//!    home directory, or XDG config directory
//! 3. **Environment variables** – `QUERYLOOM_*`, plus the legacy
//!    `GITHUB_TOKEN` fallback for the token
//! 4. **Command-line arguments**
//!
//! # Configuration File
//!
//! ```toml
//! token = "ghp_example"
//! username = "octocat"
//! enterprise_url = "https://ghe.example.com"
//! organizations = "github, rust-lang"
//! page_size = 50
//! max_pages_per_scope = 20
//! ```

use std::env;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

use crate::github::error::IntakeError;
use crate::github::lhs::MAX_PAGE_SIZE;
use crate::github::locator::{Endpoint, OrganizationName, PersonalAccessToken, Username};

/// Settings for one sidebar fetch.
///
/// # Example
///
/// ```no_run
/// use ortho_config::OrthoConfig;
/// use queryloom::QueryloomConfig;
///
/// let config = QueryloomConfig::load().expect("failed to load configuration");
/// let user = config.require_username().expect("username required");
/// let scopes = config.organization_scopes().expect("valid organisations");
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, OrthoConfig)]
#[serde(default)]
#[ortho_config(
    prefix = "QUERYLOOM",
    discovery(
        dotfile_name = ".queryloom.toml",
        config_file_name = "queryloom.toml",
        app_name = "queryloom"
    )
)]
pub struct QueryloomConfig {
    /// Personal access token for GitHub API authentication.
    ///
    /// Can be provided via:
    /// - CLI: `--token <TOKEN>` or `-t <TOKEN>`
    /// - Environment: `QUERYLOOM_TOKEN` or `GITHUB_TOKEN` (legacy)
    /// - Config file: `token = "..."`
    #[ortho_config(cli_short = 't')]
    pub token: Option<String>,

    /// Login whose review requests, assignments, and pull requests are
    /// fetched.
    #[ortho_config(cli_short = 'u')]
    pub username: Option<String>,

    /// Base URL of a GitHub Enterprise Server; the public API when unset.
    #[ortho_config(cli_short = 'e')]
    pub enterprise_url: Option<String>,

    /// Comma-separated organisation logins. Each one is fetched as its own
    /// `org:` scope; when empty, a single unscoped fetch runs.
    #[ortho_config(cli_short = 'o')]
    pub organizations: Option<String>,

    /// Items requested per search per page, `1..=100`.
    #[ortho_config()]
    pub page_size: u32,

    /// Requests allowed per organisation scope before giving up.
    ///
    /// Unset means keep paging until GitHub reports the last page.
    #[ortho_config()]
    pub max_pages_per_scope: Option<u32>,
}

impl Default for QueryloomConfig {
    fn default() -> Self {
        Self {
            token: None,
            username: None,
            enterprise_url: None,
            organizations: None,
            page_size: MAX_PAGE_SIZE,
            max_pages_per_scope: None,
        }
    }
}

impl QueryloomConfig {
    /// Resolves the token from configuration or the legacy `GITHUB_TOKEN`
    /// environment variable.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::MissingToken`] when no source provides a
    /// non-blank value.
    pub fn resolve_token(&self) -> Result<PersonalAccessToken, IntakeError> {
        let raw = self
            .token
            .clone()
            .or_else(|| env::var("GITHUB_TOKEN").ok())
            .ok_or(IntakeError::MissingToken)?;
        PersonalAccessToken::new(raw)
    }

    /// Returns the configured login.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::MissingUsername`] when unset or blank and
    /// [`IntakeError::InvalidName`] when unusable in a search qualifier.
    pub fn require_username(&self) -> Result<Username, IntakeError> {
        self.username
            .as_deref()
            .ok_or(IntakeError::MissingUsername)
            .and_then(Username::new)
    }

    /// Resolves the GraphQL endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::InvalidUrl`] for an unusable enterprise URL.
    pub fn endpoint(&self) -> Result<Endpoint, IntakeError> {
        Endpoint::resolve(self.enterprise_url.as_deref())
    }

    /// Parses the organisation list, in configured order.
    ///
    /// Blank entries are skipped, so `""` and `" , "` both mean unscoped.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::InvalidName`] for an unusable login.
    pub fn organization_scopes(&self) -> Result<Vec<OrganizationName>, IntakeError> {
        self.organizations
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(OrganizationName::new)
            .collect()
    }

    /// Checks the pagination settings.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::Configuration`] when `page_size` is outside
    /// `1..=100` or `max_pages_per_scope` is zero.
    pub fn validate(&self) -> Result<(), IntakeError> {
        if !(1..=MAX_PAGE_SIZE).contains(&self.page_size) {
            return Err(IntakeError::Configuration {
                message: format!(
                    "page_size must be between 1 and {MAX_PAGE_SIZE}, got {}",
                    self.page_size
                ),
            });
        }
        if self.max_pages_per_scope == Some(0) {
            return Err(IntakeError::Configuration {
                message: "max_pages_per_scope must be at least 1 when set".to_owned(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests;
