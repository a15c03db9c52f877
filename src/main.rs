//! Queryloom CLI entrypoint for the sidebar summary fetch.

use std::io::{self, Write};
use std::process::ExitCode;

use chrono::Utc;
use ortho_config::OrthoConfig;
use queryloom::github::{IssueSummary, PullRequestDetail};
use queryloom::{IntakeError, LhsData, LhsFetcher, OctocrabQueryGateway, QueryloomConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::debug!(?error, "fetch failed");
            if writeln!(io::stderr().lock(), "{}", describe(&error)).is_err() {
                return ExitCode::FAILURE;
            }
            ExitCode::FAILURE
        }
    }
}

/// Installs a stderr subscriber filtered by `RUST_LOG`, defaulting to warnings.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init()
        .ok();
}

async fn run() -> Result<(), IntakeError> {
    let config = load_config()?;
    config.validate()?;

    let token = config.resolve_token()?;
    let user = config.require_username()?;
    let scopes = config.organization_scopes()?;
    let endpoint = config.endpoint()?;

    let gateway = OctocrabQueryGateway::for_token(&token, &endpoint)?;
    let fetcher = LhsFetcher::new(&gateway, user)
        .with_page_size(config.page_size)?
        .with_max_pages(config.max_pages_per_scope)?;
    let data = fetcher.fetch_all(&scopes).await?;

    write_summary(&data)
}

/// Loads configuration from CLI, environment, and files.
///
/// # Errors
///
/// Returns [`IntakeError::Configuration`] when ortho-config fails to parse
/// arguments or load configuration files.
fn load_config() -> Result<QueryloomConfig, IntakeError> {
    QueryloomConfig::load().map_err(|error| IntakeError::Configuration {
        message: error.to_string(),
    })
}

fn describe(error: &IntakeError) -> String {
    match error {
        IntakeError::RateLimitExceeded {
            rate_limit: Some(info),
            ..
        } => format!(
            "could not retrieve data: {error} (retry in {}s)",
            info.seconds_until_reset(Utc::now())
        ),
        _ => format!("could not retrieve data: {error}"),
    }
}

fn write_summary(data: &LhsData) -> Result<(), IntakeError> {
    let mut out = String::new();
    push_pull_requests(&mut out, "Review requested", &data.review_requested);
    push_issues(&mut out, "Assigned", &data.assigned);
    push_pull_requests(&mut out, "Open pull requests", &data.open_authored);

    let mut stdout = io::stdout().lock();
    write!(stdout, "{out}").map_err(|error| IntakeError::Io {
        message: error.to_string(),
    })
}

fn push_pull_requests(out: &mut String, heading: &str, items: &[PullRequestDetail]) {
    out.push_str(&format!("{heading} ({})\n", items.len()));
    for detail in items {
        out.push_str(&format!(
            "  {} (+{} -{}, {} files)\n",
            issue_line(&detail.summary),
            detail.additions,
            detail.deletions,
            detail.changed_files
        ));
    }
}

fn push_issues(out: &mut String, heading: &str, items: &[IssueSummary]) {
    out.push_str(&format!("{heading} ({})\n", items.len()));
    for issue in items {
        out.push_str(&format!("  {}\n", issue_line(issue)));
    }
}

fn issue_line(issue: &IssueSummary) -> String {
    let author = issue.author.as_deref().unwrap_or("ghost");
    format!("#{} {} by {author} - {}", issue.number, issue.title, issue.url)
}
