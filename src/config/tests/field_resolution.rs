//! Tests for resolving typed values from configuration fields.

use rstest::rstest;

use crate::QueryloomConfig;
use crate::github::error::IntakeError;

#[rstest]
fn configured_token_wins_over_legacy_variable() {
    let _guard = env_lock::lock_env([("GITHUB_TOKEN", Some("legacy-token"))]);
    let config = QueryloomConfig {
        token: Some("configured-token".to_owned()),
        ..Default::default()
    };

    let token = config.resolve_token().expect("token should resolve");

    assert_eq!(token.value(), "configured-token");
}

#[rstest]
fn token_falls_back_to_github_token() {
    let _guard = env_lock::lock_env([("GITHUB_TOKEN", Some("legacy-token"))]);

    let token = QueryloomConfig::default()
        .resolve_token()
        .expect("legacy token should resolve");

    assert_eq!(token.value(), "legacy-token");
}

#[rstest]
fn missing_token_is_reported() {
    let _guard = env_lock::lock_env([("GITHUB_TOKEN", None::<&str>)]);

    assert_eq!(
        QueryloomConfig::default().resolve_token(),
        Err(IntakeError::MissingToken)
    );
}

#[rstest]
#[case::unset(None)]
#[case::blank(Some("  "))]
fn missing_username_is_reported(#[case] username: Option<&str>) {
    let config = QueryloomConfig {
        username: username.map(ToOwned::to_owned),
        ..Default::default()
    };

    assert_eq!(config.require_username(), Err(IntakeError::MissingUsername));
}

#[rstest]
#[case::unset(None, Vec::new())]
#[case::blank_entries(Some(" , ,"), Vec::new())]
#[case::ordered(Some("beta, alpha ,gamma"), vec!["beta", "alpha", "gamma"])]
fn organization_scopes_split_on_commas(
    #[case] organizations: Option<&str>,
    #[case] expected: Vec<&str>,
) {
    let config = QueryloomConfig {
        organizations: organizations.map(ToOwned::to_owned),
        ..Default::default()
    };

    let scopes = config
        .organization_scopes()
        .expect("organisations should parse");
    let names: Vec<&str> = scopes.iter().map(|scope| scope.as_str()).collect();

    assert_eq!(names, expected);
}

#[rstest]
fn organization_scopes_reject_quoted_names() {
    let config = QueryloomConfig {
        organizations: Some("alpha,\"beta\"".to_owned()),
        ..Default::default()
    };

    assert!(matches!(
        config.organization_scopes(),
        Err(IntakeError::InvalidName {
            kind: "organization",
            ..
        })
    ));
}

#[rstest]
fn endpoint_uses_enterprise_url_when_set() {
    let config = QueryloomConfig {
        enterprise_url: Some("https://ghe.example.com".to_owned()),
        ..Default::default()
    };

    let endpoint = config.endpoint().expect("endpoint should resolve");

    assert_eq!(endpoint.url().as_str(), "https://ghe.example.com/api/graphql");
}
