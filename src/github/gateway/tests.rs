//! Tests for the Octocrab query gateway.

use rstest::{fixture, rstest};
use serde::Deserialize;
use serde_json::json;
use tokio::runtime::Runtime;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::{OctocrabQueryGateway, QueryGateway};
use crate::github::error::IntakeError;
use crate::github::locator::{Endpoint, PersonalAccessToken};
use crate::graphql::{
    ArgumentKey, CompositeObject, QueryDocument, Response, VariableName, VariableValue, Variables,
    compile,
};

struct GatewayFixture {
    runtime: Runtime,
    server: MockServer,
    gateway: OctocrabQueryGateway,
}

impl GatewayFixture {
    fn block_on<F: std::future::Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }

    fn respond_with(&self, response: ResponseTemplate) {
        self.block_on(
            Mock::given(method("POST"))
                .and(path("/api/graphql"))
                .respond_with(response)
                .mount(&self.server),
        );
    }
}

#[fixture]
fn token() -> PersonalAccessToken {
    PersonalAccessToken::new("valid-token").expect("token should be valid")
}

#[fixture]
fn gateway_fixture(token: PersonalAccessToken) -> GatewayFixture {
    let runtime = Runtime::new().expect("runtime should start");
    let server = runtime.block_on(MockServer::start());
    let endpoint = Endpoint::enterprise(&server.uri()).expect("endpoint should resolve");
    let gateway = {
        let _guard = runtime.enter();
        OctocrabQueryGateway::for_token(&token, &endpoint).expect("should create gateway")
    };
    GatewayFixture {
        runtime,
        server,
        gateway,
    }
}

/// `query Lookup($login: String!) { user(query: $login) { login } }`
#[fixture]
fn document() -> QueryDocument {
    let mut user = CompositeObject::new("User")
        .and_then(|user| user.scalar("Login", "String"))
        .expect("user should build");
    user.args_mut()
        .bind(ArgumentKey::Query, "login")
        .expect("binding should be valid");
    let root = CompositeObject::new("Lookup")
        .expect("root should build")
        .with_child(user);
    compile(&root).expect("document should compile")
}

#[fixture]
fn variables() -> Variables {
    let mut variables = Variables::new();
    variables.set(
        VariableName::new("login").expect("name should be valid"),
        VariableValue::String("octocat".to_owned()),
    );
    variables
}

#[rstest]
fn execute_posts_rendered_query_to_enterprise_endpoint(
    gateway_fixture: GatewayFixture,
    document: QueryDocument,
    variables: Variables,
) {
    let expected_query = document.render(&variables).expect("document should render");
    gateway_fixture.block_on(
        Mock::given(method("POST"))
            .and(path("/api/graphql"))
            .and(header("authorization", "Bearer valid-token"))
            .and(body_partial_json(json!({
                "query": expected_query,
                "variables": { "login": "octocat" }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": { "user": { "login": "octocat" } }
            })))
            .expect(1)
            .mount(&gateway_fixture.server),
    );

    let value = gateway_fixture
        .block_on(gateway_fixture.gateway.execute(&document, &variables))
        .expect("query should succeed");
    let response = Response::from_value(Some(&value)).expect("data should be an object");
    let user = response.object("user").expect("user should be present");

    assert_eq!(user.str("login").expect("login should be text"), "octocat");
}

#[rstest]
fn execute_maps_graphql_errors_to_api_error(
    gateway_fixture: GatewayFixture,
    document: QueryDocument,
    variables: Variables,
) {
    gateway_fixture.respond_with(ResponseTemplate::new(200).set_body_json(json!({
        "data": null,
        "errors": [
            { "message": "Field 'user' is missing required arguments: login" },
            { "message": "second failure" }
        ]
    })));

    let error = gateway_fixture
        .block_on(gateway_fixture.gateway.execute(&document, &variables))
        .expect_err("query should fail");

    match error {
        IntakeError::Api { message } => {
            assert!(
                message.contains("arguments: login; second failure"),
                "unexpected message: {message}"
            );
            assert!(message.starts_with("Lookup failed"), "unexpected message: {message}");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[rstest]
fn execute_maps_rate_limited_graphql_errors(
    gateway_fixture: GatewayFixture,
    document: QueryDocument,
    variables: Variables,
) {
    gateway_fixture.respond_with(ResponseTemplate::new(200).set_body_json(json!({
        "errors": [
            { "type": "RATE_LIMITED", "message": "API rate limit exceeded for user ID 1." }
        ]
    })));

    let error = gateway_fixture
        .block_on(gateway_fixture.gateway.execute(&document, &variables))
        .expect_err("query should fail");

    assert!(
        matches!(error, IntakeError::RateLimitExceeded { rate_limit: None, .. }),
        "expected RateLimitExceeded, got {error:?}"
    );
}

#[rstest]
fn execute_maps_unauthorised_status_to_authentication_error(
    gateway_fixture: GatewayFixture,
    document: QueryDocument,
    variables: Variables,
) {
    gateway_fixture.respond_with(ResponseTemplate::new(401).set_body_json(json!({
        "message": "Bad credentials",
        "documentation_url": "https://docs.github.com/graphql"
    })));

    let error = gateway_fixture
        .block_on(gateway_fixture.gateway.execute(&document, &variables))
        .expect_err("query should fail");

    match error {
        IntakeError::Authentication { message } => assert!(
            message.contains("Bad credentials"),
            "unexpected message: {message}"
        ),
        other => panic!("expected Authentication error, got {other:?}"),
    }
}

#[rstest]
fn execute_attaches_rate_limit_info_when_throttled(
    gateway_fixture: GatewayFixture,
    document: QueryDocument,
    variables: Variables,
) {
    const EXPECTED_RESET_AT: u64 = 1_700_000_000;

    gateway_fixture.respond_with(ResponseTemplate::new(403).set_body_json(json!({
        "message": "API rate limit exceeded for user",
        "documentation_url": "https://docs.github.com/rest/rate-limit"
    })));
    gateway_fixture.block_on(
        Mock::given(method("GET"))
            .and(path("/rate_limit"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "resources": {
                    "core": { "limit": 5000, "used": 0, "remaining": 5000, "reset": EXPECTED_RESET_AT },
                    "search": { "limit": 30, "used": 0, "remaining": 30, "reset": EXPECTED_RESET_AT }
                },
                "rate": { "limit": 5000, "used": 5000, "remaining": 0, "reset": EXPECTED_RESET_AT }
            })))
            .mount(&gateway_fixture.server),
    );

    let error = gateway_fixture
        .block_on(gateway_fixture.gateway.execute(&document, &variables))
        .expect_err("query should fail");

    match error {
        IntakeError::RateLimitExceeded {
            rate_limit,
            message,
        } => {
            let info = rate_limit.expect("expected rate_limit info to be populated");
            assert_eq!(info.reset_at(), EXPECTED_RESET_AT);
            assert!(info.is_exhausted(), "expected exhausted budget");
            assert!(
                message.contains(&EXPECTED_RESET_AT.to_string()),
                "expected message to include reset time, got `{message}`"
            );
        }
        other => panic!("expected RateLimitExceeded, got {other:?}"),
    }
}

#[rstest]
fn execute_reports_missing_data_as_api_error(
    gateway_fixture: GatewayFixture,
    document: QueryDocument,
    variables: Variables,
) {
    gateway_fixture.respond_with(ResponseTemplate::new(200).set_body_json(json!({})));

    let error = gateway_fixture
        .block_on(gateway_fixture.gateway.execute(&document, &variables))
        .expect_err("query should fail");

    assert!(
        matches!(error, IntakeError::Api { ref message } if message.contains("no data")),
        "unexpected error: {error:?}"
    );
}

#[rstest]
fn execute_rejects_data_that_does_not_fit_the_document(
    gateway_fixture: GatewayFixture,
    document: QueryDocument,
    variables: Variables,
) {
    gateway_fixture.respond_with(ResponseTemplate::new(200).set_body_json(json!({
        "data": { "user": { "login": 42 } }
    })));

    let error = gateway_fixture
        .block_on(gateway_fixture.gateway.execute(&document, &variables))
        .expect_err("query should fail");

    match error {
        IntakeError::MalformedResponse { message } => assert!(
            message.contains("user.login"),
            "expected decode path in message, got `{message}`"
        ),
        other => panic!("expected MalformedResponse, got {other:?}"),
    }
}

#[rstest]
fn execute_rejects_unbound_variables_before_sending(
    gateway_fixture: GatewayFixture,
    document: QueryDocument,
) {
    let error = gateway_fixture
        .block_on(gateway_fixture.gateway.execute(&document, &Variables::new()))
        .expect_err("rendering should fail");

    assert!(
        matches!(error, IntakeError::Query(_)),
        "expected Query error, got {error:?}"
    );
}

#[derive(Debug, Deserialize)]
struct LookupData {
    user: LookupUser,
}

#[derive(Debug, Deserialize)]
struct LookupUser {
    login: String,
}

#[rstest]
fn execute_as_deserialises_data_into_static_type(
    gateway_fixture: GatewayFixture,
    document: QueryDocument,
    variables: Variables,
) {
    gateway_fixture.respond_with(ResponseTemplate::new(200).set_body_json(json!({
        "data": { "user": { "login": "hubot" } }
    })));

    let data: LookupData = gateway_fixture
        .block_on(gateway_fixture.gateway.execute_as(&document, &variables))
        .expect("query should succeed");

    assert_eq!(data.user.login, "hubot");
}
