/*
[INPUT]:  Test configuration and mock server requirements
[OUTPUT]: Shared test utilities, fixtures, and mock helpers
[POS]:    Test infrastructure - shared across all test modules
[UPDATE]: When adding new test patterns or fixtures
*/

//! Common test utilities for lens-builder-adapter tests

#![allow(dead_code)]

use lens_builder_adapter::{ClientConfig, Environment, LensClient};
use serde_json::{Value, json};
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Well-known development key and the account it controls
pub const TEST_PRIVATE_KEY: &str =
    "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
pub const TEST_ADDRESS: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";

pub const APP_ADDRESS: &str = "0xb3855583511c5f02168a8784B8125D72BD97caB7";
pub const TX_HASH: &str = "0xabc0000000000000000000000000000000000000000000000000000000000001";

/// Setup a mock HTTP server for testing
pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

/// Client pointed at the mock server's `/graphql`
pub fn client_for(server: &MockServer) -> LensClient {
    LensClient::with_config_and_api_url(
        Environment::Testnet,
        ClientConfig::default(),
        &format!("{}/graphql", server.uri()),
    )
    .expect("mock client")
}

/// `{"data": {field: value}}`
pub fn graphql_data(field: &str, value: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "data": { field: value } }))
}

/// Mount a GraphQL responder for requests whose document mentions `operation`
pub async fn mount_operation(server: &MockServer, operation: &str, response: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(body_string_contains(operation))
        .respond_with(response)
        .mount(server)
        .await;
}

/// Challenge plus successful authenticate
pub async fn mount_login(server: &MockServer) {
    mount_operation(
        server,
        "mutation Challenge",
        graphql_data(
            "challenge",
            json!({"__typename": "AuthenticationChallenge", "id": "challenge-1", "text": "Sign in to Lens"}),
        ),
    )
    .await;
    mount_operation(
        server,
        "mutation Authenticate",
        graphql_data(
            "authenticate",
            json!({
                "__typename": "AuthenticationTokens",
                "accessToken": mock_jwt_token(),
                "refreshToken": "refresh-token",
                "idToken": mock_jwt_token(),
            }),
        ),
    )
    .await;
}

/// Mock JWT token for testing
pub fn mock_jwt_token() -> String {
    "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9.test.signature".to_string()
}
