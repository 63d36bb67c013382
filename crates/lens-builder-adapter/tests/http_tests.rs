/*
[INPUT]:  Mock Lens GraphQL responses
[OUTPUT]: Test results for operation submission over HTTP
[POS]:    Integration tests - GraphQL endpoints
[UPDATE]: When HTTP endpoints change
*/

mod common;

use std::time::Duration;

use common::{APP_ADDRESS, TEST_ADDRESS, TX_HASH, client_for, graphql_data, mock_jwt_token, mount_operation, setup_mock_server};
use lens_builder_adapter::{
    AuthenticationTokens, ConfirmationConfig, CreateAppRequest, ErrorKind, EvmAddress, LensClient,
    LensError, OperationOutcome, OperationRequest, OperationService, OperationSubmitter, RetryPolicy, Session,
    SetAppMetadataRequest, TransactionStatus,
};
use serde_json::json;
use tokio_test::assert_ok;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, ResponseTemplate};

fn session() -> Session {
    Session::new(
        EvmAddress::parse(TEST_ADDRESS).expect("valid address"),
        AuthenticationTokens {
            access_token: mock_jwt_token(),
            refresh_token: "refresh-token".into(),
            id_token: mock_jwt_token(),
        },
    )
}

fn fast_retry() -> RetryPolicy {
    RetryPolicy::new(3, Duration::from_millis(10))
}

#[test]
fn test_client_creation() {
    let _client = assert_ok!(LensClient::new(lens_builder_adapter::Environment::Mainnet));
}

#[tokio::test]
async fn test_create_app_finalized() {
    let server = setup_mock_server().await;
    mount_operation(
        &server,
        "mutation CreateApp",
        graphql_data("createApp", json!({"__typename": "CreateAppResponse", "hash": TX_HASH})),
    )
    .await;

    let submitter = OperationSubmitter::new(client_for(&server), fast_retry());
    let request = assert_ok!(CreateAppRequest::new(&[TEST_ADDRESS], "lens://metadata", Some(TEST_ADDRESS)));

    let outcome = assert_ok!(submitter.submit(&session(), &OperationRequest::from(request)).await);
    assert_eq!(
        outcome,
        OperationOutcome::Finalized {
            transaction_hash: TX_HASH.into()
        }
    );
}

#[tokio::test]
async fn test_set_metadata_self_funded() {
    let server = setup_mock_server().await;
    mount_operation(
        &server,
        "mutation SetAppMetadata",
        graphql_data(
            "setAppMetadata",
            json!({
                "__typename": "SelfFundedTransactionRequest",
                "reason": "Sponsorship unavailable",
                "selfFundedReason": "NOT_SPONSORED",
                "raw": {"to": APP_ADDRESS, "data": "0x1234", "chainId": 37111}
            }),
        ),
    )
    .await;

    let submitter = OperationSubmitter::new(client_for(&server), fast_retry());
    let request = assert_ok!(SetAppMetadataRequest::new(APP_ADDRESS, "lens://metadata"));

    let outcome = assert_ok!(submitter.submit(&session(), &OperationRequest::from(request)).await);
    match outcome {
        OperationOutcome::SelfFundingRequired { raw_transaction, reason } => {
            assert_eq!(raw_transaction["chainId"], json!(37111));
            assert!(reason.contains("NOT_SPONSORED"));
        }
        other => panic!("unexpected outcome {other:?}"),
    }
}

#[tokio::test]
async fn test_server_error_retried_then_succeeds() {
    let server = setup_mock_server().await;
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream busy"))
        .up_to_n_times(2)
        .with_priority(1)
        .mount(&server)
        .await;
    mount_operation(
        &server,
        "mutation SetAppMetadata",
        graphql_data("setAppMetadata", json!({"__typename": "SetAppMetadataResponse", "hash": TX_HASH})),
    )
    .await;

    let submitter = OperationSubmitter::new(client_for(&server), fast_retry());
    let request = assert_ok!(SetAppMetadataRequest::new(APP_ADDRESS, "lens://metadata"));

    let outcome = assert_ok!(submitter.submit(&session(), &OperationRequest::from(request)).await);
    assert_eq!(outcome.transaction_hash(), Some(TX_HASH));
    assert_eq!(server.received_requests().await.unwrap_or_default().len(), 3);
}

#[tokio::test]
async fn test_server_error_exhausts_budget() {
    let server = setup_mock_server().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&server)
        .await;

    let submitter = OperationSubmitter::new(client_for(&server), fast_retry());
    let request = assert_ok!(SetAppMetadataRequest::new(APP_ADDRESS, "lens://metadata"));

    let err = submitter.submit(&session(), &OperationRequest::from(request)).await.unwrap_err();
    assert!(matches!(err, LensError::Api { code: 502, .. }));
    assert_eq!(err.kind(), ErrorKind::Network);
    assert_eq!(server.received_requests().await.unwrap_or_default().len(), 3);
}

#[tokio::test]
async fn test_graphql_error_not_retried() {
    let server = setup_mock_server().await;
    Mock::given(method("POST"))
        .and(body_string_contains("mutation CreateApp"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": null,
            "errors": [{"message": "Invalid admins"}]
        })))
        .mount(&server)
        .await;

    let submitter = OperationSubmitter::new(client_for(&server), fast_retry());
    let request = assert_ok!(CreateAppRequest::new(&[TEST_ADDRESS], "lens://metadata", None));

    let err = submitter.submit(&session(), &OperationRequest::from(request)).await.unwrap_err();
    assert!(matches!(err, LensError::GraphQl { ref messages } if messages == &["Invalid admins"]));
    assert_eq!(server.received_requests().await.unwrap_or_default().len(), 1);
}

#[tokio::test]
async fn test_malformed_origin_is_config_error_without_retry() {
    let server = setup_mock_server().await;
    let config = lens_builder_adapter::ClientConfig {
        origin: "bad\norigin".into(),
        ..lens_builder_adapter::ClientConfig::default()
    };
    let client = assert_ok!(LensClient::with_config_and_api_url(
        lens_builder_adapter::Environment::Testnet,
        config,
        &format!("{}/graphql", server.uri()),
    ));

    let submitter = OperationSubmitter::new(client, fast_retry());
    let request = assert_ok!(SetAppMetadataRequest::new(APP_ADDRESS, "lens://metadata"));

    let err = submitter.submit(&session(), &OperationRequest::from(request)).await.unwrap_err();
    assert!(matches!(err, LensError::Http(ref e) if e.is_builder()));
    assert_eq!(err.kind(), ErrorKind::Config);
    assert!(server.received_requests().await.unwrap_or_default().is_empty());
}

#[tokio::test]
async fn test_wait_for_transaction_then_fetch_app() {
    let server = setup_mock_server().await;
    Mock::given(method("POST"))
        .and(body_string_contains("query TransactionStatus"))
        .respond_with(graphql_data(
            "transactionStatus",
            json!({"__typename": "PendingTransactionStatus", "blockTimestamp": null}),
        ))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&server)
        .await;
    mount_operation(
        &server,
        "query TransactionStatus",
        graphql_data("transactionStatus", json!({"__typename": "FinishedTransactionStatus"})),
    )
    .await;
    mount_operation(
        &server,
        "query App",
        graphql_data(
            "app",
            json!({
                "address": APP_ADDRESS,
                "owner": TEST_ADDRESS,
                "verificationEnabled": true,
                "metadata": {"name": "Slice", "platforms": ["WEB"]}
            }),
        ),
    )
    .await;

    let client = client_for(&server);
    let submitter = OperationSubmitter::new(client.clone(), fast_retry());
    let config = ConfirmationConfig {
        poll_interval_ms: 10,
        timeout_secs: 5,
    };

    let status = assert_ok!(submitter.wait_for_transaction(TX_HASH, config).await);
    assert_eq!(status, TransactionStatus::Finished);

    let app = assert_ok!(client.fetch_app(TX_HASH).await).expect("app indexed");
    assert_eq!(app.address, APP_ADDRESS);
    assert!(app.verification_enabled);
    assert_eq!(app.metadata.map(|m| m.name), Some("Slice".to_string()));
}

#[tokio::test]
async fn test_transaction_failed_status() {
    let server = setup_mock_server().await;
    mount_operation(
        &server,
        "query TransactionStatus",
        graphql_data(
            "transactionStatus",
            json!({"__typename": "FailedTransactionStatus", "reason": "reverted"}),
        ),
    )
    .await;

    let status = assert_ok!(client_for(&server).transaction_status(TX_HASH).await);
    assert_eq!(
        status,
        TransactionStatus::Failed {
            reason: "reverted".into()
        }
    );
}
