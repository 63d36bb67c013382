/*
[INPUT]:  Scripted session and submission services
[OUTPUT]: End-to-end results for credential -> session -> submit -> classify
[POS]:    Integration tests - orchestration pipeline
[UPDATE]: When pipeline composition or exit codes change
*/

mod common;

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use common::{APP_ADDRESS, TEST_ADDRESS, TEST_PRIVATE_KEY};
use lens_builder_adapter::{
    AuthState, AuthenticationResult, AuthenticationTokens, Challenge, ConfigError, Credential,
    EvmAddress, ExitStatus, LensError, MockMessageSigner, OperationOutcome, OperationRequest, OperationService, Orchestrator,
    OrchestratorConfig, RawResult, Result, RetryPolicy, Session, SessionService,
    SetAppMetadataRequest, TransactionStatus,
};
use serde_json::json;
use tokio::time::Instant;

const FINAL_HASH: &str = "0xabc123";

#[derive(Default)]
struct MockSessionService {
    reject: bool,
    /// Reject every authentication after this many
    reject_after: Option<usize>,
    challenges: AtomicUsize,
    authentications: AtomicUsize,
}

#[async_trait]
impl SessionService for MockSessionService {
    async fn challenge(&self, account: &EvmAddress) -> Result<Challenge> {
        self.challenges.fetch_add(1, Ordering::SeqCst);
        Ok(Challenge {
            id: "challenge-1".into(),
            text: format!("Sign in as {account}"),
        })
    }

    async fn authenticate(&self, _challenge: &Challenge, _signature: &str) -> Result<AuthenticationResult> {
        let attempt = self.authentications.fetch_add(1, Ordering::SeqCst) + 1;
        if self.reject || self.reject_after.is_some_and(|limit| attempt > limit) {
            return Ok(AuthenticationResult::ForbiddenError {
                reason: "Builder not allowed".into(),
            });
        }
        Ok(AuthenticationResult::AuthenticationTokens(AuthenticationTokens {
            access_token: "access".into(),
            refresh_token: "refresh".into(),
            id_token: "id".into(),
        }))
    }
}

/// Fails with a network error `failures` times, then finalizes
#[derive(Default)]
struct MockOperationService {
    failures: usize,
    submits: AtomicUsize,
    tokens_seen: Mutex<Vec<String>>,
}

impl MockOperationService {
    fn failing(failures: usize) -> Self {
        Self {
            failures,
            ..Self::default()
        }
    }
}

#[async_trait]
impl OperationService for MockOperationService {
    async fn submit(&self, session: &Session, _request: &OperationRequest) -> Result<RawResult> {
        let attempt = self.submits.fetch_add(1, Ordering::SeqCst) + 1;
        self.tokens_seen
            .lock()
            .unwrap()
            .push(session.access_token().to_string());
        if attempt <= self.failures {
            return Err(LensError::Network(format!("connection reset #{attempt}")));
        }
        Ok(RawResult(json!({"__typename": "Finalized", "hash": FINAL_HASH})))
    }

    async fn transaction_status(&self, _hash: &str) -> Result<TransactionStatus> {
        Ok(TransactionStatus::Finished)
    }
}

fn request() -> OperationRequest {
    SetAppMetadataRequest::new(APP_ADDRESS, "lens://metadata")
        .expect("valid request")
        .into()
}

fn config() -> OrchestratorConfig {
    OrchestratorConfig {
        retry: RetryPolicy::new(3, Duration::from_millis(1000)),
        ..OrchestratorConfig::default()
    }
}

#[tokio::test(start_paused = true)]
async fn test_valid_credential_finalizes() {
    let mut orchestrator = Orchestrator::new(
        MockSessionService::default(),
        MockOperationService::default(),
        config(),
    );

    let result = orchestrator.execute(TEST_PRIVATE_KEY, &request()).await;

    assert_eq!(ExitStatus::of(&result).code(), 0);
    assert_eq!(
        result.unwrap(),
        OperationOutcome::Finalized {
            transaction_hash: FINAL_HASH.into()
        }
    );
    let session = orchestrator.session().expect("session held");
    assert_eq!(session.account().as_str(), TEST_ADDRESS);
    assert_eq!(
        *orchestrator.submitter().service().tokens_seen.lock().unwrap(),
        vec!["access".to_string()]
    );
}

#[tokio::test(start_paused = true)]
async fn test_malformed_credential_makes_no_calls() {
    let mut orchestrator = Orchestrator::new(
        MockSessionService::default(),
        MockOperationService::default(),
        config(),
    );

    let result = orchestrator.execute("not-hex", &request()).await;

    assert_eq!(ExitStatus::of(&result), ExitStatus::Config);
    assert!(matches!(
        result,
        Err(LensError::Config(ConfigError::InvalidCredential { got: 7, .. }))
    ));
    let sessions = orchestrator.authenticator().service();
    assert_eq!(sessions.challenges.load(Ordering::SeqCst), 0);
    assert_eq!(orchestrator.submitter().service().submits.load(Ordering::SeqCst), 0);
    assert!(orchestrator.session().is_none());
}

#[tokio::test(start_paused = true)]
async fn test_rejected_login_is_not_retried() {
    let sessions = MockSessionService {
        reject: true,
        ..MockSessionService::default()
    };
    let mut orchestrator = Orchestrator::new(sessions, MockOperationService::default(), config());

    let start = Instant::now();
    let result = orchestrator.execute(TEST_PRIVATE_KEY, &request()).await;

    assert_eq!(ExitStatus::of(&result), ExitStatus::Auth);
    assert_ne!(ExitStatus::of(&result).code(), 0);
    assert!(result.unwrap_err().is_auth_error());

    let sessions = orchestrator.authenticator().service();
    assert_eq!(sessions.challenges.load(Ordering::SeqCst), 1);
    assert_eq!(sessions.authentications.load(Ordering::SeqCst), 1);
    assert_eq!(orchestrator.submitter().service().submits.load(Ordering::SeqCst), 0);
    assert_eq!(start.elapsed(), Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn test_transient_submit_failures_are_retried() {
    let mut orchestrator = Orchestrator::new(
        MockSessionService::default(),
        MockOperationService::failing(2),
        config(),
    );

    let start = Instant::now();
    let result = orchestrator.execute(TEST_PRIVATE_KEY, &request()).await;

    assert_eq!(result.unwrap().transaction_hash(), Some(FINAL_HASH));
    assert_eq!(orchestrator.submitter().service().submits.load(Ordering::SeqCst), 3);
    // two 1s pauses
    let elapsed = start.elapsed();
    assert!(elapsed >= Duration::from_millis(2000), "elapsed {elapsed:?}");
    assert!(elapsed < Duration::from_millis(3000), "elapsed {elapsed:?}");
}

#[tokio::test(start_paused = true)]
async fn test_transient_failures_exhaust_budget() {
    let mut orchestrator = Orchestrator::new(
        MockSessionService::default(),
        MockOperationService::failing(usize::MAX),
        config(),
    );

    let result = orchestrator.execute(TEST_PRIVATE_KEY, &request()).await;

    assert_eq!(ExitStatus::of(&result), ExitStatus::Network);
    assert!(matches!(result, Err(LensError::Network(ref m)) if m == "connection reset #3"));
}

#[tokio::test]
async fn test_submit_requires_login() {
    let orchestrator = Orchestrator::new(
        MockSessionService::default(),
        MockOperationService::default(),
        config(),
    );

    let err = orchestrator.submit(&request()).await.unwrap_err();
    assert!(err.is_auth_error());
    assert_eq!(orchestrator.submitter().service().submits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_confirm_after_finalized() {
    let mut orchestrator = Orchestrator::new(
        MockSessionService::default(),
        MockOperationService::default(),
        config(),
    );

    let outcome = orchestrator.execute(TEST_PRIVATE_KEY, &request()).await.unwrap();
    let hash = outcome.transaction_hash().expect("finalized");
    assert_eq!(orchestrator.confirm(hash).await.unwrap(), TransactionStatus::Finished);
}

#[tokio::test]
async fn test_failed_relogin_drops_previous_session() {
    let sessions = MockSessionService {
        reject_after: Some(1),
        ..MockSessionService::default()
    };
    let mut orchestrator = Orchestrator::new(sessions, MockOperationService::default(), config());

    let credential = Credential::from_raw(TEST_PRIVATE_KEY).unwrap();
    orchestrator.login(&credential).await.unwrap();
    assert!(orchestrator.session().is_some());

    let other = MockMessageSigner::new(EvmAddress::parse(APP_ADDRESS).unwrap(), &[0xab, 0xcd]);
    let err = orchestrator.login(&other).await.unwrap_err();
    assert!(err.is_auth_error());
    assert_eq!(orchestrator.authenticator().state(), AuthState::AuthFailed);
    assert!(orchestrator.session().is_none());

    let err = orchestrator.submit(&request()).await.unwrap_err();
    assert!(err.is_auth_error());
    assert_eq!(orchestrator.submitter().service().submits.load(Ordering::SeqCst), 0);
}
