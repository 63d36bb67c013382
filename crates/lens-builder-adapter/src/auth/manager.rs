/*
[INPUT]:  Message signer and session service transport
[OUTPUT]: Authenticated Session, or an Authentication error
[POS]:    Auth layer - orchestrates the challenge/sign/verify handshake
[UPDATE]: When auth endpoints, flow steps or retry policy change
*/

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::http::{LensError, Result};
use crate::retry::RetryPolicy;
use crate::types::{AuthenticationResult, Challenge, EvmAddress};

use super::{MessageSigner, Session};

/// Remote half of the handshake
#[async_trait]
pub trait SessionService: Send + Sync {
    /// Ask for a challenge bound to the builder `account`
    async fn challenge(&self, account: &EvmAddress) -> Result<Challenge>;

    /// Submit the signed challenge for verification
    async fn authenticate(
        &self,
        challenge: &Challenge,
        signature: &str,
    ) -> Result<AuthenticationResult>;
}

/// Handshake progress
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    Unauthenticated,
    Authenticating,
    Authenticated,
    AuthFailed,
}

/// Whether the handshake may be retried.
///
/// Rejections are never retried; `TransientOnly` only repeats the handshake
/// after network-level failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthRetry {
    #[default]
    Never,
    TransientOnly,
}

/// Drives the complete authentication flow
#[derive(Debug)]
pub struct SessionAuthenticator<S> {
    service: S,
    state: AuthState,
    retry: RetryPolicy,
    auth_retry: AuthRetry,
}

impl<S: SessionService> SessionAuthenticator<S> {
    pub fn new(service: S) -> Self {
        Self {
            service,
            state: AuthState::Unauthenticated,
            retry: RetryPolicy::default(),
            auth_retry: AuthRetry::Never,
        }
    }

    /// Opt in to retrying network failures during the handshake
    pub fn with_retry(mut self, auth_retry: AuthRetry, retry: RetryPolicy) -> Self {
        self.auth_retry = auth_retry;
        self.retry = retry;
        self
    }

    pub fn state(&self) -> AuthState {
        self.state
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    /// Complete authentication flow
    ///
    /// 1. Request challenge for the signer's address
    /// 2. Sign challenge text
    /// 3. Submit signature
    /// 4. Build session from the returned tokens
    pub async fn login(&mut self, signer: &dyn MessageSigner) -> Result<Session> {
        self.state = AuthState::Authenticating;
        info!(address = %signer.address(), "authenticating builder account");

        let service = &self.service;
        let result = match self.auth_retry {
            AuthRetry::Never => handshake(service, signer).await,
            AuthRetry::TransientOnly => {
                self.retry
                    .run_if(|| handshake(service, signer), LensError::is_retryable)
                    .await
            }
        };

        match &result {
            Ok(session) => {
                self.state = AuthState::Authenticated;
                info!(
                    address = %session.account(),
                    expires_at = ?session.expires_at(),
                    "session established"
                );
            }
            Err(err) => {
                self.state = AuthState::AuthFailed;
                warn!(error = %err, "authentication failed");
            }
        }
        result
    }
}

async fn handshake<S: SessionService + ?Sized>(
    service: &S,
    signer: &dyn MessageSigner,
) -> Result<Session> {
    let account = signer.address().clone();

    // Step 1: Challenge
    let challenge = service.challenge(&account).await.map_err(as_rejection)?;
    debug!(challenge_id = %challenge.id, "challenge received");

    // Step 2: Sign
    let signature = signer.sign_message(challenge.text.as_bytes()).await?;
    let signature = format!("0x{}", hex::encode(signature));

    // Step 3: Verify
    let verdict = service
        .authenticate(&challenge, &signature)
        .await
        .map_err(as_rejection)?;

    match verdict {
        AuthenticationResult::AuthenticationTokens(tokens) => Ok(Session::new(account, tokens)),
        AuthenticationResult::WrongSignerError { reason }
        | AuthenticationResult::ExpiredChallengeError { reason }
        | AuthenticationResult::ForbiddenError { reason } => Err(LensError::authentication(reason)),
    }
}

// GraphQL-level errors during the handshake are permission problems, not faults.
fn as_rejection(err: LensError) -> LensError {
    match err {
        LensError::GraphQl { messages } => LensError::Authentication {
            reason: messages.join("; "),
        },
        other => other,
    }
}
