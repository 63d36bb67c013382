/*
[INPUT]:  Raw credential, OperationRequest, injected session and submission services
[OUTPUT]: Classified OperationOutcome and the process ExitStatus it implies
[POS]:    Composition layer - credential -> session -> submit -> classify
[UPDATE]: When the pipeline order, config knobs or exit code table change
*/

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::{AuthRetry, Credential, MessageSigner, Session, SessionAuthenticator, SessionService};
use crate::http::{ErrorKind, LensError, Result};
use crate::retry::RetryPolicy;
use crate::submitter::{ConfirmationConfig, OperationService, OperationSubmitter};
use crate::types::{OperationOutcome, OperationRequest, TransactionStatus};

/// Tunables for one orchestrator instance
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    #[serde(default)]
    pub retry: RetryPolicy,
    #[serde(default)]
    pub auth_retry: AuthRetry,
    #[serde(default)]
    pub confirmation: ConfirmationConfig,
}

/// Runs one builder operation end to end.
///
/// Both remote collaborators are injected, so tests drive the whole
/// pipeline with scripted services and no network.
#[derive(Debug)]
pub struct Orchestrator<S, O> {
    authenticator: SessionAuthenticator<S>,
    submitter: OperationSubmitter<O>,
    config: OrchestratorConfig,
    session: Option<Session>,
}

impl<S: SessionService, O: OperationService> Orchestrator<S, O> {
    pub fn new(session_service: S, operation_service: O, config: OrchestratorConfig) -> Self {
        Self {
            authenticator: SessionAuthenticator::new(session_service)
                .with_retry(config.auth_retry, config.retry),
            submitter: OperationSubmitter::new(operation_service, config.retry),
            config,
            session: None,
        }
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    pub fn authenticator(&self) -> &SessionAuthenticator<S> {
        &self.authenticator
    }

    pub fn submitter(&self) -> &OperationSubmitter<O> {
        &self.submitter
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Validate `raw_credential`, log in and submit `request`.
    ///
    /// A malformed credential fails before any remote call.
    pub async fn execute(
        &mut self,
        raw_credential: &str,
        request: &OperationRequest,
    ) -> Result<OperationOutcome> {
        let credential = Credential::from_raw(raw_credential)?;
        self.login(&credential).await?;
        self.submit(request).await
    }

    /// Authenticate and hold the resulting session.
    ///
    /// Any previously held session is dropped first, so a failed login
    /// leaves the orchestrator unauthenticated.
    pub async fn login(&mut self, signer: &dyn MessageSigner) -> Result<&Session> {
        self.session = None;
        let session = self.authenticator.login(signer).await?;
        Ok(&*self.session.insert(session))
    }

    /// Submit with the held session
    pub async fn submit(&self, request: &OperationRequest) -> Result<OperationOutcome> {
        let session = self
            .session
            .as_ref()
            .ok_or_else(|| LensError::authentication("not authenticated"))?;
        let outcome = self.submitter.submit(session, request).await?;
        info!(
            operation = request.name(),
            action = ?outcome.required_action(),
            "operation resolved"
        );
        Ok(outcome)
    }

    /// Wait for a finalized transaction to be indexed
    pub async fn confirm(&self, hash: &str) -> Result<TransactionStatus> {
        self.submitter
            .wait_for_transaction(hash, self.config.confirmation)
            .await
    }
}

/// Process exit status for a finished run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    Success,
    Failure,
    Config,
    Validation,
    Auth,
    Network,
    WillFail,
    Unrecognized,
}

impl ExitStatus {
    pub fn of(result: &Result<OperationOutcome>) -> Self {
        match result {
            Ok(outcome) => Self::from_outcome(outcome),
            Err(err) => Self::from_error(err),
        }
    }

    pub fn from_outcome(outcome: &OperationOutcome) -> Self {
        match outcome {
            OperationOutcome::Finalized { .. } | OperationOutcome::SelfFundingRequired { .. } => {
                Self::Success
            }
            OperationOutcome::WillFail { .. } => Self::WillFail,
            OperationOutcome::Unrecognized { .. } => Self::Unrecognized,
        }
    }

    pub fn from_error(err: &LensError) -> Self {
        match err.kind() {
            ErrorKind::Config => Self::Config,
            ErrorKind::Validation => Self::Validation,
            ErrorKind::Auth => Self::Auth,
            ErrorKind::Network => Self::Network,
            ErrorKind::Protocol => Self::Failure,
        }
    }

    pub fn code(self) -> u8 {
        match self {
            Self::Success => 0,
            Self::Failure => 1,
            Self::Config => 2,
            Self::Validation => 3,
            Self::Auth => 4,
            Self::Network => 5,
            Self::WillFail => 6,
            Self::Unrecognized => 7,
        }
    }
}
