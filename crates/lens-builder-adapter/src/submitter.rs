/*
[INPUT]:  Authenticated session, validated OperationRequest, transaction hash
[OUTPUT]: Classified OperationOutcome; terminal TransactionStatus when confirming
[POS]:    Submission layer - retry-wrapped submit plus optional confirmation wait
[UPDATE]: When submission, retry classification or polling behavior changes
*/

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::auth::Session;
use crate::http::{LensError, Result};
use crate::retry::RetryPolicy;
use crate::types::{OperationOutcome, OperationRequest, RawResult, TransactionStatus};

/// Remote submission service
#[async_trait]
pub trait OperationService: Send + Sync {
    /// Send a mutation through `session` and return the raw result
    async fn submit(&self, session: &Session, request: &OperationRequest) -> Result<RawResult>;

    /// Current indexing status of transaction `hash`
    async fn transaction_status(&self, hash: &str) -> Result<TransactionStatus>;
}

/// Polling parameters for the confirmation wait
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmationConfig {
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ConfirmationConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_poll_interval_ms() -> u64 {
    2000
}

fn default_timeout_secs() -> u64 {
    120
}

impl ConfirmationConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Sends operations and classifies what comes back.
///
/// Only transient network failures are retried; GraphQL rejections and
/// business outcomes pass straight through.
#[derive(Debug)]
pub struct OperationSubmitter<O> {
    service: O,
    retry: RetryPolicy,
}

impl<O: OperationService> OperationSubmitter<O> {
    pub fn new(service: O, retry: RetryPolicy) -> Self {
        Self { service, retry }
    }

    pub fn service(&self) -> &O {
        &self.service
    }

    pub async fn submit(
        &self,
        session: &Session,
        request: &OperationRequest,
    ) -> Result<OperationOutcome> {
        info!(operation = request.name(), "submitting operation");

        let raw = self
            .retry
            .run_if(
                || self.service.submit(session, request),
                LensError::is_retryable,
            )
            .await?;

        let outcome = OperationOutcome::classify(&raw);
        match &outcome {
            OperationOutcome::Finalized { transaction_hash } => {
                info!(operation = request.name(), hash = %transaction_hash, "operation finalized");
            }
            OperationOutcome::SelfFundingRequired { reason, .. } => {
                info!(operation = request.name(), %reason, "operation requires self-funding");
            }
            OperationOutcome::WillFail { reason } => {
                warn!(operation = request.name(), %reason, "operation will fail");
            }
            OperationOutcome::Unrecognized { .. } => {
                warn!(
                    operation = request.name(),
                    typename = raw.discriminator().unwrap_or("<none>"),
                    "unrecognized operation result"
                );
            }
        }
        Ok(outcome)
    }

    /// Poll until `hash` is finished or failed, bounded by `config.timeout`
    pub async fn wait_for_transaction(
        &self,
        hash: &str,
        config: ConfirmationConfig,
    ) -> Result<TransactionStatus> {
        let poll = async {
            loop {
                let status = self
                    .retry
                    .run_if(
                        || self.service.transaction_status(hash),
                        LensError::is_retryable,
                    )
                    .await?;

                if status.is_terminal() {
                    info!(%hash, ?status, "transaction settled");
                    return Ok(status);
                }
                debug!(%hash, ?status, "transaction not settled yet");
                tokio::time::sleep(config.poll_interval()).await;
            }
        };

        tokio::time::timeout(config.timeout(), poll)
            .await
            .map_err(|_| LensError::ConfirmationTimeout {
                hash: hash.to_string(),
                waited_secs: config.timeout_secs,
            })?
    }
}
