/*
[INPUT]:  Raw mutation result returned by the submission service
[OUTPUT]: Closed OperationOutcome variant and the caller's next action
[POS]:    Data layer - deterministic classification of operation results
[UPDATE]: When the server adds a new transaction response shape
*/

use serde::{Deserialize, Serialize};
use serde_json::Value;

const DISCRIMINATOR: &str = "__typename";

/// JSON object found under the mutation's root field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawResult(pub Value);

impl RawResult {
    pub fn discriminator(&self) -> Option<&str> {
        self.0.get(DISCRIMINATOR).and_then(Value::as_str)
    }

    fn text(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }
}

impl From<Value> for RawResult {
    fn from(value: Value) -> Self {
        RawResult(value)
    }
}

/// How a submitted operation resolved
#[derive(Debug, Clone, PartialEq)]
pub enum OperationOutcome {
    /// The service broadcast the transaction itself
    Finalized { transaction_hash: String },
    /// The caller must sign and broadcast `raw_transaction`
    SelfFundingRequired {
        raw_transaction: Value,
        reason: String,
    },
    /// The transaction would revert; do not submit
    WillFail { reason: String },
    /// Response shape this client does not know
    Unrecognized { payload: Value },
}

/// What the caller has to do next
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequiredAction {
    /// Nothing to sign; optionally poll the indexer for `hash`
    PollIndexer { hash: String },
    SignAndBroadcast,
    Abort,
    Inspect,
}

impl OperationOutcome {
    /// Classify a raw result. Total and side-effect free.
    pub fn classify(raw: &RawResult) -> Self {
        let unrecognized = || OperationOutcome::Unrecognized {
            payload: raw.0.clone(),
        };

        match raw.discriminator() {
            Some("Finalized" | "CreateAppResponse" | "SetAppMetadataResponse") => {
                match raw.text("hash") {
                    Some(hash) => OperationOutcome::Finalized {
                        transaction_hash: hash.to_string(),
                    },
                    None => unrecognized(),
                }
            }
            Some("SelfFunded" | "SelfFundedTransactionRequest" | "SponsoredTransactionRequest") => {
                match raw.0.get("raw") {
                    Some(transaction) if !transaction.is_null() => {
                        OperationOutcome::SelfFundingRequired {
                            raw_transaction: transaction.clone(),
                            reason: funding_reason(raw),
                        }
                    }
                    _ => unrecognized(),
                }
            }
            Some("WillFail" | "TransactionWillFail") => OperationOutcome::WillFail {
                reason: raw.text("reason").unwrap_or_default().to_string(),
            },
            _ => unrecognized(),
        }
    }

    pub fn required_action(&self) -> RequiredAction {
        match self {
            OperationOutcome::Finalized { transaction_hash } => RequiredAction::PollIndexer {
                hash: transaction_hash.clone(),
            },
            OperationOutcome::SelfFundingRequired { .. } => RequiredAction::SignAndBroadcast,
            OperationOutcome::WillFail { .. } => RequiredAction::Abort,
            OperationOutcome::Unrecognized { .. } => RequiredAction::Inspect,
        }
    }

    pub fn transaction_hash(&self) -> Option<&str> {
        match self {
            OperationOutcome::Finalized { transaction_hash } => Some(transaction_hash),
            _ => None,
        }
    }
}

// Lens reports a generic `reason` plus a typed sub-reason on funding requests.
fn funding_reason(raw: &RawResult) -> String {
    let reason = raw.text("reason").unwrap_or_default();
    let detail = raw
        .text("selfFundedReason")
        .or_else(|| raw.text("sponsoredReason"))
        .filter(|detail| !detail.is_empty());

    match detail {
        Some(detail) if reason.is_empty() => detail.to_string(),
        Some(detail) => format!("{reason} ({detail})"),
        None => reason.to_string(),
    }
}
