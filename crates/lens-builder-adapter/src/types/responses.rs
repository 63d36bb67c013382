/*
[INPUT]:  Lens GraphQL response payloads
[OUTPUT]: Typed Rust response structs with serialization support
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When API schema changes or new types added
*/

use serde::{Deserialize, Serialize};

/// Challenge issued by the `challenge` mutation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Challenge {
    pub id: String,
    pub text: String,
}

/// Token triple returned on successful `authenticate`
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticationTokens {
    pub access_token: String,
    pub refresh_token: String,
    pub id_token: String,
}

impl std::fmt::Debug for AuthenticationTokens {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthenticationTokens")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .field("id_token", &"<redacted>")
            .finish()
    }
}

/// Union returned by `authenticate`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "__typename")]
pub enum AuthenticationResult {
    AuthenticationTokens(AuthenticationTokens),
    WrongSignerError { reason: String },
    ExpiredChallengeError { reason: String },
    ForbiddenError { reason: String },
}

/// Indexing status of a submitted transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionStatus {
    Pending,
    Finished,
    Failed { reason: String },
    NotIndexedYet { reason: String, tx_has_mined: bool },
    Unknown { typename: String },
}

impl TransactionStatus {
    /// Build from the `transactionStatus` union payload
    pub fn from_payload(payload: &serde_json::Value) -> Self {
        let text = |key: &str| {
            payload
                .get(key)
                .and_then(|value| value.as_str())
                .unwrap_or_default()
                .to_string()
        };

        match payload.get("__typename").and_then(|value| value.as_str()) {
            Some("PendingTransactionStatus") => TransactionStatus::Pending,
            Some("FinishedTransactionStatus") => TransactionStatus::Finished,
            Some("FailedTransactionStatus") => TransactionStatus::Failed {
                reason: text("reason"),
            },
            Some("NotIndexedYetStatus") => TransactionStatus::NotIndexedYet {
                reason: text("reason"),
                tx_has_mined: payload
                    .get("txHasMined")
                    .and_then(|value| value.as_bool())
                    .unwrap_or(false),
            },
            other => TransactionStatus::Unknown {
                typename: other.unwrap_or_default().to_string(),
            },
        }
    }

    /// True once polling can stop
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TransactionStatus::Finished | TransactionStatus::Failed { .. }
        )
    }
}

/// Metadata as indexed on an app
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexedAppMetadata {
    pub name: String,
    pub tagline: Option<String>,
    pub description: Option<String>,
    pub developer: Option<String>,
    pub url: Option<String>,
    pub logo: Option<String>,
    #[serde(default)]
    pub platforms: Vec<String>,
    pub privacy_policy: Option<String>,
    pub terms_of_service: Option<String>,
}

/// App returned by the `app` query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct App {
    pub address: String,
    pub owner: String,
    pub created_at: Option<String>,
    pub treasury_address: Option<String>,
    pub default_feed_address: Option<String>,
    pub graph_address: Option<String>,
    pub namespace_address: Option<String>,
    pub sponsorship_address: Option<String>,
    #[serde(default)]
    pub verification_enabled: bool,
    pub metadata: Option<IndexedAppMetadata>,
}
