/*
[INPUT]:  Session, validated OperationRequest, transaction hash
[OUTPUT]: Raw mutation results, transaction status, indexed apps
[POS]:    HTTP layer - state-mutating endpoints (require session) and follow-up queries
[UPDATE]: When adding new mutations or changing the requested response fields
*/

use async_trait::async_trait;
use serde_json::json;

use crate::auth::Session;
use crate::http::{LensClient, Result};
use crate::submitter::OperationService;
use crate::types::{App, OperationRequest, RawResult, TransactionStatus};

// Shared selection for every mutation that may need a transaction
const TRANSACTION_RESULT_FRAGMENTS: &str = r#"
    ... on SelfFundedTransactionRequest {
      reason
      selfFundedReason
      raw {
        type
        to
        from
        nonce
        gasLimit
        maxPriorityFeePerGas
        maxFeePerGas
        data
        value
        chainId
        customData {
          gasPerPubdata
          factoryDeps
          paymasterParams {
            paymaster
            paymasterInput
          }
          customSignature
        }
      }
    }
    ... on SponsoredTransactionRequest {
      reason
      sponsoredReason
      raw {
        type
        to
        from
        nonce
        gasLimit
        maxPriorityFeePerGas
        maxFeePerGas
        data
        value
        chainId
        customData {
          gasPerPubdata
          factoryDeps
          paymasterParams {
            paymaster
            paymasterInput
          }
          customSignature
        }
      }
    }
    ... on TransactionWillFail {
      reason
    }"#;

const TRANSACTION_STATUS_QUERY: &str = r#"
query TransactionStatus($request: TransactionStatusRequest!) {
  transactionStatus(request: $request) {
    __typename
    ... on PendingTransactionStatus {
      blockTimestamp
    }
    ... on FinishedTransactionStatus {
      blockTimestamp
    }
    ... on FailedTransactionStatus {
      reason
      blockTimestamp
    }
    ... on NotIndexedYetStatus {
      reason
      txHasMined
    }
  }
}"#;

const APP_QUERY: &str = r#"
query App($request: AppRequest!) {
  app(request: $request) {
    __typename
    address
    owner
    createdAt
    treasuryAddress
    defaultFeedAddress
    graphAddress
    namespaceAddress
    sponsorshipAddress
    verificationEnabled
    metadata {
      name
      tagline
      description
      developer
      url
      logo
      platforms
      privacyPolicy
      termsOfService
    }
  }
}"#;

/// GraphQL document for `request`
fn mutation_document(request: &OperationRequest) -> String {
    let (operation, input, response) = match request {
        OperationRequest::CreateApp(_) => ("CreateApp", "CreateAppRequest", "CreateAppResponse"),
        OperationRequest::SetAppMetadata(_) => (
            "SetAppMetadata",
            "SetAppMetadataRequest",
            "SetAppMetadataResponse",
        ),
    };
    let field = request.name();

    format!(
        r#"
mutation {operation}($request: {input}!) {{
  {field}(request: $request) {{
    __typename
    ... on {response} {{
      hash
    }}{TRANSACTION_RESULT_FRAGMENTS}
  }}
}}"#
    )
}

#[async_trait]
impl OperationService for LensClient {
    async fn submit(&self, session: &Session, request: &OperationRequest) -> Result<RawResult> {
        let document = mutation_document(request);
        let value = self
            .execute(&document, request.name(), request.variables()?, Some(session))
            .await?;
        Ok(RawResult(value))
    }

    async fn transaction_status(&self, hash: &str) -> Result<TransactionStatus> {
        let variables = json!({ "request": { "txHash": hash } });
        let value = self
            .execute(TRANSACTION_STATUS_QUERY, "transactionStatus", variables, None)
            .await?;
        Ok(TransactionStatus::from_payload(&value))
    }
}

impl LensClient {
    /// Fetch the app created by transaction `hash`; `None` until indexed
    pub async fn fetch_app(&self, hash: &str) -> Result<Option<App>> {
        let variables = json!({ "request": { "txHash": hash } });
        let value = self.execute(APP_QUERY, "app", variables, None).await?;
        if value.is_null() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_value(value)?))
    }
}
