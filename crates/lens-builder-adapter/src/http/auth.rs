/*
[INPUT]:  Builder address, challenge and signature
[OUTPUT]: Challenge and authenticate results from the Lens API
[POS]:    HTTP layer - authentication endpoints (no session required)
[UPDATE]: When the challenge or authenticate mutations change
*/

use async_trait::async_trait;
use serde_json::json;

use crate::auth::SessionService;
use crate::http::{LensClient, LensError, Result};
use crate::types::{AuthenticationResult, Challenge, EvmAddress};

const CHALLENGE_MUTATION: &str = r#"
mutation Challenge($request: ChallengeRequest!) {
  challenge(request: $request) {
    __typename
    id
    text
  }
}"#;

const AUTHENTICATE_MUTATION: &str = r#"
mutation Authenticate($request: SignedAuthChallenge!) {
  authenticate(request: $request) {
    __typename
    ... on AuthenticationTokens {
      accessToken
      refreshToken
      idToken
    }
    ... on WrongSignerError {
      reason
    }
    ... on ExpiredChallengeError {
      reason
    }
    ... on ForbiddenError {
      reason
    }
  }
}"#;

#[async_trait]
impl SessionService for LensClient {
    async fn challenge(&self, account: &EvmAddress) -> Result<Challenge> {
        let variables = json!({
            "request": { "builder": { "address": account } }
        });
        let value = self
            .execute(CHALLENGE_MUTATION, "challenge", variables, None)
            .await?;
        Ok(serde_json::from_value(value)?)
    }

    async fn authenticate(
        &self,
        challenge: &Challenge,
        signature: &str,
    ) -> Result<AuthenticationResult> {
        let variables = json!({
            "request": { "id": challenge.id, "signature": signature }
        });
        let value = self
            .execute(AUTHENTICATE_MUTATION, "authenticate", variables, None)
            .await?;

        let typename = value
            .get("__typename")
            .and_then(|t| t.as_str())
            .unwrap_or_default()
            .to_string();
        serde_json::from_value(value).map_err(|_| {
            LensError::authentication(format!("unexpected authenticate response `{typename}`"))
        })
    }
}
