/*
[INPUT]:  Authentication tokens issued for one account
[OUTPUT]: Session capability used for authenticated requests
[POS]:    Auth layer - session token holder
[UPDATE]: When token handling or session metadata changes
*/

use std::fmt;

use base64::{
    Engine as _,
    engine::general_purpose::{URL_SAFE, URL_SAFE_NO_PAD},
};
use chrono::{DateTime, Utc};

use crate::types::{AuthenticationTokens, EvmAddress};

/// Proof of a completed challenge/sign/verify handshake.
///
/// Validity is decided by the server; nothing here enforces expiry.
#[derive(Clone)]
pub struct Session {
    account: EvmAddress,
    tokens: AuthenticationTokens,
    authenticated_at: DateTime<Utc>,
}

impl Session {
    pub fn new(account: EvmAddress, tokens: AuthenticationTokens) -> Self {
        Self {
            account,
            tokens,
            authenticated_at: Utc::now(),
        }
    }

    pub fn account(&self) -> &EvmAddress {
        &self.account
    }

    /// Bearer token for the `Authorization` header
    pub fn access_token(&self) -> &str {
        &self.tokens.access_token
    }

    pub fn refresh_token(&self) -> &str {
        &self.tokens.refresh_token
    }

    pub fn authenticated_at(&self) -> DateTime<Utc> {
        self.authenticated_at
    }

    /// Expiry advertised by the id token's `exp` claim, if readable
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        let payload_b64 = self.tokens.id_token.trim().split('.').nth(1)?;
        let payload_bytes = URL_SAFE_NO_PAD
            .decode(payload_b64)
            .or_else(|_| URL_SAFE.decode(payload_b64))
            .ok()?;
        let payload: serde_json::Value = serde_json::from_slice(&payload_bytes).ok()?;
        let exp = payload.get("exp")?.as_i64()?;
        DateTime::from_timestamp(exp, 0)
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("account", &self.account)
            .field("tokens", &self.tokens)
            .field("authenticated_at", &self.authenticated_at)
            .finish()
    }
}
