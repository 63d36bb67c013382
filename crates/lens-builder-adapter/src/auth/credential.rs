/*
[INPUT]:  Raw private key string from the secret source
[OUTPUT]: Validated Credential with derived account address
[POS]:    Auth layer - credential validation and local EVM signing
[UPDATE]: When accepted key formats or signing scheme change
*/

use std::fmt;

use alloy_signer::Signer as _;
use alloy_signer_local::PrivateKeySigner;
use async_trait::async_trait;

use crate::auth::MessageSigner;
use crate::http::{ConfigError, LensError, Result};
use crate::types::EvmAddress;

/// Hex characters in a 32-byte secret
pub const SECRET_HEX_LEN: usize = 64;

/// Validated signing key plus the account it controls.
///
/// `Debug` never prints the secret and the type is deliberately not
/// serializable.
pub struct Credential {
    signer: PrivateKeySigner,
    address: EvmAddress,
}

impl Credential {
    /// Parse a raw secret.
    ///
    /// Accepts `0x`-prefixed or bare hex, optionally wrapped in one pair of
    /// matching quotes and surrounding whitespace.
    pub fn from_raw(raw: &str) -> std::result::Result<Self, ConfigError> {
        let digits = secret_digits(raw);

        let got = digits.chars().count();
        if got != SECRET_HEX_LEN {
            return Err(invalid("invalid length", got));
        }
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid("invalid character", got));
        }

        let bytes = hex::decode(digits).map_err(|_| invalid("invalid character", got))?;
        let signer = PrivateKeySigner::from_slice(&bytes).map_err(|_| invalid("invalid key", got))?;
        let address = EvmAddress::parse(&signer.address().to_checksum(None))
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;

        Ok(Self { signer, address })
    }

    /// Read and validate the secret from environment variable `name`
    pub fn from_env(name: &str) -> std::result::Result<Self, ConfigError> {
        let raw = std::env::var(name).map_err(|_| ConfigError::Missing {
            name: name.to_string(),
        })?;
        Self::from_raw(&raw)
    }

    pub fn address(&self) -> &EvmAddress {
        &self.address
    }
}

fn invalid(reason: &'static str, got: usize) -> ConfigError {
    ConfigError::InvalidCredential {
        reason,
        expected: SECRET_HEX_LEN,
        got,
    }
}

/// Strip whitespace, one layer of matching quotes and the hex prefix.
fn secret_digits(raw: &str) -> &str {
    let trimmed = raw.trim();
    let unquoted = ['"', '\'']
        .iter()
        .find_map(|quote| {
            trimmed
                .strip_prefix(*quote)
                .and_then(|rest| rest.strip_suffix(*quote))
        })
        .unwrap_or(trimmed);

    unquoted
        .strip_prefix("0x")
        .or_else(|| unquoted.strip_prefix("0X"))
        .unwrap_or(unquoted)
}

impl PartialEq for Credential {
    fn eq(&self, other: &Self) -> bool {
        self.address == other.address
    }
}

impl Eq for Credential {}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("address", &self.address)
            .field("secret", &"<redacted>")
            .finish()
    }
}

#[async_trait]
impl MessageSigner for Credential {
    fn address(&self) -> &EvmAddress {
        &self.address
    }

    /// EIP-191 personal-sign; returns the 65-byte `r || s || v` signature
    async fn sign_message(&self, message: &[u8]) -> Result<Vec<u8>> {
        let signature = self
            .signer
            .sign_message(message)
            .await
            .map_err(|e| LensError::authentication(format!("failed to sign challenge: {e}")))?;
        Ok(signature.as_bytes().to_vec())
    }
}
