/*
[INPUT]:  Challenge bytes from the session service
[OUTPUT]: Signature bytes for the authentication handshake
[POS]:    Auth layer - signing capability abstraction
[UPDATE]: When adding new signer backends or changing signature format
*/

use async_trait::async_trait;

use crate::http::Result;
use crate::types::EvmAddress;

/// Capability that signs authentication challenges.
///
/// Implement this for any backend that can produce an account signature
/// (local key, hardware wallet, remote KMS). The trait is async so external
/// signers can suspend while waiting on the device or service.
#[async_trait]
pub trait MessageSigner: Send + Sync {
    /// Account the signatures belong to
    fn address(&self) -> &EvmAddress;

    /// Sign `message` and return the raw signature bytes
    async fn sign_message(&self, message: &[u8]) -> Result<Vec<u8>>;
}

/// Mock signer for testing
#[derive(Debug, Clone)]
pub struct MockMessageSigner {
    address: EvmAddress,
    signature: Vec<u8>,
}

impl MockMessageSigner {
    /// Create a new mock signer with predetermined signature
    pub fn new(address: EvmAddress, signature: &[u8]) -> Self {
        Self {
            address,
            signature: signature.to_vec(),
        }
    }
}

#[async_trait]
impl MessageSigner for MockMessageSigner {
    fn address(&self) -> &EvmAddress {
        &self.address
    }

    async fn sign_message(&self, _message: &[u8]) -> Result<Vec<u8>> {
        Ok(self.signature.clone())
    }
}
