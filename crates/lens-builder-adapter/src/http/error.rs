/*
[INPUT]:  Error sources (credential, payload validation, HTTP, GraphQL, auth, storage)
[OUTPUT]: Structured error types with kind classification and retry hints
[POS]:    Error handling layer - unified error types for entire crate
[UPDATE]: When adding new error sources or improving error messages
*/

use reqwest::StatusCode;
use thiserror::Error;

/// Malformed or missing configuration (credential, required settings)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A required value was not provided
    #[error("missing required configuration: {name}")]
    Missing { name: String },

    /// The secret key failed validation. Never carries key material.
    #[error("invalid credential: {reason} (expected {expected} hex characters, got {got})")]
    InvalidCredential {
        reason: &'static str,
        expected: usize,
        got: usize,
    },

    /// Any other invalid setting
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Malformed field in a request payload
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("invalid address in `{field}`: {value:?} (expected 0x followed by 40 hex characters)")]
    InvalidAddress { field: String, value: String },

    #[error("invalid URI in `{field}`: {reason}")]
    InvalidUri { field: String, reason: String },

    #[error("invalid handle {value:?} (expected 3-31 characters of a-z, 0-9, '_' or '-')")]
    InvalidHandle { value: String },

    #[error("`{field}` must not be empty")]
    Empty { field: String },
}

/// Coarse classification used for remediation and exit codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Config,
    Validation,
    Auth,
    Network,
    Protocol,
}

/// Main error type for the Lens builder adapter
#[derive(Error, Debug)]
pub enum LensError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Challenge or signature rejected by the session service
    #[error("Authentication failed: {reason}")]
    Authentication { reason: String },

    /// HTTP transport failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Transport-level failure not originating from reqwest
    #[error("Network error: {0}")]
    Network(String),

    /// API returned a non-success HTTP status
    #[error("API error (code {code}): {message}")]
    Api { code: u16, message: String },

    /// GraphQL envelope carried errors
    #[error("GraphQL error: {}", messages.join("; "))]
    GraphQl { messages: Vec<String> },

    /// Serialization/deserialization failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// URL parsing failed
    #[error("Invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Invalid response from server
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Storage upload rejected
    #[error("Storage upload failed: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Transaction was not indexed within the confirmation window
    #[error("Transaction {hash} not confirmed after {waited_secs}s")]
    ConfirmationTimeout { hash: String, waited_secs: u64 },
}

impl LensError {
    /// Classify the error for remediation
    pub fn kind(&self) -> ErrorKind {
        match self {
            LensError::Config(_) => ErrorKind::Config,
            LensError::Validation(_) => ErrorKind::Validation,
            LensError::Authentication { .. } => ErrorKind::Auth,
            LensError::Http(e) if e.is_builder() => ErrorKind::Config,
            LensError::Http(e) if e.is_decode() => ErrorKind::Protocol,
            LensError::Http(_) | LensError::Network(_) => ErrorKind::Network,
            LensError::Api { code, .. } if is_transient_status(*code) => ErrorKind::Network,
            LensError::Api { code, .. } if *code == 401 || *code == 403 => ErrorKind::Auth,
            _ => ErrorKind::Protocol,
        }
    }

    /// Check if the error is transient and worth a mechanical retry
    pub fn is_retryable(&self) -> bool {
        self.kind() == ErrorKind::Network
    }

    /// Check if error indicates authentication failure
    pub fn is_auth_error(&self) -> bool {
        self.kind() == ErrorKind::Auth
    }

    /// Create an API error from status code and message
    pub fn api_error(status: StatusCode, message: impl Into<String>) -> Self {
        LensError::Api {
            code: status.as_u16(),
            message: message.into(),
        }
    }

    pub fn authentication(reason: impl Into<String>) -> Self {
        LensError::Authentication {
            reason: reason.into(),
        }
    }
}

fn is_transient_status(code: u16) -> bool {
    code == 429 || (500..600).contains(&code)
}

/// Result type alias for Lens builder operations
pub type Result<T> = std::result::Result<T, LensError>;
