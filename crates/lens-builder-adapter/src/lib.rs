/*
[INPUT]:  Crate modules and public type definitions
[OUTPUT]: Public Lens builder adapter crate surface
[POS]:    Crate root - module wiring
[UPDATE]: When public modules or exports change
*/

pub mod auth;
pub mod http;
pub mod orchestrator;
pub mod retry;
pub mod storage;
pub mod submitter;
pub mod types;

// Re-export commonly used types from auth
pub use auth::{
    AuthRetry,
    AuthState,
    Credential,
    MessageSigner,
    MockMessageSigner,
    Session,
    SessionAuthenticator,
    SessionService,
};

// Re-export commonly used types from http
pub use http::{
    ClientConfig,
    ConfigError,
    ErrorKind,
    LensClient,
    LensError,
    Result,
    ValidationError,
};

pub use orchestrator::{ExitStatus, Orchestrator, OrchestratorConfig};
pub use retry::{RetryAttempt, RetryPolicy};
pub use storage::{DataUriStorage, GroveStorage, StorageUploader};
pub use submitter::{ConfirmationConfig, OperationService, OperationSubmitter};

// Re-export all types
pub use types::*;
