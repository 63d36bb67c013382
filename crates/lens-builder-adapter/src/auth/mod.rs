/*
[INPUT]:  Raw credential, signing capability, session service
[OUTPUT]: Validated credentials, sessions and auth errors
[POS]:    Auth layer - handles Lens builder authentication
[UPDATE]: When auth flow or signature methods change
*/

pub mod credential;
pub mod manager;
pub mod session;
pub mod signer;

pub use credential::Credential;
pub use manager::{AuthRetry, AuthState, SessionAuthenticator, SessionService};
pub use session::Session;
pub use signer::{MessageSigner, MockMessageSigner};
