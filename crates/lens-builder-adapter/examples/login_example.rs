/*
[INPUT]:  WALLET_PRIVATE_KEY environment variable, Lens testnet API
[OUTPUT]: Authenticated builder session summary
[POS]:    Examples - authentication flow demonstration
[UPDATE]: When auth flow changes
*/

use lens_builder_adapter::*;

/// Example: Builder authentication flow
///
/// 1. Validate the credential from the environment
/// 2. Create the GraphQL client
/// 3. Request a challenge, sign it and exchange it for tokens
#[tokio::main]
async fn main() {
    println!("=== Lens Builder Authentication Example ===\n");

    // Step 1: Credential
    let credential = match Credential::from_env("WALLET_PRIVATE_KEY") {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Credential rejected: {}", e);
            return;
        }
    };
    println!("✓ Credential valid for {}", credential.address());

    // Step 2: HTTP client
    let client = match LensClient::new(Environment::Testnet) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to create client: {}", e);
            return;
        }
    };
    println!("✓ HTTP client created ({})", client.api_url());

    // Step 3: Handshake
    let mut authenticator = SessionAuthenticator::new(client);
    match authenticator.login(&credential).await {
        Ok(session) => {
            println!("✓ Authenticated as {}", session.account());
            match session.expires_at() {
                Some(at) => println!("  Session expires at {}", at),
                None => println!("  Session expiry not advertised"),
            }
        }
        Err(e) => eprintln!("✗ Authentication failed ({:?}): {}", e.kind(), e),
    }
}
