/*
[INPUT]:  HTTP configuration (environment, API URL, timeouts, origin header)
[OUTPUT]: Configured reqwest client ready for Lens GraphQL calls
[POS]:    HTTP layer - core client implementation
[UPDATE]: When adding connection options or changing client behavior
*/

use std::time::Duration;

use reqwest::header::{AUTHORIZATION, ORIGIN};
use reqwest::{Client, Method, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use crate::auth::Session;
use crate::http::Result;
use crate::types::Environment;

/// Origin the Lens API accepts from non-browser clients
pub const DEFAULT_ORIGIN: &str = "http://localhost";

/// HTTP client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_origin")]
    pub origin: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            origin: default_origin(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_origin() -> String {
    DEFAULT_ORIGIN.to_string()
}

impl ClientConfig {
    pub(crate) fn build_http_client(&self) -> Result<Client> {
        Ok(Client::builder()
            .timeout(Duration::from_secs(self.timeout_secs))
            .connect_timeout(Duration::from_secs(self.connect_timeout_secs))
            .build()?)
    }
}

/// GraphQL client for the Lens API.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct LensClient {
    http_client: Client,
    api_url: Url,
    origin: String,
    environment: Environment,
}

impl LensClient {
    /// Create a new client with default configuration
    pub fn new(environment: Environment) -> Result<Self> {
        Self::with_config(environment, ClientConfig::default())
    }

    /// Create a new client with custom configuration
    pub fn with_config(environment: Environment, config: ClientConfig) -> Result<Self> {
        Self::with_config_and_api_url(environment, config, environment.api_url())
    }

    /// Create a client against an explicit GraphQL endpoint
    pub fn with_config_and_api_url(
        environment: Environment,
        config: ClientConfig,
        api_url: &str,
    ) -> Result<Self> {
        Ok(Self {
            http_client: config.build_http_client()?,
            api_url: Url::parse(api_url)?,
            origin: config.origin,
            environment,
        })
    }

    pub fn environment(&self) -> Environment {
        self.environment
    }

    pub fn api_url(&self) -> &Url {
        &self.api_url
    }

    /// Build a POST to the GraphQL endpoint, authorized when a session is given
    pub(crate) fn graphql_request(&self, session: Option<&Session>) -> RequestBuilder {
        let builder = self
            .http_client
            .request(Method::POST, self.api_url.clone())
            .header(ORIGIN, &self.origin);

        match session {
            Some(session) => {
                builder.header(AUTHORIZATION, format!("Bearer {}", session.access_token()))
            }
            None => builder,
        }
    }
}
