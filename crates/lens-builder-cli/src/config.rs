/*
[INPUT]:  Optional settings file, LENS_BUILDER__* environment, app YAML files
[OUTPUT]: Parsed runtime settings and app definitions
[POS]:    Configuration layer - command setup
[UPDATE]: When adding new configuration options
*/

use std::path::Path;

use lens_builder_adapter::{
    AppMetadata, AuthRetry, ClientConfig, ConfirmationConfig, Environment, Handle,
    OrchestratorConfig, RetryPolicy, ValidationError,
};
use serde::{Deserialize, Serialize};

/// Prefix for environment overrides, e.g. `LENS_BUILDER__RETRY__MAX_ATTEMPTS`
pub const ENV_PREFIX: &str = "LENS_BUILDER";

/// Environment variable holding the builder private key
pub const SECRET_ENV_VAR: &str = "WALLET_PRIVATE_KEY";

/// Runtime settings for every command
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Settings {
    /// Lens deployment
    #[serde(default)]
    pub environment: Environment,
    /// GraphQL endpoint override
    #[serde(default)]
    pub api_url: Option<String>,
    /// Grove endpoint override
    #[serde(default)]
    pub storage_url: Option<String>,
    #[serde(default)]
    pub client: ClientConfig,
    #[serde(default)]
    pub retry: RetryPolicy,
    #[serde(default)]
    pub auth_retry: AuthRetry,
    #[serde(default)]
    pub confirmation: ConfirmationConfig,
}

impl Settings {
    /// Layer `path` (format from its extension) under environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        }
        builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    pub fn orchestrator(&self) -> OrchestratorConfig {
        OrchestratorConfig {
            retry: self.retry,
            auth_retry: self.auth_retry,
            confirmation: self.confirmation,
        }
    }

    pub fn api_url(&self, environment: Environment) -> String {
        self.api_url
            .clone()
            .unwrap_or_else(|| environment.api_url().to_string())
    }
}

/// App definition consumed by `create-app` and `set-app-metadata`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    pub metadata: AppMetadata,
    /// Admin addresses; empty means the signer alone
    #[serde(default)]
    pub admins: Vec<String>,
    #[serde(default)]
    pub treasury: Option<String>,
    #[serde(default)]
    pub verification: Option<bool>,
    /// Local logo uploaded before the metadata
    #[serde(default)]
    pub logo_path: Option<String>,
}

impl AppConfig {
    /// Load configuration from YAML file
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Metadata checks; a developer written as `@name` must be a valid handle
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.metadata.validate()?;
        if let Some(developer) = self.metadata.developer.as_deref() {
            if developer.starts_with('@') {
                Handle::parse(developer)?;
            }
        }
        Ok(())
    }
}
