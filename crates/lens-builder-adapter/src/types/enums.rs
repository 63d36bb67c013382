/*
[INPUT]:  Lens deployment constants and API schema enums
[OUTPUT]: Typed Rust enums with serialization support
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When API schema changes or a new deployment is added
*/

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Lens deployment the client talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Testnet,
    Mainnet,
}

impl Environment {
    /// Lens Chain id
    pub fn chain_id(self) -> u64 {
        match self {
            Environment::Testnet => 37111,
            Environment::Mainnet => 232,
        }
    }

    pub fn chain_name(self) -> &'static str {
        match self {
            Environment::Testnet => "Lens Chain Testnet",
            Environment::Mainnet => "Lens Chain",
        }
    }

    /// GraphQL endpoint
    pub fn api_url(self) -> &'static str {
        match self {
            Environment::Testnet => "https://api.testnet.lens.xyz/graphql",
            Environment::Mainnet => "https://api.lens.xyz/graphql",
        }
    }

    pub fn rpc_url(self) -> &'static str {
        match self {
            Environment::Testnet => "https://rpc.testnet.lens.dev",
            Environment::Mainnet => "https://rpc.lens.xyz",
        }
    }

    pub fn explorer_url(self) -> &'static str {
        match self {
            Environment::Testnet => "https://scan.testnet.lens.dev",
            Environment::Mainnet => "https://explorer.lens.xyz",
        }
    }

    /// Explorer link for a transaction hash
    pub fn transaction_url(self, hash: &str) -> String {
        format!("{}/tx/{hash}", self.explorer_url())
    }

    /// Explorer link for an account or contract
    pub fn address_url(self, address: &str) -> String {
        format!("{}/address/{address}", self.explorer_url())
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Testnet => f.write_str("testnet"),
            Environment::Mainnet => f.write_str("mainnet"),
        }
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "testnet" => Ok(Environment::Testnet),
            "mainnet" => Ok(Environment::Mainnet),
            other => Err(format!("unknown environment: {other}")),
        }
    }
}

/// Platforms an app declares in its metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Platform {
    Web,
    Ios,
    Android,
}
