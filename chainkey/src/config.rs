//! Router configuration

use serde::{Deserialize, Serialize};

use crate::crypto::DEFAULT_MAX_DEPTH;

/// Configuration for [`crate::chain::ChainRouter`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouterConfig {
    /// Longest derivation path accepted
    pub max_path_depth: usize,
    /// Network used when a call does not name one
    pub default_network: String,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            max_path_depth: DEFAULT_MAX_DEPTH,
            default_network: "mainnet".to_string(),
        }
    }
}

impl RouterConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let max_path_depth = lookup("CHAINKEY_MAX_PATH_DEPTH")
            .and_then(|value| value.trim().parse().ok())
            .filter(|depth| *depth > 0)
            .unwrap_or(defaults.max_path_depth);

        let default_network = lookup("CHAINKEY_DEFAULT_NETWORK")
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or(defaults.default_network);

        Self {
            max_path_depth,
            default_network,
        }
    }

    pub fn with_max_path_depth(mut self, max_path_depth: usize) -> Self {
        self.max_path_depth = max_path_depth;
        self
    }

    pub fn with_default_network(mut self, network: impl Into<String>) -> Self {
        self.default_network = network.into();
        self
    }
}
