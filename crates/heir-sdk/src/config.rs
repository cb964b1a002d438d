use serde::{Deserialize, Serialize};

use heir_chain::DEFAULT_MAX_DEPTH;

/// Configuration for a [`Resolver`](crate::Resolver).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Maximum number of manifests in one inheritance chain.
    pub max_chain_depth: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            max_chain_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_depth_matches_chain_builder() {
        assert_eq!(ResolverConfig::default().max_chain_depth, 16);
    }

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let config: ResolverConfig = toml::from_str("").unwrap();
        assert_eq!(config, ResolverConfig::default());

        let config: ResolverConfig = toml::from_str("max_chain_depth = 4").unwrap();
        assert_eq!(config.max_chain_depth, 4);
    }
}
