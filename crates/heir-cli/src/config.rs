use std::fs;
use std::path::Path;

use anyhow::Context;
use heir_sdk::ResolverConfig;
use serde::{Deserialize, Serialize};

use crate::cli::OutputFormat;

/// Contents of the `--config` file.
///
/// ```toml
/// format = "json"
///
/// [resolver]
/// max_chain_depth = 8
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub resolver: ResolverConfig,
    pub format: OutputFormat,
}

impl CliConfig {
    /// Load from `path`, or use defaults when no file is given.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_file() {
        let config = CliConfig::load(None).unwrap();
        assert_eq!(config.format, OutputFormat::Text);
        assert_eq!(config.resolver.max_chain_depth, 16);
    }

    #[test]
    fn loads_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("heir.toml");
        fs::write(&path, "format = \"json\"\n\n[resolver]\nmax_chain_depth = 8\n").unwrap();

        let config = CliConfig::load(Some(&path)).unwrap();
        assert_eq!(config.format, OutputFormat::Json);
        assert_eq!(config.resolver.max_chain_depth, 8);
    }

    #[test]
    fn invalid_file_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("heir.toml");
        fs::write(&path, "format = \"xml\"\n").unwrap();

        let err = CliConfig::load(Some(&path)).unwrap_err();
        assert!(format!("{err:#}").contains("heir.toml"));
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(CliConfig::load(Some(Path::new("/nonexistent/heir.toml"))).is_err());
    }
}
