use std::fs;
use std::path::Path;

use anyhow::Context;
use bayesnet_core::NetworkConfig;
use bayesnet_fixtures::GeneratorConfig;
use serde::{Deserialize, Serialize};

/// Settings read from the optional `--config` TOML file.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub network: NetworkConfig,
    pub generator: GeneratorConfig,
}

impl Settings {
    /// Load settings from `path`, or the defaults when no path is given.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let settings: Self = toml::from_str(&text)
            .with_context(|| format!("parsing config file {}", path.display()))?;
        settings
            .network
            .validate()
            .with_context(|| format!("invalid [network] table in {}", path.display()))?;
        tracing::debug!(path = %path.display(), "loaded settings");
        Ok(settings)
    }
}
