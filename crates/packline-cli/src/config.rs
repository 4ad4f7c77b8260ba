use std::fs;
use std::path::Path;

use anyhow::Context;
use packline_engine::EngineConfig;
use serde::{Deserialize, Serialize};

/// Contents of the `--config` TOML file.
///
/// ```toml
/// [engine]
/// max_id_attempts = 16
/// enforce_non_negative = true
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub engine: EngineConfig,
}

impl CliConfig {
    /// Read `path`, or fall back to defaults when no path was given.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn parse(text: &str) -> anyhow::Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.engine.validate()?;
        Ok(config)
    }
}
