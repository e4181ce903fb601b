mod types;

pub use types::*;

use crate::Result;
use std::{env, path::Path};
use tracing::debug;

const DEFAULT_CONFIG_PATH: &str = "config.yaml";

/// Builds the process configuration: YAML settings plus API keys from the environment.
///
/// An explicit `CONFIG_PATH` must exist. Without it, `config.yaml` is read when
/// present and built-in defaults are used otherwise.
pub async fn load() -> Result<Config> {
    let mut config = match env::var("CONFIG_PATH") {
        Ok(path) => from_file(&path).await?,
        Err(_) if Path::new(DEFAULT_CONFIG_PATH).exists() => from_file(DEFAULT_CONFIG_PATH).await?,
        Err(_) => {
            debug!("No {} found, using default configuration", DEFAULT_CONFIG_PATH);
            Config::default()
        }
    };

    config.llm.api_keys = ApiKeys::from_env();

    Ok(config)
}

pub async fn from_file(path: &str) -> Result<Config> {
    debug!("Loading configuration from: {}", path);

    let config_str = tokio::fs::read_to_string(path).await?;
    from_yaml(&config_str)
}

pub fn from_yaml(config_str: &str) -> Result<Config> {
    if config_str.trim().is_empty() {
        return Ok(Config::default());
    }

    let config: Config = serde_yaml::from_str(config_str)?;
    Ok(config)
}

impl ApiKeys {
    pub fn from_env() -> Self {
        let read = |tier: KeyTier| env::var(tier.env_var()).ok();

        Self {
            paid: read(KeyTier::Paid),
            free: read(KeyTier::Free),
        }
    }
}
