use super::schema::Config;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const DEFAULT_CONFIG_PATH: &str = "./ts-codegen.config.yaml";

/// Load configuration from file or return default
pub fn load_config(custom_path: Option<&Path>) -> Result<Config> {
    let config_path = match custom_path {
        Some(path) => path.to_path_buf(),
        None => PathBuf::from(DEFAULT_CONFIG_PATH),
    };

    if config_path.exists() {
        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {:?}", config_path))?;

        // JSON configs parse too, YAML being a superset
        let config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", config_path))?;

        debug!(?config_path, "loaded config");
        Ok(config)
    } else if custom_path.is_some() {
        anyhow::bail!("Config file not found: {:?}", config_path);
    } else {
        Ok(Config::default())
    }
}

/// Merge config with CLI arguments (CLI takes precedence)
pub fn merge_with_cli_args(
    mut config: Config,
    specs: Vec<PathBuf>,
    output: Option<PathBuf>,
    type_with_prefix: bool,
) -> Config {
    if !specs.is_empty() {
        config.data = specs;
    }

    if let Some(output_path) = output {
        config.output = output_path;
    }

    if type_with_prefix {
        config.type_with_prefix = true;
    }

    config
}
