//! Path resolution for config and store.

use std::path::{Path, PathBuf};

use crate::cli::Cli;
use crate::config::{default_config_path, read_config, ReceivingConfig};

/// Resolve the config file path, checking RECEIVING_CONFIG env var first.
pub fn resolve_config_path() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("RECEIVING_CONFIG") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value));
        }
    }
    default_config_path()
}

/// Load the config file, if one exists.
pub fn load_config() -> anyhow::Result<Option<ReceivingConfig>> {
    let config_path = resolve_config_path()?;
    if !config_path.exists() {
        return Ok(None);
    }
    read_config(&config_path).map(Some)
}

/// Resolve the store directory from CLI args or config.
pub fn resolve_store_path(cli: &Cli, config: Option<&ReceivingConfig>) -> anyhow::Result<PathBuf> {
    if let Some(path) = cli.store.as_deref() {
        if !path.trim().is_empty() {
            return Ok(PathBuf::from(path));
        }
    }

    match config {
        Some(config) => Ok(PathBuf::from(&config.store.path)),
        None => Err(anyhow::anyhow!(missing_config_message(
            &resolve_config_path()?
        ))),
    }
}

/// Error message when no config file exists.
pub fn missing_config_message(config_path: &Path) -> String {
    format!(
        "No receiving config found at {}\n\nRun:\n  receiving init\n\nOr point at a store directly:\n  RECEIVING_STORE=/path/to/store receiving init",
        config_path.display()
    )
}
