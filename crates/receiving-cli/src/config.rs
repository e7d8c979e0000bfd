use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct ReceivingConfig {
    pub store: StoreSection,
    #[serde(default)]
    pub output: OutputSection,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StoreSection {
    pub path: String,
}

/// Where generated files land. Unset entries fall back to the data directory.
#[derive(Debug, Serialize, Deserialize, Default)]
pub struct OutputSection {
    pub labels_dir: Option<String>,
    pub schedule_dir: Option<String>,
}

impl ReceivingConfig {
    pub fn new(store_path: &Path) -> Self {
        Self {
            store: StoreSection {
                path: store_path.to_string_lossy().to_string(),
            },
            output: OutputSection::default(),
        }
    }

    pub fn labels_dir(&self) -> anyhow::Result<PathBuf> {
        match self.output.labels_dir.as_deref() {
            Some(dir) => Ok(PathBuf::from(dir)),
            None => default_labels_dir(),
        }
    }

    pub fn schedule_dir(&self) -> anyhow::Result<PathBuf> {
        match self.output.schedule_dir.as_deref() {
            Some(dir) => Ok(PathBuf::from(dir)),
            None => default_schedule_dir(),
        }
    }
}

pub fn default_config_path() -> anyhow::Result<PathBuf> {
    Ok(xdg_config_dir()?.join("config.toml"))
}

pub fn default_store_path() -> anyhow::Result<PathBuf> {
    Ok(xdg_data_dir()?.join("store"))
}

pub fn default_labels_dir() -> anyhow::Result<PathBuf> {
    Ok(xdg_data_dir()?.join("Generated Labels"))
}

pub fn default_schedule_dir() -> anyhow::Result<PathBuf> {
    Ok(xdg_data_dir()?.join("Receiving schedule"))
}

pub fn read_config(path: &Path) -> anyhow::Result<ReceivingConfig> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read config {}: {}", path.display(), e))?;
    toml::from_str(&contents)
        .map_err(|e| anyhow::anyhow!("Failed to parse config {}: {}", path.display(), e))
}

pub fn write_config(path: &Path, config: &ReceivingConfig) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            anyhow::anyhow!(
                "Failed to create config directory {}: {}",
                parent.display(),
                e
            )
        })?;
    }
    let contents =
        toml::to_string_pretty(config).map_err(|e| anyhow::anyhow!("TOML error: {}", e))?;
    std::fs::write(path, contents)
        .map_err(|e| anyhow::anyhow!("Failed to write config {}: {}", path.display(), e))?;
    Ok(())
}

pub fn xdg_config_dir() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_CONFIG_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join("receiving"));
        }
    }
    Ok(home_dir()?.join(".config").join("receiving"))
}

pub fn xdg_data_dir() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_DATA_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join("receiving"));
        }
    }
    Ok(home_dir()?.join(".local").join("share").join("receiving"))
}

fn home_dir() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")
        .map_err(|_| anyhow::anyhow!("HOME is not set; cannot resolve default paths"))?;
    Ok(PathBuf::from(home))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("receiving").join("config.toml");
        let mut config = ReceivingConfig::new(Path::new("/srv/receiving/store"));
        config.output.labels_dir = Some("/srv/labels".to_string());

        write_config(&path, &config).unwrap();
        let loaded = read_config(&path).unwrap();
        assert_eq!(loaded.store.path, "/srv/receiving/store");
        assert_eq!(loaded.labels_dir().unwrap(), PathBuf::from("/srv/labels"));
    }

    #[test]
    fn test_output_section_optional() {
        let config: ReceivingConfig = toml::from_str("[store]\npath = \"/tmp/s\"\n").unwrap();
        assert!(config.output.labels_dir.is_none());
        assert!(config.output.schedule_dir.is_none());
    }
}
