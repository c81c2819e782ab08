//! Service configuration: the default review root and listen port.
//!
//! Resolution order is CLI argument, `CORPUSVET_ROOT` env var, project
//! config file, then global config under `~/.corpusvet/`.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CorpusvetConfig {
    /// Default corpus root the review dashboard opens on.
    pub root_dir: Option<String>,
    /// Listen port for the local review service.
    pub port: Option<u16>,
}

pub const CONFIG_FILENAME: &str = ".corpusvet.toml";

pub fn config_path(dir: &Path) -> PathBuf {
    dir.join(CONFIG_FILENAME)
}

pub fn resolve_user_home_dir() -> Option<PathBuf> {
    for var in ["HOME", "USERPROFILE"] {
        if let Ok(value) = std::env::var(var) {
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                return Some(PathBuf::from(trimmed));
            }
        }
    }
    None
}

pub fn global_config_path() -> Option<PathBuf> {
    resolve_user_home_dir().map(|home| home.join(".corpusvet").join("config.toml"))
}

pub fn load_config(path: &Path) -> Result<CorpusvetConfig, ConfigError> {
    let text = fs::read_to_string(path)?;
    Ok(toml::from_str(&text)?)
}

pub fn load_global_config() -> Option<CorpusvetConfig> {
    let path = global_config_path()?;
    if !path.is_file() {
        return None;
    }
    load_config(&path).ok()
}

/// Resolve the default review root. `cli_root` wins, then `CORPUSVET_ROOT`,
/// then the config files. None means the dashboard starts without a root
/// and the shell must pick one.
pub fn resolve_root_dir(cli_root: Option<&Path>, config: Option<&CorpusvetConfig>) -> Option<PathBuf> {
    if let Some(root) = cli_root {
        return Some(root.to_path_buf());
    }
    if let Ok(value) = std::env::var("CORPUSVET_ROOT") {
        let trimmed = value.trim();
        if !trimmed.is_empty() {
            return Some(PathBuf::from(trimmed));
        }
    }
    if let Some(root) = config.and_then(|c| c.root_dir.clone()) {
        return Some(PathBuf::from(root));
    }
    load_global_config()
        .and_then(|c| c.root_dir)
        .map(PathBuf::from)
}
