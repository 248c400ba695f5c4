//! Tuning configuration loading from `~/.initiatep/config.toml`.

use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::configuration::parse_config_content;
use crate::domain::{AppConfig, AppError};

pub const CONFIG_FILE: &str = "config.toml";

/// Directory holding `config.toml` and the optional home `.env`.
pub fn config_dir() -> Result<PathBuf, AppError> {
    let home = std::env::var("HOME")
        .map_err(|_| AppError::config_error("HOME environment variable not set"))?;
    Ok(PathBuf::from(home).join(".initiatep"))
}

/// Load the configuration from the home config directory.
pub fn load_config() -> Result<AppConfig, AppError> {
    load_config_from(&config_dir()?)
}

/// Load `config.toml` from `dir`, falling back to defaults when absent.
pub fn load_config_from(dir: &Path) -> Result<AppConfig, AppError> {
    let path = dir.join(CONFIG_FILE);
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        return Ok(AppConfig::default());
    }

    let content = fs::read_to_string(&path)?;
    parse_config_content(&content)
}
