//! `.env` loading and API key lookup.

use std::path::Path;

use crate::adapters::completion_client::API_KEY_ENV;
use crate::domain::AppError;

const DOTENV_FILE: &str = ".env";

/// Load `.env` from `cwd`, then from `config_dir`.
///
/// Variables already present in the environment are never overridden, so the
/// precedence is environment, then the working directory file, then the home file.
pub fn load_dotenv(cwd: &Path, config_dir: &Path) -> Result<(), AppError> {
    for dir in [cwd, config_dir] {
        let path = dir.join(DOTENV_FILE);
        if !path.is_file() {
            continue;
        }
        dotenvy::from_path(&path).map_err(|err| {
            AppError::config_error(format!("Failed to load {}: {}", path.display(), err))
        })?;
        tracing::debug!(path = %path.display(), "loaded dotenv file");
    }
    Ok(())
}

/// Read the completion API key from the environment.
pub fn api_key() -> Result<String, AppError> {
    match std::env::var(API_KEY_ENV) {
        Ok(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
        _ => Err(AppError::EnvironmentVariableMissing(API_KEY_ENV.to_string())),
    }
}
