//! Tool configuration loaded from `~/.initiatep/config.toml`.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::domain::AppError;

/// Top-level configuration. Every section falls back to its defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Completion API settings.
    #[serde(default)]
    pub api: ApiConfig,
    /// Batching and pacing of a generation run.
    #[serde(default)]
    pub generation: GenerationConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), AppError> {
        self.api.validate()?;
        self.generation.validate()?;
        Ok(())
    }
}

/// Chat completions endpoint configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApiConfig {
    /// Chat completions endpoint URL.
    #[serde(default = "default_api_url")]
    pub api_url: Url,
    /// Model identifier sent with every request.
    #[serde(default = "default_model")]
    pub model: String,
    /// Sampling temperature.
    #[serde(default)]
    pub temperature: f32,
    /// Completion token limit per request.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Total attempts per request, including the first.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Fixed delay between attempts in milliseconds.
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            model: default_model(),
            temperature: 0.0,
            max_tokens: default_max_tokens(),
            timeout_secs: default_timeout(),
            max_attempts: default_max_attempts(),
            retry_delay_ms: default_retry_delay_ms(),
        }
    }
}

impl ApiConfig {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.model.trim().is_empty() {
            return Err(AppError::InvalidConfig("model must not be empty".to_string()));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(AppError::InvalidConfig(
                "temperature must be between 0.0 and 2.0".to_string(),
            ));
        }
        if self.max_tokens == 0 {
            return Err(AppError::InvalidConfig("max_tokens must be greater than 0".to_string()));
        }
        if self.timeout_secs == 0 {
            return Err(AppError::InvalidConfig("timeout_secs must be greater than 0".to_string()));
        }
        if self.max_attempts == 0 {
            return Err(AppError::InvalidConfig("max_attempts must be greater than 0".to_string()));
        }
        Ok(())
    }
}

fn default_api_url() -> Url {
    Url::parse("https://api.groq.com/openai/v1/chat/completions")
        .expect("Default API URL must be valid")
}

fn default_model() -> String {
    "llama-3.3-70b-versatile".to_string()
}

fn default_max_tokens() -> u32 {
    2048
}

fn default_timeout() -> u64 {
    30
}

fn default_max_attempts() -> u32 {
    2
}

fn default_retry_delay_ms() -> u64 {
    2000
}

/// Generation run configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GenerationConfig {
    /// Expected files requested per remote call.
    #[serde(default = "default_files_per_request")]
    pub files_per_request: usize,
    /// Pause between features in milliseconds.
    #[serde(default = "default_feature_delay_ms")]
    pub feature_delay_ms: u64,
    /// Re-request a batch once when its files have unbalanced brackets.
    #[serde(default = "default_true")]
    pub retry_malformed: bool,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            files_per_request: default_files_per_request(),
            feature_delay_ms: default_feature_delay_ms(),
            retry_malformed: default_true(),
        }
    }
}

impl GenerationConfig {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.files_per_request == 0 {
            return Err(AppError::InvalidConfig(
                "files_per_request must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

fn default_files_per_request() -> usize {
    2
}

fn default_feature_delay_ms() -> u64 {
    3000
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_config_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.api.api_url.as_str(), "https://api.groq.com/openai/v1/chat/completions");
        assert_eq!(config.api.model, "llama-3.3-70b-versatile");
        assert_eq!(config.api.temperature, 0.0);
        assert_eq!(config.api.max_attempts, 2);
        assert_eq!(config.generation.files_per_request, 2);
        assert_eq!(config.generation.feature_delay_ms, 3000);
        assert!(config.generation.retry_malformed);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_api_config_invalid_timeout() {
        let config = ApiConfig { timeout_secs: 0, ..Default::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_api_config_invalid_attempts() {
        let config = ApiConfig { max_attempts: 0, ..Default::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_api_config_temperature_range() {
        let config = ApiConfig { temperature: 2.5, ..Default::default() };
        assert!(matches!(config.validate(), Err(AppError::InvalidConfig(_))));

        let config = ApiConfig { temperature: 1.0, ..Default::default() };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_generation_config_zero_batch() {
        let config = GenerationConfig { files_per_request: 0, ..Default::default() };
        assert!(config.validate().is_err());
    }
}
