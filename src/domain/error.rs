use std::io;

use thiserror::Error;

/// Library-wide error type for initiatep operations.
#[derive(Debug, Error)]
pub enum AppError {
    /// Underlying I/O failure.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// Configuration or environment issue.
    #[error("{0}")]
    Configuration(String),

    /// Configuration values failed validation.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Required environment variable is not set.
    #[error("Environment variable '{0}' is not set")]
    EnvironmentVariableMissing(String),

    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Language identifier is not supported.
    #[error("Unsupported language '{0}': must be one of django, nextjs, nestjs")]
    InvalidLanguage(String),

    /// Project name is invalid.
    #[error(
        "Invalid project name '{0}': must be alphanumeric with hyphens or underscores and start with a letter"
    )]
    InvalidProjectName(String),

    /// Feature key is invalid.
    #[error("Invalid feature key '{0}': must be alphanumeric with hyphens or underscores")]
    InvalidFeatureKey(String),

    /// Feature is not part of the language catalog.
    #[error("Feature '{feature}' not found for {language}. Available: {available}")]
    UnknownFeature { language: String, feature: String, available: String },

    /// Embedded catalog asset is missing or malformed.
    #[error("Catalog error for {language}: {reason}")]
    Catalog { language: String, reason: String },

    /// Path escapes the project root.
    #[error("Path traversal detected: {0}")]
    PathTraversal(String),

    /// Project directory already exists.
    #[error("Project directory '{0}' already exists (use --force to write into it)")]
    ProjectExists(String),

    /// Prompt template could not be rendered.
    #[error("Prompt template '{template}' failed: {reason}")]
    TemplateRender { template: String, reason: String },

    /// Remote completion call failed (transport, timeout, non-2xx, empty body).
    #[error("Remote call failed{}: {message}", status_suffix(.status))]
    RemoteCall { message: String, status: Option<u16> },

    /// Response text contained no delimited file blocks.
    #[error("Malformed response for '{feature}': {reason}")]
    MalformedResponse { feature: String, reason: String },

    /// Interactive prompt failed.
    #[error("Prompt failed: {0}")]
    Interaction(String),
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|code| format!(" (status {})", code)).unwrap_or_default()
}

impl AppError {
    pub fn config_error<S: Into<String>>(message: S) -> Self {
        AppError::Configuration(message.into())
    }

    pub fn remote<S: Into<String>>(message: S, status: Option<u16>) -> Self {
        AppError::RemoteCall { message: message.into(), status }
    }

    /// True for failures the orchestrator may retry.
    pub fn is_remote_call(&self) -> bool {
        matches!(self, AppError::RemoteCall { .. })
    }
}
