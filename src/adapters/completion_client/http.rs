//! Chat completions client implementation using reqwest.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::domain::{ApiConfig, AppError};
use crate::ports::{CompletionClient, CompletionRequest, CompletionResponse};

pub const API_KEY_ENV: &str = "GROQ_API_KEY";
const DEFAULT_STATUS_MESSAGE: &str = "Completion request failed";

/// HTTP transport for an OpenAI-compatible chat completions endpoint.
///
/// This client performs a single request per call. Retry behavior is implemented
/// by a dedicated retry wrapper adapter.
#[derive(Clone)]
pub struct HttpCompletionClient {
    api_key: String,
    api_url: Url,
    client: Client,
}

impl std::fmt::Debug for HttpCompletionClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpCompletionClient")
            .field("api_url", &self.api_url)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

impl HttpCompletionClient {
    /// Create a new HTTP client with the given API key and configuration.
    pub fn new(api_key: String, config: &ApiConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::remote(format!("Failed to create HTTP client: {}", e), None))?;

        Ok(Self { api_key, api_url: config.api_url.clone(), client })
    }

    fn send_request(&self, request: &ApiRequest) -> Result<CompletionResponse, AppError> {
        let response = self
            .client
            .post(self.api_url.clone())
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
            .header(CONTENT_TYPE, "application/json")
            .json(request)
            .send()
            .map_err(|e| {
                let message = if e.is_timeout() {
                    format!("Request timed out: {}", e)
                } else {
                    format!("HTTP request failed: {}", e)
                };
                AppError::remote(message, None)
            })?;

        let status = response.status();
        let body_text = response.text().unwrap_or_default();

        if status.is_success() {
            let api_response: ApiResponse = serde_json::from_str(&body_text).map_err(|e| {
                AppError::remote(format!("Failed to parse response: {}", e), Some(status.as_u16()))
            })?;

            let text = api_response
                .choices
                .into_iter()
                .next()
                .and_then(|choice| choice.message.content)
                .filter(|content| !content.trim().is_empty())
                .ok_or_else(|| {
                    AppError::remote("Empty completion in response", Some(status.as_u16()))
                })?;

            return Ok(CompletionResponse { text });
        }

        let message = extract_error_message(&body_text).unwrap_or_else(|| {
            if !body_text.trim().is_empty() {
                body_text.clone()
            } else if status.as_u16() == 429 {
                "Rate limited".to_string()
            } else if status.is_server_error() {
                "Server error".to_string()
            } else {
                DEFAULT_STATUS_MESSAGE.to_string()
            }
        });

        Err(AppError::remote(message, Some(status.as_u16())))
    }
}

#[derive(Debug, Serialize)]
struct ApiRequest {
    model: String,
    messages: Vec<ApiMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize, Deserialize)]
struct ApiMessage {
    role: String,
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    choices: Vec<ApiChoice>,
}

#[derive(Debug, Deserialize)]
struct ApiChoice {
    message: ApiMessage,
}

fn extract_error_message(body: &str) -> Option<String> {
    if body.trim().is_empty() {
        return None;
    }

    let parsed = serde_json::from_str::<serde_json::Value>(body).ok()?;

    if let Some(msg) = parsed
        .get("error")
        .and_then(|error| error.get("message"))
        .and_then(|message| message.as_str())
    {
        return Some(msg.to_string());
    }

    parsed.get("message").and_then(|message| message.as_str()).map(ToOwned::to_owned)
}

impl CompletionClient for HttpCompletionClient {
    fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AppError> {
        let api_request = ApiRequest {
            model: request.model,
            messages: vec![
                ApiMessage { role: "system".to_string(), content: Some(request.system) },
                ApiMessage { role: "user".to_string(), content: Some(request.prompt) },
            ],
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        self.send_request(&api_request)
    }
}
