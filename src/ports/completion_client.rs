//! Completion API port definition.

use crate::domain::AppError;

/// One chat completion request.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// Model identifier.
    pub model: String,
    /// System message.
    pub system: String,
    /// User message carrying the rendered batch prompt.
    pub prompt: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Raw completion text as returned by the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionResponse {
    pub text: String,
}

/// Port for text generation.
///
/// Implementations fail with `AppError::RemoteCall` on transport errors,
/// timeouts, non-success statuses, and empty completions.
pub trait CompletionClient {
    fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AppError>;
}
