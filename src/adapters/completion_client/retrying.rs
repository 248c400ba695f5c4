//! Retry wrapper for completion client operations.

use std::thread;
use std::time::Duration;

use crate::domain::{ApiConfig, AppError};
use crate::ports::{CompletionClient, CompletionRequest, CompletionResponse};

const MAX_LOG_ERROR_CHARS: usize = 512;

/// Fixed-delay retry policy. `max_attempts` counts the first call.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    max_attempts: u32,
    delay_ms: u64,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay_ms: u64) -> Self {
        Self { max_attempts: max_attempts.max(1), delay_ms }
    }

    pub fn from_config(config: &ApiConfig) -> Self {
        Self::new(config.max_attempts, config.retry_delay_ms)
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

pub struct RetryingCompletionClient {
    inner: Box<dyn CompletionClient>,
    policy: RetryPolicy,
}

impl RetryingCompletionClient {
    pub fn new(inner: Box<dyn CompletionClient>, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }
}

impl CompletionClient for RetryingCompletionClient {
    fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AppError> {
        let mut attempt = 1;
        loop {
            match self.inner.complete(request.clone()) {
                Ok(response) => return Ok(response),
                Err(error) => {
                    if !error.is_remote_call() || attempt >= self.policy.max_attempts {
                        return Err(error);
                    }

                    let delay = self.policy.delay();
                    tracing::warn!(
                        attempt,
                        max_attempts = self.policy.max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        "completion request failed: {}; retrying",
                        format_error_for_log(&error)
                    );
                    thread::sleep(delay);
                    attempt += 1;
                }
            }
        }
    }
}

fn format_error_for_log(error: &AppError) -> String {
    match error {
        AppError::RemoteCall { message, status } => {
            let sanitized = sanitize_and_truncate_for_log(message);
            match status {
                Some(code) => format!("RemoteCall(status={}): {}", code, sanitized),
                None => format!("RemoteCall: {}", sanitized),
            }
        }
        _ => sanitize_and_truncate_for_log(&error.to_string()),
    }
}

fn sanitize_and_truncate_for_log(input: &str) -> String {
    let output: String = input
        .chars()
        .take(MAX_LOG_ERROR_CHARS)
        .map(|ch| if ch.is_control() { ' ' } else { ch })
        .collect();

    let mut compact = output.split_whitespace().collect::<Vec<_>>().join(" ");
    if input.chars().count() > MAX_LOG_ERROR_CHARS {
        compact.push_str(" [truncated]");
    }
    compact
}
