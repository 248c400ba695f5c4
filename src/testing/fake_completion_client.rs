use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::domain::AppError;
use crate::ports::{CompletionClient, CompletionRequest, CompletionResponse};

/// Completion client replaying scripted responses in order.
///
/// Clones share state, so a test can keep a handle after boxing the client.
#[derive(Clone, Default)]
pub struct SequenceClient {
    responses: Arc<Mutex<VecDeque<Result<String, AppError>>>>,
    requests: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl SequenceClient {
    pub fn new(responses: Vec<Result<String, AppError>>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses.into())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl CompletionClient for SequenceClient {
    fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AppError> {
        self.requests.lock().unwrap().push(request);
        match self.responses.lock().unwrap().pop_front() {
            Some(Ok(text)) => Ok(CompletionResponse { text }),
            Some(Err(err)) => Err(err),
            None => Err(AppError::remote("test: unexpected extra call", Some(500))),
        }
    }
}
