//! Brain module: text-generation backend abstraction.
//!
//! Defines the `LlmProvider` trait for model-agnostic generation and the
//! `Brain` wrapper the pipeline talks to. Providers report failures as
//! `LlmError`; `Brain` turns them into an `"Error: <detail>"` response so a
//! broken backend degrades the run instead of aborting it.

use crate::error::LlmError;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

/// A single non-streaming generation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    /// The user prompt.
    pub prompt: String,
    /// Optional system prompt.
    pub system: Option<String>,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            system: None,
        }
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }
}

/// Trait for text-generation backends.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Generate one complete response for the request.
    async fn generate(&self, request: &GenerationRequest) -> Result<String, LlmError>;

    /// Return the model name.
    fn model_name(&self) -> &str;
}

/// The pipeline's handle on a generation backend.
#[derive(Clone)]
pub struct Brain {
    provider: Arc<dyn LlmProvider>,
}

impl Brain {
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self { provider }
    }

    pub fn model_name(&self) -> &str {
        self.provider.model_name()
    }

    /// Generate a response. Backend failures come back as `"Error: <detail>"` text.
    pub async fn generate(&self, request: GenerationRequest) -> String {
        debug!(
            model = %self.provider.model_name(),
            prompt_len = request.prompt.len(),
            has_system = request.system.is_some(),
            "Sending generation request"
        );
        match self.provider.generate(&request).await {
            Ok(text) => text,
            Err(e) => {
                warn!(model = %self.provider.model_name(), error = %e, "Generation failed");
                format!("Error: {e}")
            }
        }
    }
}

/// A scripted provider for tests.
///
/// Returns queued responses in order and records every request it receives.
pub struct MockLlmProvider {
    model: String,
    responses: Mutex<VecDeque<Result<String, String>>>,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl MockLlmProvider {
    pub fn new() -> Self {
        Self {
            model: "mock-model".to_string(),
            responses: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Create a MockLlmProvider with the given responses queued.
    pub fn with_responses<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let provider = Self::new();
        for response in responses {
            provider.queue_response(response);
        }
        provider
    }

    /// Queue a response to be returned by the next `generate` call.
    pub fn queue_response(&self, text: impl Into<String>) {
        self.responses.lock().unwrap().push_back(Ok(text.into()));
    }

    /// Queue a transport failure for the next `generate` call.
    pub fn queue_error(&self, message: impl Into<String>) {
        self.responses.lock().unwrap().push_back(Err(message.into()));
    }

    /// Requests received so far.
    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

impl Default for MockLlmProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LlmProvider for MockLlmProvider {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, LlmError> {
        self.requests.lock().unwrap().push(request.clone());
        match self.responses.lock().unwrap().pop_front() {
            Some(Ok(text)) => Ok(text),
            Some(Err(message)) => Err(LlmError::Connection { message }),
            None => Ok("I'm a mock LLM. No queued responses available.".to_string()),
        }
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
