//! Ollama generate-API provider.
//!
//! Talks to `POST /api/generate` with `stream: false` and reads the single
//! `response` field of the reply. Cloud-offloaded models (`*-cloud`) go
//! through the same local endpoint.

use crate::brain::{GenerationRequest, LlmProvider};
use crate::config::LlmConfig;
use crate::error::LlmError;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};
use tracing::debug;

/// Generation backend served by Ollama.
pub struct OllamaProvider {
    client: Client,
    base_url: String,
    model: String,
    temperature: f32,
    context_window: usize,
}

impl OllamaProvider {
    /// Create a new provider from configuration.
    pub fn new(config: &LlmConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.base_url.clone(),
            model: config.model.clone(),
            temperature: config.temperature,
            context_window: config.context_window,
        }
    }

    /// Build the JSON body for a generate call.
    fn build_body(&self, request: &GenerationRequest) -> Value {
        let mut body = json!({
            "model": self.model,
            "prompt": request.prompt,
            "stream": false,
            "options": {
                "temperature": self.temperature,
                "num_ctx": self.context_window,
            },
        });
        if let Some(system) = &request.system {
            body["system"] = json!(system);
        }
        body
    }

    /// Extract the generated text. A body without `response` yields an empty string.
    fn parse_response(json: &Value) -> String {
        json.get("response")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    }

    fn map_http_error(status: reqwest::StatusCode, body: &str) -> LlmError {
        match status.as_u16() {
            404 => LlmError::ApiRequest {
                message: format!("Model or endpoint not found (404): {}", body),
            },
            status if status >= 500 => LlmError::ApiRequest {
                message: format!("Server error ({}): {}", status, body),
            },
            _ => LlmError::ApiRequest {
                message: format!("HTTP {}: {}", status, body),
            },
        }
    }
}

#[async_trait]
impl LlmProvider for OllamaProvider {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, LlmError> {
        let body = self.build_body(request);

        debug!(url = %self.base_url, model = %self.model, "Sending Ollama generate request");

        let response = self
            .client
            .post(&self.base_url)
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Connection {
                message: format!("Request failed: {}", e),
            })?;

        let status = response.status();
        let response_body = response.text().await.map_err(|e| LlmError::ApiRequest {
            message: format!("Failed to read response body: {}", e),
        })?;

        if !status.is_success() {
            return Err(Self::map_http_error(status, &response_body));
        }

        let json: Value =
            serde_json::from_str(&response_body).map_err(|e| LlmError::ResponseParse {
                message: format!("Invalid JSON: {}", e),
            })?;

        Ok(Self::parse_response(&json))
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
