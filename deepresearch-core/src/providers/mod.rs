//! Generation backend implementations.
//!
//! Use `create_provider()` to instantiate the backend described by config.

pub mod ollama;

use crate::brain::LlmProvider;
use crate::config::LlmConfig;
use std::sync::Arc;
use tracing::{info, warn};

pub use ollama::OllamaProvider;

/// Create the generation backend for the given configuration.
pub fn create_provider(config: &LlmConfig) -> Arc<dyn LlmProvider> {
    for warning in config.validate() {
        warn!("LLM config: {}", warning);
    }
    info!(model = %config.model, url = %config.base_url, "Using Ollama generation backend");
    Arc::new(OllamaProvider::new(config))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_provider_uses_configured_model() {
        let config = LlmConfig {
            model: "gpt-oss:120b-cloud".to_string(),
            ..LlmConfig::default()
        };
        let provider = create_provider(&config);
        assert_eq!(provider.model_name(), "gpt-oss:120b-cloud");
    }
}
