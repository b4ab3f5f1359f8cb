//! Tavily search API client.

use super::{SearchBackend, SearchRequest};
use crate::config::SearchConfig;
use crate::error::SearchError;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

/// Search backend backed by the Tavily REST API.
pub struct TavilyClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl std::fmt::Debug for TavilyClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TavilyClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl TavilyClient {
    /// Create a client, reading the API key from the variable named in `config.api_key_env`.
    ///
    /// A missing or empty key is an error; callers treat it as fatal at startup.
    pub fn new(config: &SearchConfig) -> Result<Self, SearchError> {
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| SearchError::MissingApiKey {
                var: config.api_key_env.clone(),
            })?;
        Ok(Self::with_api_key(config, api_key))
    }

    /// Create a client with an explicitly provided API key.
    pub fn with_api_key(config: &SearchConfig, api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: config.base_url.clone(),
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl SearchBackend for TavilyClient {
    async fn search(&self, request: &SearchRequest) -> Result<Value, SearchError> {
        debug!(
            query = %request.query,
            depth = %request.search_depth,
            max_results = request.max_results,
            "Sending Tavily search request"
        );

        let response = self
            .client
            .post(&self.base_url)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| SearchError::ApiRequest {
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SearchError::ApiRequest {
                message: format!("status {}: {}", status, body),
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| SearchError::ResponseParse {
                message: e.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::SearchOptions;

    #[test]
    fn test_missing_api_key() {
        let config = SearchConfig {
            api_key_env: "DEEPRESEARCH_TEST_UNSET_TAVILY_KEY".to_string(),
            ..SearchConfig::default()
        };
        let err = TavilyClient::new(&config).unwrap_err();
        assert!(matches!(err, SearchError::MissingApiKey { ref var } if var == "DEEPRESEARCH_TEST_UNSET_TAVILY_KEY"));
    }

    #[test]
    fn test_debug_redacts_key() {
        let client = TavilyClient::with_api_key(&SearchConfig::default(), "tvly-secret");
        let debug = format!("{client:?}");
        assert!(!debug.contains("tvly-secret"));
        assert!(debug.contains("api.tavily.com"));
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_request_error() {
        let config = SearchConfig {
            base_url: "http://127.0.0.1:9/search".to_string(),
            ..SearchConfig::default()
        };
        let client = TavilyClient::with_api_key(&config, "tvly-test");
        let request = SearchRequest::resolve("q", &config, &SearchOptions::default());
        let err = client.search(&request).await.unwrap_err();
        assert!(matches!(err, SearchError::ApiRequest { .. }));
    }
}
