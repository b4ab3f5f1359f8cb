//! Web-search backend abstraction.
//!
//! A [`SearchBackend`] takes a fully resolved [`SearchRequest`] and returns the
//! backend's JSON response untouched. Defaults come from
//! [`SearchConfig`](crate::config::SearchConfig); [`SearchOptions`] overrides
//! them for a single run without touching the shared config.

pub mod tavily;

use crate::config::{SearchConfig, SearchDepth};
use crate::error::SearchError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::Mutex;

pub use tavily::TavilyClient;

/// Per-call overrides. `None` keeps the configured default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchOptions {
    pub search_depth: Option<SearchDepth>,
    pub max_results: Option<u32>,
    pub include_domains: Option<Vec<String>>,
    pub exclude_domains: Option<Vec<String>>,
    pub include_answer: Option<bool>,
    pub include_raw_content: Option<bool>,
    pub include_images: Option<bool>,
}

impl SearchOptions {
    pub fn with_depth(mut self, depth: SearchDepth) -> Self {
        self.search_depth = Some(depth);
        self
    }

    pub fn with_max_results(mut self, max_results: u32) -> Self {
        self.max_results = Some(max_results);
        self
    }
}

/// The request body sent to the search backend.
///
/// Empty domain filters are left out of the serialized body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchRequest {
    pub query: String,
    pub search_depth: SearchDepth,
    pub max_results: u32,
    pub include_answer: bool,
    pub include_raw_content: bool,
    pub include_images: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub include_domains: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub exclude_domains: Vec<String>,
}

impl SearchRequest {
    /// Merge per-call options over the configured defaults.
    pub fn resolve(query: &str, defaults: &SearchConfig, options: &SearchOptions) -> Self {
        Self {
            query: query.to_string(),
            search_depth: options.search_depth.unwrap_or(defaults.search_depth),
            max_results: options.max_results.unwrap_or(defaults.max_results),
            include_answer: options.include_answer.unwrap_or(defaults.include_answer),
            include_raw_content: options
                .include_raw_content
                .unwrap_or(defaults.include_raw_content),
            include_images: options.include_images.unwrap_or(defaults.include_images),
            include_domains: options
                .include_domains
                .clone()
                .unwrap_or_else(|| defaults.include_domains.clone()),
            exclude_domains: options
                .exclude_domains
                .clone()
                .unwrap_or_else(|| defaults.exclude_domains.clone()),
        }
    }
}

/// Trait for web-search backends.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Run one search and return the backend's response body.
    async fn search(&self, request: &SearchRequest) -> Result<Value, SearchError>;
}

/// A scripted search backend for tests.
///
/// Responds per query; unknown queries get an empty `results` list.
#[derive(Default)]
pub struct MockSearchBackend {
    responses: Mutex<HashMap<String, Result<Value, String>>>,
    requests: Mutex<Vec<SearchRequest>>,
}

impl MockSearchBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Respond to `query` with the given body.
    pub fn respond(&self, query: impl Into<String>, body: Value) {
        self.responses.lock().unwrap().insert(query.into(), Ok(body));
    }

    /// Respond to `query` with one document per `(title, url, content)` triple.
    pub fn respond_with_documents(&self, query: impl Into<String>, docs: &[(&str, &str, &str)]) {
        let results: Vec<Value> = docs
            .iter()
            .map(|(title, url, content)| json!({"title": title, "url": url, "content": content}))
            .collect();
        self.respond(query, json!({ "results": results }));
    }

    /// Make `query` fail at the transport level.
    pub fn fail(&self, query: impl Into<String>, message: impl Into<String>) {
        self.responses
            .lock()
            .unwrap()
            .insert(query.into(), Err(message.into()));
    }

    /// Requests received so far, in call order.
    pub fn requests(&self) -> Vec<SearchRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl SearchBackend for MockSearchBackend {
    async fn search(&self, request: &SearchRequest) -> Result<Value, SearchError> {
        self.requests.lock().unwrap().push(request.clone());
        match self.responses.lock().unwrap().get(&request.query) {
            Some(Ok(body)) => Ok(body.clone()),
            Some(Err(message)) => Err(SearchError::ApiRequest {
                message: message.clone(),
            }),
            None => Ok(json!({ "results": [] })),
        }
    }
}
