//! Error types for the research core.
//!
//! Uses `thiserror` for public API error types with structured error variants
//! covering the generation backend, the search backend, configuration and
//! report persistence.
//!
//! Backend errors never escape the pipeline: `Brain` and `SearchExecutor`
//! turn them into in-band values. Only configuration, credential and report
//! errors reach the caller.

use std::path::PathBuf;

/// Errors a caller can see when setting up or finishing a research run.
#[derive(Debug, thiserror::Error)]
pub enum ResearchError {
    #[error("Search error: {0}")]
    Search(#[from] SearchError),

    #[error("Report error: {0}")]
    Report(#[from] ReportError),
}

/// Errors from the text-generation backend.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("API request failed: {message}")]
    ApiRequest { message: String },

    #[error("API response parse error: {message}")]
    ResponseParse { message: String },

    #[error("Provider connection failed: {message}")]
    Connection { message: String },
}

/// Errors from the web-search backend.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("{var} not found in environment variables")]
    MissingApiKey { var: String },

    #[error("Search request failed: {message}")]
    ApiRequest { message: String },

    #[error("Search response parse error: {message}")]
    ResponseParse { message: String },
}

/// Errors from the configuration system.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration parse error: {message}")]
    ParseError { message: String },
}

/// Errors from rendering or persisting the HTML report.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("Template render failed: {message}")]
    Template { message: String },

    #[error("Failed to create output directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write report {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
