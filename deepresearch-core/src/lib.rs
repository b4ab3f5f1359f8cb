//! # Deep Research Core
//!
//! Core library for the Deep Research agent.
//! Provides the model interface (brain), the Ollama provider, web search,
//! response parsing, structure rendering, the research pipeline and the
//! HTML report generator.

pub mod brain;
pub mod config;
pub mod error;
pub mod parser;
pub mod providers;
pub mod render;
pub mod research;
pub mod search;
pub mod types;

// Re-export commonly used types at the crate root.
pub use brain::{Brain, GenerationRequest, LlmProvider, MockLlmProvider};
pub use config::{
    LlmConfig, ModelPreset, ReportConfig, ResearchConfig, SearchConfig, SearchDepth, load_config,
};
pub use error::{ConfigError, LlmError, ReportError, ResearchError, SearchError};
pub use parser::{ParsedResponse, Payload, PayloadKind, PayloadShape};
pub use research::{
    NoOpResearchCallback, ReportGenerator, ResearchCallback, ResearchEngine, ResearchPhase,
};
pub use search::{MockSearchBackend, SearchBackend, SearchOptions, SearchRequest, TavilyClient};
pub use types::{DocumentRecord, ResearchOutcome, SearchPlan, SearchResultSet};
