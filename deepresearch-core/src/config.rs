//! Configuration system for the research agent.
//!
//! Uses `figment` for layered configuration: defaults -> config file -> environment -> overrides.
//! Configuration is loaded from `~/.config/deepresearch/config.toml` and/or
//! `.deepresearch/config.toml` in the workspace directory.
//!
//! Every component receives its slice of [`ResearchConfig`] at construction.
//! Per-call changes go through [`SearchOptions`](crate::search::SearchOptions)
//! and never mutate the shared values.

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration for the research agent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResearchConfig {
    pub llm: LlmConfig,
    pub search: SearchConfig,
    pub report: ReportConfig,
}

/// Settings for the text-generation backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Model identifier (e.g., "deepseek-r1:8b").
    pub model: String,
    /// Generate endpoint of the backend.
    pub base_url: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Context window requested from the backend (`num_ctx`).
    pub context_window: usize,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: ModelPreset::DeepseekCloud.model_name().to_string(),
            base_url: "http://localhost:11434/api/generate".to_string(),
            temperature: 0.6,
            context_window: 8192,
        }
    }
}

impl LlmConfig {
    /// Validate this LLM config and return any warnings.
    ///
    /// Returns an empty Vec if the config is valid. Problems are reported as
    /// human-readable warnings rather than errors.
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if self.model.trim().is_empty() {
            warnings.push("model is empty; the backend will reject every request".to_string());
        }
        if self.temperature < 0.0 || self.temperature > 2.0 {
            warnings.push(format!(
                "temperature ({}) is outside the typical range 0.0-2.0",
                self.temperature
            ));
        }
        if self.context_window < 1024 {
            warnings.push(format!(
                "context_window ({}) is too small to hold the search context",
                self.context_window
            ));
        }
        warnings
    }
}

/// Named model choices exposed on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModelPreset {
    /// A small reasoning model served by the local backend.
    Local,
    /// DeepSeek served through the backend's cloud offload.
    DeepseekCloud,
    /// GPT-OSS served through the backend's cloud offload.
    GptCloud,
}

impl ModelPreset {
    /// The model identifier sent to the backend.
    pub fn model_name(self) -> &'static str {
        match self {
            ModelPreset::Local => "deepseek-r1:8b",
            ModelPreset::DeepseekCloud => "deepseek-v3.1:671b-cloud",
            ModelPreset::GptCloud => "gpt-oss:120b-cloud",
        }
    }
}

impl std::str::FromStr for ModelPreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "local" => Ok(ModelPreset::Local),
            "deepseek-cloud" => Ok(ModelPreset::DeepseekCloud),
            "gpt-cloud" => Ok(ModelPreset::GptCloud),
            other => Err(format!(
                "unknown model preset '{other}' (expected local, deepseek-cloud or gpt-cloud)"
            )),
        }
    }
}

/// How thoroughly the search backend should search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchDepth {
    Basic,
    #[default]
    Advanced,
}

impl std::fmt::Display for SearchDepth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchDepth::Basic => write!(f, "basic"),
            SearchDepth::Advanced => write!(f, "advanced"),
        }
    }
}

/// Defaults for the search backend; each field can be overridden per call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Environment variable name containing the API key.
    pub api_key_env: String,
    /// Search endpoint.
    pub base_url: String,
    pub search_depth: SearchDepth,
    pub max_results: u32,
    #[serde(default)]
    pub include_domains: Vec<String>,
    #[serde(default)]
    pub exclude_domains: Vec<String>,
    pub include_answer: bool,
    pub include_raw_content: bool,
    pub include_images: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            api_key_env: "TAVILY_API_KEY".to_string(),
            base_url: "https://api.tavily.com/search".to_string(),
            search_depth: SearchDepth::Advanced,
            max_results: 10,
            include_domains: Vec::new(),
            exclude_domains: Vec::new(),
            include_answer: true,
            include_raw_content: false,
            include_images: false,
        }
    }
}

/// Where and how the HTML report is written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Directory receiving report files; created on demand.
    pub output_dir: PathBuf,
    /// File name prefix, followed by a `YYYYMMDD_HHMMSS` timestamp.
    pub file_prefix: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("results"),
            file_prefix: "research_report_".to_string(),
        }
    }
}

/// Load configuration by merging multiple sources.
///
/// Priority (highest to lowest):
/// 1. Explicit overrides (passed as argument)
/// 2. Environment variables (prefixed with `DEEPRESEARCH_`)
/// 3. Workspace-local config (`.deepresearch/config.toml`)
/// 4. User config (`~/.config/deepresearch/config.toml`)
/// 5. Built-in defaults
///
/// A malformed file or environment value is a [`ConfigError::ParseError`].
pub fn load_config(
    workspace: Option<&Path>,
    overrides: Option<&ResearchConfig>,
) -> Result<ResearchConfig, ConfigError> {
    let mut figment = Figment::from(Serialized::defaults(ResearchConfig::default()));

    if let Some(config_dir) = directories::ProjectDirs::from("dev", "deepresearch", "deepresearch")
    {
        let user_config = config_dir.config_dir().join("config.toml");
        if user_config.exists() {
            figment = figment.merge(Toml::file(&user_config));
        }
    }

    if let Some(ws) = workspace {
        let ws_config = ws.join(".deepresearch").join("config.toml");
        if ws_config.exists() {
            figment = figment.merge(Toml::file(&ws_config));
        }
    }

    // DEEPRESEARCH_LLM__MODEL, DEEPRESEARCH_SEARCH__MAX_RESULTS, etc.
    figment = figment.merge(Env::prefixed("DEEPRESEARCH_").split("__"));

    if let Some(overrides) = overrides {
        figment = figment.merge(Serialized::defaults(overrides));
    }

    figment.extract().map_err(|e| ConfigError::ParseError {
        message: e.to_string(),
    })
}
