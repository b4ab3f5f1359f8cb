//! Research synthesis: asks the model for the final answer.
//!
//! The aggregated search results are flattened into one numbered context
//! block. The model's reply is returned untouched; stripping reasoning and
//! detecting structure is left to the report renderer.

use crate::brain::{Brain, GenerationRequest};
use crate::types::SearchResultSet;
use tracing::info;

/// System prompt for the synthesis call.
pub const SYNTHESIS_SYSTEM_PROMPT: &str = "You are a Deep Research Agent. \
You have performed a search to answer the user's query. \
Synthesize the information from the provided search results into a comprehensive, well-structured answer. \
Use the <think> block to structure your response and verify the information before writing the final answer. \
Cite your sources where appropriate.";

const MISSING: &str = "N/A";

/// Produces the final answer from search results.
pub struct Synthesizer {
    brain: Brain,
}

impl Synthesizer {
    pub fn new(brain: Brain) -> Self {
        Self { brain }
    }

    /// Flatten result sets into the context block shown to the model.
    ///
    /// Sources are numbered per result set; documents keep backend order.
    pub fn build_context(result_sets: &[SearchResultSet]) -> String {
        let mut context = String::new();
        for (i, set) in result_sets.iter().enumerate() {
            context.push_str(&format!("Source {}:\n", i + 1));
            for doc in set.documents() {
                context.push_str(&format!(
                    "- Title: {}\n  Content: {}\n  URL: {}\n",
                    doc.title.as_deref().unwrap_or(MISSING),
                    doc.content.as_deref().unwrap_or(MISSING),
                    doc.url.as_deref().unwrap_or(MISSING),
                ));
            }
            context.push('\n');
        }
        context
    }

    /// Build the synthesis request.
    pub fn request(user_query: &str, result_sets: &[SearchResultSet]) -> GenerationRequest {
        let context = Self::build_context(result_sets);
        GenerationRequest::new(format!(
            "User Query: {user_query}\n\nSearch Results:\n{context}\n\nProvide the final answer."
        ))
        .with_system(SYNTHESIS_SYSTEM_PROMPT)
    }

    /// Ask the backend for the final answer and return its raw text.
    pub async fn synthesize(&self, user_query: &str, result_sets: &[SearchResultSet]) -> String {
        info!(sources = result_sets.len(), "Synthesizing answer");
        self.brain
            .generate(Self::request(user_query, result_sets))
            .await
    }
}
