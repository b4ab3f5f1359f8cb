//! Research planning: turns a user query into a list of search queries.

use super::callback::{ResearchCallback, ResearchPhase};
use crate::brain::{Brain, GenerationRequest};
use crate::parser::{self, Payload, PayloadShape};
use crate::types::SearchPlan;
use tracing::{info, warn};

/// System prompt for the planning call.
pub const PLANNER_SYSTEM_PROMPT: &str = "You are a Deep Research Agent. \
Your goal is to create a comprehensive research plan for a given user query. \
You MUST first think about the problem in a <think> block, analyzing what information is missing and what needs to be searched. \
After thinking, you MUST output a list of search queries in a strict JSON format. \
The JSON should be a list of strings, e.g., [\"query 1\", \"query 2\"]. \
Do not output any text outside of the <think> block and the JSON block.";

/// Asks the generation backend for a search plan.
pub struct Planner {
    brain: Brain,
}

impl Planner {
    pub fn new(brain: Brain) -> Self {
        Self { brain }
    }

    /// Build the planning request for a user query.
    pub fn request(user_query: &str) -> GenerationRequest {
        GenerationRequest::new(format!(
            "User Query: {user_query}\n\nGenerate the research plan and search queries."
        ))
        .with_system(PLANNER_SYSTEM_PROMPT)
    }

    /// Produce a search plan. Any parse failure yields an empty plan.
    pub async fn plan(&self, user_query: &str, callback: &dyn ResearchCallback) -> SearchPlan {
        let response = self.brain.generate(Self::request(user_query)).await;
        Self::plan_from_response(&response, callback)
    }

    /// Decode a planning response. The reasoning span goes to the callback only.
    pub fn plan_from_response(response: &str, callback: &dyn ResearchCallback) -> SearchPlan {
        let parsed = parser::parse(response, PayloadShape::List);
        if let Some(reasoning) = &parsed.reasoning {
            callback.on_reasoning(ResearchPhase::Planning, reasoning);
        }

        match parsed.payload {
            Payload::List(items) => {
                let plan = SearchPlan::from_values(&items);
                if plan.is_empty() && !items.is_empty() {
                    warn!("Planning response contained non-string or empty queries");
                }
                info!(queries = plan.len(), "Research plan ready");
                plan
            }
            Payload::Markdown(_) => {
                warn!(raw = %response, "No JSON found in planning response");
                SearchPlan::empty()
            }
            Payload::None | Payload::Object(_) => {
                warn!(raw = %response, "Could not decode planning response");
                SearchPlan::empty()
            }
        }
    }
}
