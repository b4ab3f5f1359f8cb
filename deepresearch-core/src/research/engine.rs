//! Research engine: drives plan, search and synthesis for one query.

use super::callback::{ResearchCallback, ResearchPhase};
use super::executor::SearchExecutor;
use super::planner::Planner;
use super::synthesis::Synthesizer;
use crate::brain::Brain;
use crate::config::SearchConfig;
use crate::search::{SearchBackend, SearchOptions};
use crate::types::ResearchOutcome;
use std::sync::Arc;
use tracing::{info, warn};

/// Final answer returned when planning produced no usable queries.
pub const EMPTY_PLAN_ANSWER: &str = "Failed to generate search queries.";

/// Orchestrates one research run.
pub struct ResearchEngine {
    planner: Planner,
    executor: SearchExecutor,
    synthesizer: Synthesizer,
}

impl ResearchEngine {
    /// Create an engine. Planning and synthesis share one brain.
    pub fn new(brain: Brain, backend: Arc<dyn SearchBackend>, search: SearchConfig) -> Self {
        Self {
            planner: Planner::new(brain.clone()),
            executor: SearchExecutor::new(backend, search),
            synthesizer: Synthesizer::new(brain),
        }
    }

    /// Run the full pipeline for a user query.
    ///
    /// An empty plan short-circuits: no searches and no synthesis call are
    /// made, and the outcome carries [`EMPTY_PLAN_ANSWER`]. Backend failures
    /// never abort the run; they surface as error text in the answer or as
    /// error-tagged result sets.
    pub async fn run(
        &self,
        user_query: &str,
        options: &SearchOptions,
        callback: &dyn ResearchCallback,
    ) -> ResearchOutcome {
        info!(query = %user_query, "Starting research");

        callback.on_phase_change(ResearchPhase::Planning, 0.0);
        let plan = self.planner.plan(user_query, callback).await;

        if plan.is_empty() {
            warn!("Research plan is empty, skipping search and synthesis");
            callback.on_phase_change(ResearchPhase::Failed, 1.0);
            return ResearchOutcome {
                query: user_query.to_string(),
                search_results: Vec::new(),
                final_answer: EMPTY_PLAN_ANSWER.to_string(),
            };
        }

        callback.on_phase_change(ResearchPhase::Searching, 0.25);
        let search_results = self.executor.execute(&plan, options, callback).await;

        callback.on_phase_change(ResearchPhase::Synthesizing, 0.75);
        let final_answer = self
            .synthesizer
            .synthesize(user_query, &search_results)
            .await;

        callback.on_phase_change(ResearchPhase::Complete, 1.0);
        info!(result_sets = search_results.len(), "Research complete");

        ResearchOutcome {
            query: user_query.to_string(),
            search_results,
            final_answer,
        }
    }
}
