//! Deep Research pipeline.
//!
//! One run goes through three model-facing phases:
//! 1. **Plan**: ask the model for a JSON list of search queries
//! 2. **Search**: run each query against the search backend, in order
//! 3. **Synthesize**: ask the model for a final answer over all results
//!
//! The outcome is then rendered to a standalone HTML report by
//! [`ReportGenerator`].

pub mod callback;
pub mod engine;
pub mod executor;
pub mod output;
pub mod planner;
pub mod synthesis;

pub use callback::{NoOpResearchCallback, RecordingCallback, ResearchCallback, ResearchPhase};
pub use engine::{EMPTY_PLAN_ANSWER, ResearchEngine};
pub use executor::SearchExecutor;
pub use output::ReportGenerator;
pub use planner::Planner;
pub use synthesis::Synthesizer;
