//! Progress reporting for research runs.

use serde::{Deserialize, Serialize};
use std::sync::Mutex;

/// Current phase of a research run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ResearchPhase {
    /// Asking the model for search queries.
    Planning,
    /// Running planned queries against the search backend.
    Searching,
    /// Asking the model for the final answer.
    Synthesizing,
    /// Run finished with an answer.
    Complete,
    /// Run short-circuited because planning produced no queries.
    Failed,
}

impl std::fmt::Display for ResearchPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ResearchPhase::Planning => "planning",
            ResearchPhase::Searching => "searching",
            ResearchPhase::Synthesizing => "synthesizing",
            ResearchPhase::Complete => "complete",
            ResearchPhase::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Callback trait for progressive research UI updates.
///
/// Purely observational: nothing a callback does changes the run's result.
pub trait ResearchCallback: Send + Sync {
    /// Called when the research phase changes.
    fn on_phase_change(&self, phase: ResearchPhase, progress: f32);
    /// Called with the model's reasoning span, when a response carried one.
    fn on_reasoning(&self, phase: ResearchPhase, reasoning: &str);
    /// Called before each planned query is searched.
    fn on_search_start(&self, index: usize, total: usize, query: &str);
    /// Called after each search, with the document count and any error marker.
    fn on_search_complete(&self, query: &str, documents: usize, error: Option<&str>);
}

/// No-op callback.
pub struct NoOpResearchCallback;

impl ResearchCallback for NoOpResearchCallback {
    fn on_phase_change(&self, _phase: ResearchPhase, _progress: f32) {}
    fn on_reasoning(&self, _phase: ResearchPhase, _reasoning: &str) {}
    fn on_search_start(&self, _index: usize, _total: usize, _query: &str) {}
    fn on_search_complete(&self, _query: &str, _documents: usize, _error: Option<&str>) {}
}

/// Records every event, for tests.
#[derive(Default)]
pub struct RecordingCallback {
    phases: Mutex<Vec<ResearchPhase>>,
    reasoning: Mutex<Vec<(ResearchPhase, String)>>,
    searches: Mutex<Vec<(String, usize, Option<String>)>>,
}

impl RecordingCallback {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phases(&self) -> Vec<ResearchPhase> {
        self.phases.lock().unwrap().clone()
    }

    pub fn reasoning(&self) -> Vec<(ResearchPhase, String)> {
        self.reasoning.lock().unwrap().clone()
    }

    /// Completed searches as `(query, documents, error)`.
    pub fn searches(&self) -> Vec<(String, usize, Option<String>)> {
        self.searches.lock().unwrap().clone()
    }
}

impl ResearchCallback for RecordingCallback {
    fn on_phase_change(&self, phase: ResearchPhase, _progress: f32) {
        self.phases.lock().unwrap().push(phase);
    }

    fn on_reasoning(&self, phase: ResearchPhase, reasoning: &str) {
        self.reasoning
            .lock()
            .unwrap()
            .push((phase, reasoning.to_string()));
    }

    fn on_search_start(&self, _index: usize, _total: usize, _query: &str) {}

    fn on_search_complete(&self, query: &str, documents: usize, error: Option<&str>) {
        self.searches.lock().unwrap().push((
            query.to_string(),
            documents,
            error.map(str::to_string),
        ));
    }
}
