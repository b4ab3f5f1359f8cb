//! Search execution: runs each planned query against the search backend.

use super::callback::ResearchCallback;
use crate::config::SearchConfig;
use crate::search::{SearchBackend, SearchOptions, SearchRequest};
use crate::types::{SearchPlan, SearchResultSet};
use std::sync::Arc;
use tracing::{info, warn};

/// Runs a plan's queries one at a time, in plan order.
pub struct SearchExecutor {
    backend: Arc<dyn SearchBackend>,
    defaults: SearchConfig,
}

impl SearchExecutor {
    pub fn new(backend: Arc<dyn SearchBackend>, defaults: SearchConfig) -> Self {
        Self { backend, defaults }
    }

    /// Search every query in the plan.
    ///
    /// Returns exactly one result set per query, in plan order. A failed
    /// search becomes an error-tagged result set and the remaining queries
    /// still run.
    pub async fn execute(
        &self,
        plan: &SearchPlan,
        overrides: &SearchOptions,
        callback: &dyn ResearchCallback,
    ) -> Vec<SearchResultSet> {
        let total = plan.len();
        let mut results = Vec::with_capacity(total);

        for (index, query) in plan.iter().enumerate() {
            callback.on_search_start(index, total, query);
            info!(query = %query, index = index + 1, total, "Searching");

            let request = SearchRequest::resolve(query, &self.defaults, overrides);
            let set = match self.backend.search(&request).await {
                Ok(body) => SearchResultSet::new(query, body),
                Err(e) => {
                    warn!(query = %query, error = %e, "Search failed");
                    SearchResultSet::failed(query, e)
                }
            };

            callback.on_search_complete(query, set.documents().len(), set.error());
            results.push(set);
        }

        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SearchDepth;
    use crate::research::callback::{NoOpResearchCallback, RecordingCallback};
    use crate::search::MockSearchBackend;
    use pretty_assertions::assert_eq;

    fn plan(queries: &[&str]) -> SearchPlan {
        queries.iter().copied().collect()
    }

    #[tokio::test]
    async fn test_results_follow_plan_order() {
        let backend = Arc::new(MockSearchBackend::new());
        backend.respond_with_documents("first", &[("A", "https://a", "a")]);
        backend.respond_with_documents("second", &[("B", "https://b", "b")]);
        let executor = SearchExecutor::new(backend.clone(), SearchConfig::default());

        let results = executor
            .execute(
                &plan(&["second", "first"]),
                &SearchOptions::default(),
                &NoOpResearchCallback,
            )
            .await;

        let queries: Vec<_> = results.iter().map(|r| r.query.as_str()).collect();
        assert_eq!(queries, vec!["second", "first"]);
        assert_eq!(results[0].documents()[0].title.as_deref(), Some("B"));
    }

    #[tokio::test]
    async fn test_failure_is_isolated() {
        let backend = Arc::new(MockSearchBackend::new());
        backend.respond_with_documents("ok-1", &[("A", "https://a", "a")]);
        backend.fail("broken", "connection reset");
        backend.respond_with_documents("ok-2", &[("C", "https://c", "c")]);
        let executor = SearchExecutor::new(backend.clone(), SearchConfig::default());
        let cb = RecordingCallback::new();

        let results = executor
            .execute(&plan(&["ok-1", "broken", "ok-2"]), &SearchOptions::default(), &cb)
            .await;

        assert_eq!(results.len(), 3);
        assert!(!results[0].is_error());
        assert_eq!(
            results[1].error(),
            Some("Search request failed: connection reset")
        );
        assert!(results[1].documents().is_empty());
        assert_eq!(results[2].documents().len(), 1);
        assert_eq!(backend.call_count(), 3);
        assert_eq!(cb.searches()[1].1, 0);
    }

    #[tokio::test]
    async fn test_overrides_reach_backend() {
        let backend = Arc::new(MockSearchBackend::new());
        let executor = SearchExecutor::new(backend.clone(), SearchConfig::default());
        let overrides = SearchOptions::default().with_depth(SearchDepth::Basic);

        executor
            .execute(&plan(&["q"]), &overrides, &NoOpResearchCallback)
            .await;

        let requests = backend.requests();
        assert_eq!(requests[0].search_depth, SearchDepth::Basic);
        assert_eq!(requests[0].max_results, 10);
    }

    #[tokio::test]
    async fn test_empty_plan_makes_no_calls() {
        let backend = Arc::new(MockSearchBackend::new());
        let executor = SearchExecutor::new(backend.clone(), SearchConfig::default());
        let results = executor
            .execute(&SearchPlan::empty(), &SearchOptions::default(), &NoOpResearchCallback)
            .await;
        assert!(results.is_empty());
        assert_eq!(backend.call_count(), 0);
    }
}
