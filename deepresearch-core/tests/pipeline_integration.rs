//! Integration tests for the research pipeline.
//!
//! These tests run plan → search → synthesize → report end-to-end using
//! MockLlmProvider and MockSearchBackend, writing reports into a tempdir.

use deepresearch_core::brain::{Brain, MockLlmProvider};
use deepresearch_core::config::{ReportConfig, SearchConfig, SearchDepth};
use deepresearch_core::parser::split_reasoning;
use deepresearch_core::research::{
    EMPTY_PLAN_ANSWER, RecordingCallback, ReportGenerator, ResearchEngine, ResearchPhase,
};
use deepresearch_core::search::{MockSearchBackend, SearchOptions};
use pretty_assertions::assert_eq;
use std::sync::Arc;

/// Helper to create an engine over mock backends.
fn create_engine(provider: Arc<MockLlmProvider>, backend: Arc<MockSearchBackend>) -> ResearchEngine {
    ResearchEngine::new(Brain::new(provider), backend, SearchConfig::default())
}

fn report_generator(dir: &std::path::Path) -> ReportGenerator {
    ReportGenerator::new(ReportConfig {
        output_dir: dir.to_path_buf(),
        ..ReportConfig::default()
    })
    .unwrap()
}

#[tokio::test]
async fn test_end_to_end_report() {
    let provider = Arc::new(MockLlmProvider::with_responses([
        "<think>plan</think>[\"a\",\"b\"]",
        "<think>r</think>Final text.",
    ]));
    let backend = Arc::new(MockSearchBackend::new());
    backend.respond_with_documents("a", &[("Doc A", "https://a.example", "About a")]);
    backend.respond_with_documents("b", &[("Doc B", "https://b.example", "About b")]);
    let callback = RecordingCallback::new();

    let outcome = create_engine(provider.clone(), backend.clone())
        .run("X", &SearchOptions::default(), &callback)
        .await;

    let searched: Vec<_> = backend.requests().into_iter().map(|r| r.query).collect();
    assert_eq!(searched, vec!["a", "b"]);
    assert_eq!(outcome.search_results.len(), 2);
    assert!(outcome.search_results.iter().all(|s| s.documents().len() == 1));

    let (reasoning, cleaned) = split_reasoning(&outcome.final_answer);
    assert_eq!(reasoning.as_deref(), Some("r"));
    assert_eq!(cleaned, "Final text.");
    assert_eq!(
        callback.reasoning(),
        vec![(ResearchPhase::Planning, "plan".to_string())]
    );

    let dir = tempfile::tempdir().unwrap();
    let path = report_generator(dir.path()).write_outcome(&outcome).unwrap();

    let written: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(written.len(), 1);

    let html = std::fs::read_to_string(&path).unwrap();
    assert_eq!(html.matches("class=\"source-row\"").count(), 2);
    assert!(html.contains("<p>Final text.</p>"));
    assert!(!html.contains("<think>"));
    assert!(html.contains("https://a.example"));
    assert!(html.contains("https://b.example"));
}

#[tokio::test]
async fn test_prose_plan_short_circuits() {
    let provider = Arc::new(MockLlmProvider::with_responses([
        "I think we should look into several sources about this topic.",
    ]));
    let backend = Arc::new(MockSearchBackend::new());
    let callback = RecordingCallback::new();

    let outcome = create_engine(provider.clone(), backend.clone())
        .run("X", &SearchOptions::default(), &callback)
        .await;

    assert_eq!(outcome.final_answer, EMPTY_PLAN_ANSWER);
    assert!(outcome.search_results.is_empty());
    assert_eq!(provider.call_count(), 1);
    assert_eq!(backend.call_count(), 0);
    assert_eq!(callback.phases().last(), Some(&ResearchPhase::Failed));
}

#[tokio::test]
async fn test_failed_search_still_reaches_synthesis() {
    let provider = Arc::new(MockLlmProvider::with_responses([
        "[\"good\", \"bad\"]",
        "Partial answer.",
    ]));
    let backend = Arc::new(MockSearchBackend::new());
    backend.respond_with_documents("good", &[("G", "https://g.example", "g")]);
    backend.fail("bad", "HTTP 432");

    let outcome = create_engine(provider.clone(), backend)
        .run("X", &SearchOptions::default(), &RecordingCallback::new())
        .await;

    assert_eq!(outcome.search_results.len(), 2);
    assert!(outcome.search_results[1].is_error());
    assert_eq!(outcome.final_answer, "Partial answer.");

    // The failed set still contributes a (document-less) source block.
    let prompt = provider.requests()[1].prompt.clone();
    assert!(prompt.contains("Source 1:\n- Title: G"));
    assert!(prompt.contains("Source 2:\n\n"));
}

#[tokio::test]
async fn test_run_options_override_defaults() {
    let provider = Arc::new(MockLlmProvider::with_responses(["[\"q\"]", "done"]));
    let backend = Arc::new(MockSearchBackend::new());
    let options = SearchOptions::default()
        .with_depth(SearchDepth::Basic)
        .with_max_results(3);

    create_engine(provider, backend.clone())
        .run("X", &options, &RecordingCallback::new())
        .await;

    let request = backend.requests().remove(0);
    assert_eq!(request.search_depth, SearchDepth::Basic);
    assert_eq!(request.max_results, 3);
}

#[tokio::test]
async fn test_structured_answer_report() {
    let provider = Arc::new(MockLlmProvider::with_responses([
        "[\"q\"]",
        "<think>format</think>```json\n{\"summary\": \"**key** finding\", \"sources\": [\"one\", \"two\"]}\n```",
    ]));
    let backend = Arc::new(MockSearchBackend::new());

    let outcome = create_engine(provider, backend)
        .run("X", &SearchOptions::default(), &RecordingCallback::new())
        .await;

    let dir = tempfile::tempdir().unwrap();
    let path = report_generator(dir.path()).write_outcome(&outcome).unwrap();
    let html = std::fs::read_to_string(path).unwrap();

    assert!(html.contains("<table"));
    assert!(html.contains("<strong>key</strong>"));
    assert!(html.contains("<ul>"));
    assert!(!html.contains("```"));
}
