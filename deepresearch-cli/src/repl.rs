//! Single-query and interactive research modes.

use deepresearch_core::brain::Brain;
use deepresearch_core::config::{ResearchConfig, SearchDepth};
use deepresearch_core::error::ResearchError;
use deepresearch_core::providers::create_provider;
use deepresearch_core::research::{
    ReportGenerator, ResearchCallback, ResearchEngine, ResearchPhase,
};
use deepresearch_core::search::{SearchOptions, TavilyClient};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

/// CLI callback that prints reasoning and search progress to stdout.
struct CliCallback;

impl ResearchCallback for CliCallback {
    fn on_phase_change(&self, phase: ResearchPhase, _progress: f32) {
        match phase {
            ResearchPhase::Planning => println!("\x1b[36m  Planning research...\x1b[0m"),
            ResearchPhase::Searching => println!("\x1b[36m  Searching...\x1b[0m"),
            ResearchPhase::Synthesizing => println!("\x1b[36m  Synthesizing answer...\x1b[0m"),
            ResearchPhase::Complete => println!("\x1b[90m  done.\x1b[0m"),
            ResearchPhase::Failed => {
                println!("\x1b[31m  Planning produced no search queries.\x1b[0m")
            }
        }
    }

    fn on_reasoning(&self, phase: ResearchPhase, reasoning: &str) {
        println!("\n\x1b[90m--- Reasoning ({}) ---\x1b[0m", phase);
        println!("\x1b[90m{}\x1b[0m", reasoning);
        println!("\x1b[90m---------------------\x1b[0m\n");
    }

    fn on_search_start(&self, index: usize, total: usize, query: &str) {
        println!("  [{}/{}] {}", index + 1, total, query);
    }

    fn on_search_complete(&self, _query: &str, documents: usize, error: Option<&str>) {
        match error {
            Some(e) => println!("\x1b[31m        failed: {}\x1b[0m", e),
            None => println!("\x1b[90m        {} results\x1b[0m", documents),
        }
    }
}

/// Everything needed to run research for one process.
pub struct ResearchSession {
    engine: ResearchEngine,
    reports: ReportGenerator,
    options: SearchOptions,
    model: String,
}

impl ResearchSession {
    /// Build the session. Fails when the search credential is missing.
    pub fn new(config: ResearchConfig, options: SearchOptions) -> Result<Self, ResearchError> {
        let search = TavilyClient::new(&config.search)?;
        let brain = Brain::new(create_provider(&config.llm));
        let reports = ReportGenerator::new(config.report.clone())?;
        let engine = ResearchEngine::new(brain, Arc::new(search), config.search);
        Ok(Self::from_parts(engine, reports, options, config.llm.model))
    }

    fn from_parts(
        engine: ResearchEngine,
        reports: ReportGenerator,
        options: SearchOptions,
        model: String,
    ) -> Self {
        Self {
            engine,
            reports,
            options,
            model,
        }
    }

    pub fn print_banner(&self) {
        let mode = self.options.search_depth.unwrap_or(SearchDepth::Basic);
        println!("==========================================");
        println!("      Deep Research Agent");
        println!("      Mode: {}", mode.to_string().to_uppercase());
        println!("      Model: {}", self.model);
        println!("==========================================");
    }

    /// Run one query, print the answer and write the report.
    pub async fn run_research(&self, query: &str) -> Result<PathBuf, ResearchError> {
        let outcome = self.engine.run(query, &self.options, &CliCallback).await;

        println!("\n{}", "=".repeat(40));
        println!("FINAL ANSWER");
        println!("{}\n", "=".repeat(40));
        println!("{}", outcome.final_answer);

        match self.reports.write_outcome(&outcome) {
            Ok(path) => {
                println!("\nReport generated: {}", path.display());
                Ok(path)
            }
            Err(e) => {
                tracing::error!(query = %query, error = %e, "Report generation failed");
                println!("\n\x1b[31mAn error occurred: {}\x1b[0m", e);
                Err(e.into())
            }
        }
    }

    /// Prompt for topics on stdin until `exit`, `quit` or end of input.
    pub async fn run_interactive(&self) -> anyhow::Result<()> {
        self.read_topics(BufReader::new(tokio::io::stdin())).await?;
        Ok(())
    }

    /// Run one research per non-blank input line. Returns the number of runs.
    async fn read_topics<R: AsyncBufRead + Unpin>(&self, reader: R) -> anyhow::Result<usize> {
        let mut lines = reader.lines();
        let mut runs = 0;
        loop {
            print!("\nEnter your research topic (or 'exit' to quit): ");
            io::stdout().flush()?;

            let Some(line) = lines.next_line().await? else {
                println!("\nExiting...");
                break;
            };

            let input = line.trim();
            if input.is_empty() {
                continue;
            }
            if is_exit_command(input) {
                println!("Exiting...");
                break;
            }

            // Errors are already reported; keep the session alive.
            let _ = self.run_research(input).await;
            runs += 1;
        }
        Ok(runs)
    }
}

fn is_exit_command(input: &str) -> bool {
    input.eq_ignore_ascii_case("exit") || input.eq_ignore_ascii_case("quit")
}

#[cfg(test)]
mod tests {
    use super::*;
    use deepresearch_core::brain::MockLlmProvider;
    use deepresearch_core::config::{ReportConfig, SearchConfig};
    use deepresearch_core::search::MockSearchBackend;

    #[test]
    fn test_exit_commands() {
        assert!(is_exit_command("exit"));
        assert!(is_exit_command("QUIT"));
        assert!(!is_exit_command("exit strategy for startups"));
    }

    fn mock_session(
        provider: Arc<MockLlmProvider>,
        output_dir: &std::path::Path,
    ) -> ResearchSession {
        let engine = ResearchEngine::new(
            Brain::new(provider),
            Arc::new(MockSearchBackend::new()),
            SearchConfig::default(),
        );
        let reports = ReportGenerator::new(ReportConfig {
            output_dir: output_dir.to_path_buf(),
            ..ReportConfig::default()
        })
        .unwrap();
        ResearchSession::from_parts(engine, reports, SearchOptions::default(), "mock".into())
    }

    #[tokio::test]
    async fn test_read_topics_stops_at_exit() {
        let dir = tempfile::tempdir().unwrap();
        let provider = Arc::new(MockLlmProvider::with_responses(["No plan."]));
        let session = mock_session(provider.clone(), dir.path());

        let input: &[u8] = b"\n   \nrust async runtimes\nexit\nnever researched\n";
        let runs = session.read_topics(input).await.unwrap();

        assert_eq!(runs, 1);
        assert_eq!(provider.call_count(), 1);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[tokio::test]
    async fn test_read_topics_ends_at_eof() {
        let dir = tempfile::tempdir().unwrap();
        let provider = Arc::new(MockLlmProvider::new());
        let session = mock_session(provider.clone(), dir.path());

        let runs = session.read_topics(&b""[..]).await.unwrap();
        assert_eq!(runs, 0);
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_failed_report_keeps_session_alive() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, "file").unwrap();
        let provider = Arc::new(MockLlmProvider::new());
        let session = mock_session(provider.clone(), &blocker);

        let runs = session.read_topics(&b"first\nsecond\nquit\n"[..]).await.unwrap();
        assert_eq!(runs, 2);
        assert_eq!(provider.call_count(), 2);
    }

    #[test]
    fn test_session_requires_search_key() {
        let mut config = ResearchConfig::default();
        config.search.api_key_env = "DEEPRESEARCH_TEST_KEY_THAT_IS_NEVER_SET".to_string();
        let result = ResearchSession::new(config, SearchOptions::default());
        assert!(matches!(result, Err(ResearchError::Search(_))));
    }
}
