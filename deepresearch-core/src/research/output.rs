//! Research report generation: the persisted HTML artifact of a run.
//!
//! The final answer is cleaned of its reasoning span, then rendered either
//! as a structure (when it carries a JSON object) or as markdown. It is
//! embedded in a self-contained page together with a verbatim table of
//! every source document.
//!
//! Reports are named by a second-granularity timestamp. Two runs finishing
//! within the same second write the same file and the last one wins.

use crate::config::ReportConfig;
use crate::error::ReportError;
use crate::parser::{self, Payload, PayloadShape};
use crate::render::{markdown_to_html, value_to_html};
use crate::types::{ResearchOutcome, SearchResultSet, all_documents};
use chrono::{DateTime, Local};
use handlebars::Handlebars;
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

const REPORT_TEMPLATE: &str = include_str!("../../templates/report.hbs");
const TEMPLATE_NAME: &str = "report";

const FILE_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
const FOOTER_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Serialize)]
struct ReportContext<'a> {
    query: &'a str,
    answer_html: String,
    sources: Vec<SourceRow>,
    generated_at: String,
}

#[derive(Serialize)]
struct SourceRow {
    title: String,
    url: String,
    content: String,
}

/// Renders and writes HTML reports.
pub struct ReportGenerator {
    config: ReportConfig,
    handlebars: Handlebars<'static>,
}

impl ReportGenerator {
    /// Create a generator writing under `config.output_dir`.
    pub fn new(config: ReportConfig) -> Result<Self, ReportError> {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(false);
        handlebars
            .register_template_string(TEMPLATE_NAME, REPORT_TEMPLATE)
            .map_err(|e| ReportError::Template {
                message: e.to_string(),
            })?;
        Ok(Self { config, handlebars })
    }

    /// Render the answer section of a final answer.
    ///
    /// Strips the reasoning span, renders a JSON object payload as a
    /// structure, and otherwise renders the cleaned text as markdown.
    pub fn render_answer(final_answer: &str) -> String {
        let parsed = parser::parse(final_answer, PayloadShape::Object);
        match parsed.payload {
            Payload::Object(value) => value_to_html(&value),
            _ => markdown_to_html(&parsed.cleaned),
        }
    }

    /// Render the complete HTML document.
    pub fn render_html(
        &self,
        query: &str,
        result_sets: &[SearchResultSet],
        final_answer: &str,
        generated_at: DateTime<Local>,
    ) -> Result<String, ReportError> {
        let sources = all_documents(result_sets)
            .into_iter()
            .map(|doc| SourceRow {
                title: doc.title.unwrap_or_else(|| "No Title".to_string()),
                url: doc.url.unwrap_or_else(|| "#".to_string()),
                content: doc.content.unwrap_or_else(|| "No Content".to_string()),
            })
            .collect();

        let context = ReportContext {
            query,
            answer_html: Self::render_answer(final_answer),
            sources,
            generated_at: generated_at.format(FOOTER_TIMESTAMP_FORMAT).to_string(),
        };

        self.handlebars
            .render(TEMPLATE_NAME, &context)
            .map_err(|e| ReportError::Template {
                message: e.to_string(),
            })
    }

    /// Path of the report generated at the given time.
    pub fn report_path(&self, generated_at: DateTime<Local>) -> PathBuf {
        self.config.output_dir.join(format!(
            "{}{}.html",
            self.config.file_prefix,
            generated_at.format(FILE_TIMESTAMP_FORMAT)
        ))
    }

    /// Render the report and write it to a new timestamped file.
    ///
    /// Creates the output directory when missing. Write failures are returned
    /// to the caller.
    pub fn render_report(
        &self,
        query: &str,
        result_sets: &[SearchResultSet],
        final_answer: &str,
    ) -> Result<PathBuf, ReportError> {
        let generated_at = Local::now();
        let html = self.render_html(query, result_sets, final_answer, generated_at)?;

        let dir = &self.config.output_dir;
        std::fs::create_dir_all(dir).map_err(|source| ReportError::CreateDir {
            path: dir.clone(),
            source,
        })?;

        let path = self.report_path(generated_at);
        std::fs::write(&path, html).map_err(|source| ReportError::Write {
            path: path.clone(),
            source,
        })?;

        info!(path = %path.display(), "Report written");
        Ok(path)
    }

    /// Render and write the report for a pipeline outcome.
    pub fn write_outcome(&self, outcome: &ResearchOutcome) -> Result<PathBuf, ReportError> {
        self.render_report(
            &outcome.query,
            &outcome.search_results,
            &outcome.final_answer,
        )
    }
}
