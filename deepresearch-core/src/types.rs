//! Fundamental data types shared by the pipeline stages.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Ordered list of search queries produced by the planner.
///
/// A plan is all-or-nothing: either every entry is a non-empty query string
/// or the plan is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SearchPlan {
    queries: Vec<String>,
}

impl SearchPlan {
    /// An empty plan.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a plan from decoded JSON array elements.
    ///
    /// Any element that is not a non-empty string rejects the whole array.
    pub fn from_values(values: &[Value]) -> Self {
        let mut queries = Vec::with_capacity(values.len());
        for value in values {
            match value.as_str() {
                Some(query) => queries.push(query.to_string()),
                None => return Self::empty(),
            }
        }
        Self::from_queries(queries)
    }

    pub fn is_empty(&self) -> bool {
        self.queries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.queries.len()
    }

    pub fn queries(&self) -> &[String] {
        &self.queries
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.queries.iter().map(String::as_str)
    }
}

impl SearchPlan {
    fn from_queries(queries: Vec<String>) -> Self {
        if queries.iter().any(|q| q.trim().is_empty()) {
            return Self::empty();
        }
        Self { queries }
    }
}

/// Collects under the same rule as [`SearchPlan::from_values`]: one blank
/// query empties the plan.
impl<S: Into<String>> FromIterator<S> for SearchPlan {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::from_queries(iter.into_iter().map(Into::into).collect())
    }
}

/// One document returned by the search backend.
///
/// Every field is optional; records are neither unique nor deduplicated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub title: Option<String>,
    pub url: Option<String>,
    pub content: Option<String>,
}

impl DocumentRecord {
    /// Read a record out of a backend JSON object. Non-string fields count as absent.
    pub fn from_value(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        let field = |name: &str| obj.get(name).and_then(Value::as_str).map(str::to_string);
        Some(Self {
            title: field("title"),
            url: field("url"),
            content: field("content"),
        })
    }
}

/// The search backend's response for a single planned query.
///
/// The response body is kept as-is; accessors read the `results` and
/// `error` fields when they are present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResultSet {
    /// The query this result set answers.
    pub query: String,
    /// Raw backend response.
    pub raw: Value,
}

impl SearchResultSet {
    pub fn new(query: impl Into<String>, raw: Value) -> Self {
        Self {
            query: query.into(),
            raw,
        }
    }

    /// A result set standing in for a failed backend call.
    pub fn failed(query: impl Into<String>, error: impl std::fmt::Display) -> Self {
        Self::new(query, json!({ "results": [], "error": error.to_string() }))
    }

    /// Document records in backend order. Missing or malformed `results` yields none.
    pub fn documents(&self) -> Vec<DocumentRecord> {
        self.raw
            .get("results")
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(DocumentRecord::from_value).collect())
            .unwrap_or_default()
    }

    /// The error marker, if this result set records a failure.
    pub fn error(&self) -> Option<&str> {
        self.raw.get("error").and_then(Value::as_str)
    }

    pub fn is_error(&self) -> bool {
        self.error().is_some()
    }
}

/// Everything one pipeline run produces, handed to the report renderer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchOutcome {
    pub query: String,
    pub search_results: Vec<SearchResultSet>,
    /// Raw synthesizer text, or the fixed failure message.
    pub final_answer: String,
}

/// Iterate every document across result sets, in result-set then document order.
pub fn all_documents(result_sets: &[SearchResultSet]) -> Vec<DocumentRecord> {
    result_sets.iter().flat_map(|set| set.documents()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_plan_from_strings() {
        let plan = SearchPlan::from_values(&[json!("a"), json!("b")]);
        assert_eq!(plan.queries(), &["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_plan_rejects_mixed_entries() {
        assert!(SearchPlan::from_values(&[json!("a"), json!(3)]).is_empty());
        assert!(SearchPlan::from_values(&[json!("a"), json!("  ")]).is_empty());
        assert!(SearchPlan::from_values(&[json!({"q": "a"})]).is_empty());
    }

    #[test]
    fn test_plan_collect_rejects_blank_queries() {
        let plan: SearchPlan = ["", " "].into_iter().collect();
        assert!(plan.is_empty());
        let plan: SearchPlan = ["a", "\t"].into_iter().collect();
        assert!(plan.is_empty());
        let plan: SearchPlan = ["a", "b"].into_iter().collect();
        assert_eq!(plan.len(), 2);
    }

    #[test]
    fn test_documents_from_raw() {
        let set = SearchResultSet::new(
            "rust",
            json!({
                "answer": "ignored",
                "results": [
                    {"title": "Rust", "url": "https://rust-lang.org", "content": "A language", "score": 0.9},
                    {"url": "https://example.com"},
                    "not an object"
                ]
            }),
        );
        let docs = set.documents();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].title.as_deref(), Some("Rust"));
        assert_eq!(docs[1].title, None);
        assert_eq!(docs[1].url.as_deref(), Some("https://example.com"));
        assert!(!set.is_error());
    }

    #[test]
    fn test_missing_results_field() {
        let set = SearchResultSet::new("q", json!({"detail": "quota exceeded"}));
        assert!(set.documents().is_empty());
    }

    #[test]
    fn test_failed_result_set() {
        let set = SearchResultSet::failed("q", "timeout");
        assert_eq!(set.error(), Some("timeout"));
        assert!(set.documents().is_empty());
        assert_eq!(set.raw["results"], json!([]));
    }

    #[test]
    fn test_all_documents_order() {
        let sets = vec![
            SearchResultSet::new("a", json!({"results": [{"title": "1"}, {"title": "2"}]})),
            SearchResultSet::failed("b", "boom"),
            SearchResultSet::new("c", json!({"results": [{"title": "3"}]})),
        ];
        let titles: Vec<_> = all_documents(&sets)
            .into_iter()
            .filter_map(|d| d.title)
            .collect();
        assert_eq!(titles, vec!["1", "2", "3"]);
    }
}
