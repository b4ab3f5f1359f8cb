//! Response parsing: splits a raw model response into reasoning and payload.
//!
//! Model output is one undifferentiated text blob: an optional reasoning span
//! (`<think>...</think>`) followed by either a JSON payload or free markdown.
//! [`parse`] turns it into a [`ParsedResponse`] whose absent parts are explicit.
//!
//! Detection is pattern-based, not a tokenizer:
//! - only the first reasoning span is removed; later markers stay in the text.
//! - list payloads match the widest `[...]` span, so prose containing
//!   brackets around the array is captured too and then fails to decode.
//! - object payloads prefer a ```` ```json ```` fence and fall back to the
//!   widest `{...}` span.
//!
//! Parsing never fails. A missing or undecodable payload is a normal outcome.

use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;
use tracing::{debug, warn};

/// Opening marker of a reasoning span.
pub const REASONING_START: &str = "<think>";
/// Closing marker of a reasoning span.
pub const REASONING_END: &str = "</think>";

static REASONING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        "(?s){}(.*?){}",
        regex::escape(REASONING_START),
        regex::escape(REASONING_END)
    ))
    .expect("reasoning pattern")
});
static ARRAY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\[.*\]").expect("array pattern"));
static FENCED_JSON_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```json\s*(.*?)\s*```").expect("fenced json pattern"));
static OBJECT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\{.*\}").expect("object pattern"));

/// Which payload shape the caller is looking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadShape {
    /// A JSON array, e.g. a list of search queries.
    List,
    /// A JSON object, fenced or bare.
    Object,
}

/// Discriminant of [`Payload`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadKind {
    None,
    JsonArray,
    JsonObject,
    Markdown,
}

/// The machine-consumable or narrative part of a response.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// A candidate was found but did not decode.
    None,
    /// A decoded JSON array.
    List(Vec<Value>),
    /// A value decoded from an object candidate. A fenced block may hold any JSON value.
    Object(Value),
    /// No structured payload; the cleaned text is narrative markdown.
    Markdown(String),
}

impl Payload {
    pub fn kind(&self) -> PayloadKind {
        match self {
            Payload::None => PayloadKind::None,
            Payload::List(_) => PayloadKind::JsonArray,
            Payload::Object(_) => PayloadKind::JsonObject,
            Payload::Markdown(_) => PayloadKind::Markdown,
        }
    }
}

/// A model response split into its parts.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedResponse {
    /// Trimmed contents of the first reasoning span, if any.
    pub reasoning: Option<String>,
    /// The response with that span removed, trimmed.
    pub cleaned: String,
    pub payload: Payload,
}

/// Remove the first reasoning span.
///
/// Returns the span's trimmed contents and the remaining text, trimmed.
pub fn split_reasoning(raw: &str) -> (Option<String>, String) {
    let Some(caps) = REASONING_RE.captures(raw) else {
        return (None, raw.trim().to_string());
    };
    let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
        return (None, raw.trim().to_string());
    };
    let mut cleaned = String::with_capacity(raw.len() - whole.len());
    cleaned.push_str(&raw[..whole.start()]);
    cleaned.push_str(&raw[whole.end()..]);
    (
        Some(inner.as_str().trim().to_string()),
        cleaned.trim().to_string(),
    )
}

/// Parse a raw response, looking for a payload of the given shape.
pub fn parse(raw: &str, shape: PayloadShape) -> ParsedResponse {
    let (reasoning, cleaned) = split_reasoning(raw);
    let payload = match shape {
        PayloadShape::List => extract_list(&cleaned),
        PayloadShape::Object => extract_object(&cleaned),
    };
    ParsedResponse {
        reasoning,
        cleaned,
        payload,
    }
}

fn extract_list(text: &str) -> Payload {
    let Some(candidate) = ARRAY_RE.find(text) else {
        return Payload::Markdown(text.to_string());
    };
    match serde_json::from_str::<Value>(candidate.as_str()) {
        Ok(Value::Array(items)) => Payload::List(items),
        Ok(other) => {
            warn!(kind = json_kind(&other), "Expected a JSON array in model response");
            Payload::None
        }
        Err(e) => {
            warn!(error = %e, "Failed to decode JSON array from model response");
            debug!(raw = %text, "Undecodable model response");
            Payload::None
        }
    }
}

fn extract_object(text: &str) -> Payload {
    let candidate = FENCED_JSON_RE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .or_else(|| OBJECT_RE.find(text));

    let Some(candidate) = candidate else {
        return Payload::Markdown(text.to_string());
    };
    match serde_json::from_str::<Value>(candidate.as_str()) {
        Ok(value) => Payload::Object(value),
        Err(e) => {
            debug!(error = %e, raw = %text, "JSON candidate did not decode; treating as markdown");
            Payload::Markdown(text.to_string())
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
