//! Structure rendering: converts decoded JSON values into HTML.
//!
//! Objects become two-column tables, arrays become bullet lists and every
//! string leaf is rendered as markdown, so formatting the model puts inside
//! JSON values shows up in the report. Other scalars print as-is.

use handlebars::html_escape;
use pulldown_cmark::{Options, Parser, html};
use serde_json::Value;

const TABLE_STYLE: &str = "width: 100%; border-collapse: collapse; margin-top: 10px;";
const KEY_STYLE: &str = "width: 30%; background-color: #f2f2f2; border: 1px solid #ddd; \
                         padding: 8px; vertical-align: top;";
const CELL_STYLE: &str = "border: 1px solid #ddd; padding: 8px;";

/// Render markdown to an HTML fragment.
pub fn markdown_to_html(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_FOOTNOTES);

    let parser = Parser::new_ext(markdown, options);
    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

/// Render any JSON value as an HTML fragment.
///
/// Total over decoded JSON. Object keys keep their insertion order.
pub fn value_to_html(value: &Value) -> String {
    let mut out = String::new();
    write_value(value, &mut out);
    out
}

fn write_value(value: &Value, out: &mut String) {
    match value {
        Value::Object(map) => {
            out.push_str(&format!("<table style=\"{TABLE_STYLE}\">"));
            for (key, child) in map {
                out.push_str(&format!(
                    "<tr><th style=\"{KEY_STYLE}\">{}</th><td style=\"{CELL_STYLE}\">",
                    html_escape(key)
                ));
                write_value(child, out);
                out.push_str("</td></tr>");
            }
            out.push_str("</table>");
        }
        Value::Array(items) => {
            out.push_str("<ul>");
            for item in items {
                out.push_str("<li>");
                write_value(item, out);
                out.push_str("</li>");
            }
            out.push_str("</ul>");
        }
        Value::String(text) => out.push_str(&markdown_to_html(text)),
        scalar => out.push_str(&scalar.to_string()),
    }
}
