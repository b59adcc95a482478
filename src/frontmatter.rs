//! Front-matter parsing and serialization.
//!
//! Every content page may open with a metadata block delimited by `---` lines:
//!
//! ```text
//! ---
//! canonical: "https://example.com/book/ch01"
//! title: "Why Functional Programming"
//! description: "Motivation and history"
//! linkTitle: "Why FP"
//! tags:
//! - "fp"
//! - "history"
//! date: 2024-11-02
//! type: docs
//! nav_weight: 10
//! license: "© 2024 Example Press"
//! ---
//! Body starts here.
//! ```
//!
//! ## Parsing rules
//!
//! - A page not starting with `---` is metadata-less: all fields default,
//!   the whole text is the body, no diagnostic.
//! - An opening `---` with no closing `---` is a broken header: the whole
//!   text (including the opening line) is kept as the body and a
//!   "missing closing delimiter" warning is recorded.
//! - Lines with no `:` separator are skipped with a warning; the rest of the
//!   block still parses. A broken header never blocks rendering the body.
//! - `tags` is the only list-valued key: `- "value"` lines following it are
//!   its entries.
//! - Unknown keys are kept verbatim, in order, in [`Metadata::extra`] so a
//!   parse → serialize round trip does not lose them.
//!
//! ## Serialization
//!
//! [`Metadata::serialize_block`] re-emits the block in the corpus's canonical
//! form: fixed key order, string values double-quoted, `date`/`type`/
//! `nav_weight` bare, one `- "tag"` line per tag. Normalization rules:
//! absent fields are omitted, and string values are always re-quoted.
//! `date` and `nav_weight` track presence, so an authored `nav_weight: 0`
//! survives the round trip. For blocks already in canonical form the round
//! trip is byte-identical.

use crate::diag::{DiagKind, Diagnostic};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Typed front-matter record for one page.
///
/// Known fields are typed; anything unrecognized lands in `extra` with its
/// raw value text preserved (forward compatibility — unknown keys must never
/// fail the parse).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    pub canonical: String,
    pub title: String,
    pub description: String,
    pub link_title: String,
    pub tags: Vec<String>,
    /// `None` when the key was absent or unparsable.
    pub date: Option<NaiveDate>,
    pub page_type: String,
    /// `None` when the key was absent or unparsable; ordering treats that
    /// as weight 0.
    pub nav_weight: Option<i64>,
    pub license: String,
    /// Unknown keys in source order, values verbatim (quotes included).
    pub extra: Vec<(String, String)>,
}

impl Metadata {
    /// Effective sibling-ordering weight.
    pub fn weight(&self) -> i64 {
        self.nav_weight.unwrap_or(0)
    }

    /// Display title for navigation contexts: `linkTitle` if set, else
    /// `title`. Callers fall back to the path segment when both are empty.
    pub fn nav_title(&self) -> &str {
        if !self.link_title.is_empty() {
            &self.link_title
        } else {
            &self.title
        }
    }

    /// Re-emit the front-matter block in canonical form, including the
    /// `---` delimiters and a trailing newline. Absent fields are omitted;
    /// see the module docs for the normalization rules.
    pub fn serialize_block(&self) -> String {
        let mut out = String::from("---\n");
        let mut push_quoted = |key: &str, value: &str, out: &mut String| {
            if !value.is_empty() {
                out.push_str(&format!("{}: \"{}\"\n", key, value));
            }
        };
        push_quoted("canonical", &self.canonical, &mut out);
        push_quoted("title", &self.title, &mut out);
        push_quoted("description", &self.description, &mut out);
        push_quoted("linkTitle", &self.link_title, &mut out);
        if !self.tags.is_empty() {
            out.push_str("tags:\n");
            for tag in &self.tags {
                out.push_str(&format!("- \"{}\"\n", tag));
            }
        }
        if let Some(date) = self.date {
            out.push_str(&format!("date: {}\n", date.format("%Y-%m-%d")));
        }
        if !self.page_type.is_empty() {
            out.push_str(&format!("type: {}\n", self.page_type));
        }
        if let Some(weight) = self.nav_weight {
            out.push_str(&format!("nav_weight: {}\n", weight));
        }
        push_quoted("license", &self.license, &mut out);
        for (key, value) in &self.extra {
            out.push_str(&format!("{}: {}\n", key, value));
        }
        out.push_str("---\n");
        out
    }
}

/// Result of splitting a page into metadata and body.
#[derive(Debug, Clone)]
pub struct ParsedPage {
    pub meta: Metadata,
    pub body: String,
    pub diagnostics: Vec<Diagnostic>,
}

/// Split raw page text into a [`Metadata`] record and the body.
///
/// Pure transformation: no I/O, never fails. Anomalies are reported through
/// `diagnostics` and the body always survives.
pub fn parse(text: &str) -> ParsedPage {
    let mut lines = text.lines();

    if lines.next().map(str::trim_end) != Some("---") {
        return ParsedPage {
            meta: Metadata::default(),
            body: text.to_string(),
            diagnostics: Vec::new(),
        };
    }

    // Collect header lines up to the closing delimiter.
    let mut header: Vec<&str> = Vec::new();
    let mut closed = false;
    for line in lines.by_ref() {
        if line.trim_end() == "---" {
            closed = true;
            break;
        }
        header.push(line);
    }

    if !closed {
        return ParsedPage {
            meta: Metadata::default(),
            body: text.to_string(),
            diagnostics: vec![Diagnostic::new(
                DiagKind::MissingClosingDelimiter,
                "front matter opened with --- but never closed",
            )],
        };
    }

    let mut meta = Metadata::default();
    let mut diagnostics = Vec::new();
    let mut in_tags = false;

    for line in header {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        // Tag list continuation lines.
        if in_tags && trimmed.starts_with("- ") {
            meta.tags.push(unquote(trimmed[2..].trim()).to_string());
            continue;
        }
        in_tags = false;

        let Some((key, value)) = trimmed.split_once(':') else {
            diagnostics.push(Diagnostic::new(DiagKind::MalformedMetadataLine, trimmed));
            continue;
        };
        let key = key.trim();
        let value = value.trim();

        match key {
            "canonical" => meta.canonical = unquote(value).to_string(),
            "title" => meta.title = unquote(value).to_string(),
            "description" => meta.description = unquote(value).to_string(),
            "linkTitle" => meta.link_title = unquote(value).to_string(),
            "license" => meta.license = unquote(value).to_string(),
            "type" => meta.page_type = unquote(value).to_string(),
            "tags" => in_tags = true,
            "nav_weight" => match value.parse::<i64>() {
                Ok(w) => meta.nav_weight = Some(w),
                Err(_) => {
                    diagnostics.push(Diagnostic::new(DiagKind::UnparsableNavWeight, value));
                }
            },
            "date" => match NaiveDate::parse_from_str(unquote(value), "%Y-%m-%d") {
                Ok(d) => meta.date = Some(d),
                Err(_) => {
                    diagnostics.push(Diagnostic::new(DiagKind::UnparsableDate, value));
                }
            },
            _ => meta.extra.push((key.to_string(), value.to_string())),
        }
    }

    // Body is everything after the closing delimiter, leading blank line
    // dropped.
    let body: String = {
        let mut rest: Vec<&str> = lines.collect();
        if rest.first().is_some_and(|l| l.trim().is_empty()) {
            rest.remove(0);
        }
        rest.join("\n")
    };

    ParsedPage {
        meta,
        body,
        diagnostics,
    }
}

/// Strip one layer of surrounding double quotes, if present.
fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}
