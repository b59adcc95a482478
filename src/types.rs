//! Shared types used across pipeline stages.
//!
//! These types are serialized to JSON between stages (scan → build) and must
//! be identical across modules.

use crate::frontmatter::Metadata;
use crate::quiz::QuizBlock;
use serde::{Deserialize, Serialize};

/// One content page after the per-page prep stages (front matter parsed,
/// quiz blocks extracted).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageRecord {
    /// Logical path within the site (`concepts/recursion`; empty for the
    /// root index page). Unique identity of the page.
    pub path: String,
    /// Source file path relative to the content root.
    pub source_path: String,
    pub meta: Metadata,
    /// Markdown body with quiz regions replaced by `<!--quiz:N-->`
    /// placeholders.
    pub body: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub quizzes: Vec<QuizBlock>,
}

/// A fully rendered page, ready for the output directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderedPage {
    pub path: String,
    pub title: String,
    /// Output file path relative to the output directory.
    pub output_path: String,
    pub html: String,
}
