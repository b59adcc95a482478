//! Content scanning and manifest generation.
//!
//! Stage 1 of the docweave build pipeline. Walks a content root for Markdown
//! pages, runs the per-page prep stages (front-matter parse, quiz
//! extraction) in parallel, and produces a structured [`Manifest`] that the
//! build stage consumes.
//!
//! ## Content Layout
//!
//! ```text
//! content/                         # Content root
//! ├── config.toml                  # Site configuration (optional)
//! ├── _index.md                    # Root index page (logical path "")
//! ├── intro.md                     # Page at logical path "intro"
//! └── concepts/
//!     ├── _index.md                # Section index (logical path "concepts")
//!     ├── immutability.md          # "concepts/immutability"
//!     └── recursion.md             # "concepts/recursion"
//! ```
//!
//! ## Logical Paths
//!
//! A page's identity is its file path relative to the content root with the
//! `.md` extension stripped. A stem of `_index` (or `index`) collapses onto
//! its directory, so `concepts/_index.md` is the page *for* the `concepts`
//! section. Duplicate logical paths (`foo.md` next to `foo/_index.md`) are
//! not detected here — the navigation tree builder owns that check and it is
//! the one fatal condition of a build.
//!
//! ## Partial Failure
//!
//! An unreadable file excludes that one page and records a `PageRead` error
//! diagnostic; scanning of all other pages continues. Only I/O failure on
//! the directory walk itself aborts the scan.

use crate::config::{self, SiteConfig};
use crate::diag::{DiagKind, Diagnostic, PageDiagnostics};
use crate::types::PageRecord;
use crate::{frontmatter, quiz};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Content walk error: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Manifest output from the scan stage.
#[derive(Debug, Serialize, Deserialize)]
pub struct Manifest {
    /// Pages sorted by logical path.
    pub pages: Vec<PageRecord>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<PageDiagnostics>,
    pub config: SiteConfig,
}

pub fn scan(root: &Path) -> Result<Manifest, ScanError> {
    let config = config::load_config(root)?;
    let sources = collect_sources(root)?;

    // Per-page prep is embarrassingly parallel: each page's parse/extract
    // owns private state. Unreadable files become per-page diagnostics, not
    // scan failures.
    let results: Vec<(Option<PageRecord>, Option<PageDiagnostics>)> = sources
        .par_iter()
        .map(|source| prep_page(root, source))
        .collect();

    let mut pages = Vec::new();
    let mut diagnostics = Vec::new();
    for (page, diags) in results {
        if let Some(page) = page {
            pages.push(page);
        }
        if let Some(diags) = diags {
            diagnostics.push(diags);
        }
    }

    pages.sort_by(|a, b| a.path.cmp(&b.path));
    diagnostics.sort_by(|a, b| a.page.cmp(&b.page));

    Ok(Manifest {
        pages,
        diagnostics,
        config,
    })
}

/// Collect all Markdown source files under the root, sorted for determinism.
///
/// Hidden files and directories are skipped, as are build artifacts living
/// inside the content tree.
fn collect_sources(root: &Path) -> Result<Vec<PathBuf>, ScanError> {
    let mut sources = Vec::new();
    let walker = WalkDir::new(root).into_iter().filter_entry(|e| {
        // The root itself is exempt; the filter is for entries inside it.
        if e.depth() == 0 {
            return true;
        }
        let name = e.file_name().to_string_lossy();
        if name.starts_with('.') {
            return false;
        }
        // Build artifacts are only special at the content root; a nested
        // directory may legitimately be named "dist".
        e.depth() > 1 || (name != "dist" && name != "manifest.json")
    });
    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.into_path();
        if path
            .extension()
            .is_some_and(|e| e.eq_ignore_ascii_case("md"))
        {
            sources.push(path);
        }
    }
    sources.sort();
    Ok(sources)
}

/// Run the `Raw → MetadataParsed → QuizExtracted` stages for one file.
fn prep_page(
    root: &Path,
    source: &Path,
) -> (Option<PageRecord>, Option<PageDiagnostics>) {
    let rel = source.strip_prefix(root).unwrap_or(source);
    let logical = logical_path(rel);

    let text = match fs::read_to_string(source) {
        Ok(t) => t,
        Err(e) => {
            let diags = PageDiagnostics::new(
                logical,
                vec![Diagnostic::new(DiagKind::PageRead, e.to_string())],
            );
            return (None, Some(diags));
        }
    };

    let parsed = frontmatter::parse(&text);
    let extraction = quiz::extract(&parsed.body);

    let mut entries = parsed.diagnostics;
    entries.extend(extraction.diagnostics);
    let diags = if entries.is_empty() {
        None
    } else {
        Some(PageDiagnostics::new(logical.clone(), entries))
    };

    let page = PageRecord {
        path: logical,
        source_path: rel.to_string_lossy().replace('\\', "/"),
        meta: parsed.meta,
        body: extraction.body,
        quizzes: extraction.blocks,
    };

    (Some(page), diags)
}

/// Map a source file path (relative to the content root) to its logical path.
///
/// - `intro.md` → `intro`
/// - `concepts/recursion.md` → `concepts/recursion`
/// - `concepts/_index.md` → `concepts`
/// - `_index.md` → `` (root)
pub fn logical_path(rel: &Path) -> String {
    let stem = rel
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let parent = rel
        .parent()
        .map(|p| p.to_string_lossy().replace('\\', "/"))
        .unwrap_or_default();

    if stem == "_index" || stem == "index" {
        parent
    } else if parent.is_empty() {
        stem
    } else {
        format!("{}/{}", parent, stem)
    }
}
