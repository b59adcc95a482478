//! Build orchestration: the page render pipeline.
//!
//! Each page moves through an ordered progression of stages:
//!
//! ```text
//! Raw → MetadataParsed → QuizExtracted → BodyRendered → Rendered
//! ```
//!
//! `Raw → QuizExtracted` happens per page during scanning (see
//! [`crate::scan`]) and is embarrassingly parallel — no page depends on any
//! other. The two render stages need the navigation tree, and sibling
//! ordering depends on complete knowledge of the page set, so the build is a
//! fan-out/fan-in:
//!
//! 1. **Fan out**: parse and extract every page concurrently (rayon).
//! 2. **Barrier**: build the navigation tree from all collected metadata.
//!    This is the single synchronization point and the single-writer
//!    aggregation — inputs are immutable metadata records, no locks needed.
//! 3. **Fan out again**: render every surviving page concurrently against
//!    the shared immutable tree.
//!
//! ## Failure semantics
//!
//! Per-page anomalies accumulate as diagnostics and never abort the run; an
//! unreadable page is excluded while the rest render (partial failure).
//! Duplicate logical paths are the one global-abort condition — ordering
//! becomes undefined, so no partial tree and no output are produced.

use crate::diag::{PageDiagnostics, Severity, count_by_severity};
use crate::navtree::{self, NavNode, NavTreeError};
use crate::render;
use crate::scan::{Manifest, ScanError};
use crate::types::RenderedPage;
use rayon::prelude::*;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("Scan error: {0}")]
    Scan(#[from] ScanError),
    #[error("Navigation error: {0}")]
    Nav(#[from] NavTreeError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Pipeline stages, in order. Terminal state is `Rendered`; there is no
/// cyclical or retryable transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Raw,
    MetadataParsed,
    QuizExtracted,
    BodyRendered,
    Rendered,
}

impl Stage {
    /// The following stage, or `None` at the terminal state.
    pub fn next(&self) -> Option<Stage> {
        match self {
            Stage::Raw => Some(Stage::MetadataParsed),
            Stage::MetadataParsed => Some(Stage::QuizExtracted),
            Stage::QuizExtracted => Some(Stage::BodyRendered),
            Stage::BodyRendered => Some(Stage::Rendered),
            Stage::Rendered => None,
        }
    }
}

/// The in-memory result of a full render: the navigation tree plus every
/// rendered page, in deterministic path order.
#[derive(Debug)]
pub struct SiteOutput {
    pub tree: NavNode,
    pub pages: Vec<RenderedPage>,
}

/// Render the whole site in memory. Pure with respect to the filesystem —
/// this is the function the idempotence property holds over: the same
/// manifest yields byte-identical pages and an identical tree ordering.
pub fn render_site(manifest: &Manifest) -> Result<SiteOutput, NavTreeError> {
    // Barrier: all metadata must be collected before the tree can exist.
    let entries: Vec<(String, _)> = manifest
        .pages
        .iter()
        .map(|p| (p.path.clone(), p.meta.clone()))
        .collect();
    let tree = navtree::build(&entries)?;

    // Second fan-out: each page renders independently once the tree exists.
    let mut pages: Vec<RenderedPage> = manifest
        .pages
        .par_iter()
        .map(|page| render::render_page(page, &tree, &manifest.config))
        .collect();
    pages.sort_by(|a, b| a.path.cmp(&b.path));

    Ok(SiteOutput { tree, pages })
}

/// Summary of a completed build.
#[derive(Debug)]
pub struct BuildReport {
    pub rendered: usize,
    /// Pages excluded from the render set (read failures).
    pub failed_pages: Vec<String>,
    pub diagnostics: Vec<PageDiagnostics>,
}

impl BuildReport {
    pub fn warning_count(&self) -> usize {
        count_by_severity(&self.diagnostics, Severity::Warning)
    }

    /// Whether this run should exit non-zero under the given strictness.
    ///
    /// The one fatal condition (duplicate paths) surfaces as an error before
    /// a report exists. Everything recorded here, excluded pages included,
    /// leaves a non-strict run as completed-with-warnings.
    pub fn is_failure(&self, strict: bool) -> bool {
        strict && !self.diagnostics.is_empty()
    }
}

/// Render the site and write it to `output_dir`.
pub fn build(manifest: &Manifest, output_dir: &Path) -> Result<(SiteOutput, BuildReport), BuildError> {
    let site = render_site(manifest)?;

    for page in &site.pages {
        let out_path = output_dir.join(&page.output_path);
        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&out_path, &page.html)?;
    }

    let report = report_for(manifest, site.pages.len());
    Ok((site, report))
}

/// Build the report for a manifest and a rendered-page count.
pub fn report_for(manifest: &Manifest, rendered: usize) -> BuildReport {
    let failed_pages = manifest
        .diagnostics
        .iter()
        .filter(|d| d.max_severity() == Some(Severity::Error))
        .map(|d| d.page.clone())
        .collect();
    BuildReport {
        rendered,
        failed_pages,
        diagnostics: manifest.diagnostics.clone(),
    }
}
