//! CLI output formatting for all pipeline stages.
//!
//! # Information-First Display
//!
//! Output is **information-centric, not file-centric**. The primary display
//! for every entity (section, page, quiz) is its semantic identity — title
//! and positional index — with filesystem paths shown as secondary context
//! via indented `Source:` lines.
//!
//! # Output Format
//!
//! ## Scan
//!
//! ```text
//! Pages
//! 001 Why Functional Programming
//!     Source: intro.md
//!     Quizzes: 1 (3 questions)
//! 002 Immutability
//!     Source: concepts/immutability.md
//!
//! Diagnostics
//! broken-page
//!     warning: malformed metadata line: no separator here
//! ```
//!
//! ## Build
//!
//! ```text
//! Home → index.html
//! 001 Why FP → intro/index.html
//! 002 Concepts → concepts/index.html
//!     001 Immutability → concepts/immutability/index.html
//!
//! Rendered 4 pages, 1 warning, 0 failed
//! ```
//!
//! # Architecture
//!
//! Each stage has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure — no I/O, no side effects.

use crate::diag::PageDiagnostics;
use crate::navtree::NavNode;
use crate::pipeline::BuildReport;
use crate::render;
use crate::scan::Manifest;

// ============================================================================
// Shared entity display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

// ============================================================================
// Stage 1: Scan output
// ============================================================================

/// Format scan stage output showing discovered pages and their diagnostics.
pub fn format_scan_output(manifest: &Manifest) -> Vec<String> {
    let mut lines = Vec::new();

    lines.push("Pages".to_string());
    for (i, page) in manifest.pages.iter().enumerate() {
        let title = if page.meta.title.is_empty() {
            &page.path
        } else {
            &page.meta.title
        };
        lines.push(format!("{} {}", format_index(i + 1), title));
        lines.push(format!("    Source: {}", page.source_path));
        if !page.quizzes.is_empty() {
            let questions: usize = page.quizzes.iter().map(|b| b.questions.len()).sum();
            lines.push(format!(
                "    Quizzes: {} ({} questions)",
                page.quizzes.len(),
                questions
            ));
        }
    }

    lines.extend(format_diagnostics(&manifest.diagnostics));
    lines
}

/// Print scan output to stdout.
pub fn print_scan_output(manifest: &Manifest) {
    for line in format_scan_output(manifest) {
        println!("{}", line);
    }
}

// ============================================================================
// Diagnostics
// ============================================================================

/// Format diagnostics grouped by page. Empty input formats to nothing.
pub fn format_diagnostics(diags: &[PageDiagnostics]) -> Vec<String> {
    let mut lines = Vec::new();
    if diags.is_empty() {
        return lines;
    }
    lines.push(String::new());
    lines.push("Diagnostics".to_string());
    for page in diags {
        let name = if page.page.is_empty() {
            "(root)"
        } else {
            &page.page
        };
        lines.push(name.to_string());
        for entry in &page.entries {
            lines.push(format!("    {}", entry));
        }
    }
    lines
}

// ============================================================================
// Build output
// ============================================================================

/// Format build output: the navigation tree with output paths, then
/// diagnostics and a summary line.
pub fn format_build_output(tree: &NavNode, report: &BuildReport) -> Vec<String> {
    let mut lines = Vec::new();

    if tree.meta.is_some() {
        lines.push(format!("{} \u{2192} index.html", tree_title(tree)));
    }
    format_tree_level(&tree.children, 0, &mut lines);

    lines.extend(format_diagnostics(&report.diagnostics));

    lines.push(String::new());
    lines.push(format!(
        "Rendered {} pages, {} warnings, {} failed",
        report.rendered,
        report.warning_count(),
        report.failed_pages.len()
    ));
    lines
}

fn tree_title(node: &NavNode) -> String {
    let title = node.title();
    if title.is_empty() {
        "Home".to_string()
    } else {
        title.to_string()
    }
}

fn format_tree_level(nodes: &[NavNode], depth: usize, lines: &mut Vec<String>) {
    for (i, node) in nodes.iter().enumerate() {
        let marker = if node.meta.is_some() {
            format!(" \u{2192} {}", render::output_path(&node.path))
        } else {
            // Synthetic section with no index page of its own.
            String::new()
        };
        lines.push(format!(
            "{}{} {}{}",
            indent(depth),
            format_index(i + 1),
            tree_title(node),
            marker
        ));
        format_tree_level(&node.children, depth + 1, lines);
    }
}

/// Print build output to stdout.
pub fn print_build_output(tree: &NavNode, report: &BuildReport) {
    for line in format_build_output(tree, report) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use crate::diag::{DiagKind, Diagnostic};
    use crate::frontmatter::Metadata;
    use crate::navtree;
    use crate::pipeline;
    use crate::types::PageRecord;

    fn record(path: &str, title: &str, weight: i64) -> PageRecord {
        PageRecord {
            path: path.to_string(),
            source_path: format!("{}.md", path),
            meta: Metadata {
                title: title.to_string(),
                nav_weight: Some(weight),
                ..Metadata::default()
            },
            body: "Body".to_string(),
            quizzes: vec![],
        }
    }

    fn manifest(pages: Vec<PageRecord>) -> Manifest {
        Manifest {
            pages,
            diagnostics: vec![],
            config: SiteConfig::default(),
        }
    }

    // =========================================================================
    // Helper tests
    // =========================================================================

    #[test]
    fn format_index_pads_to_three() {
        assert_eq!(format_index(1), "001");
        assert_eq!(format_index(42), "042");
        assert_eq!(format_index(100), "100");
    }

    #[test]
    fn indent_scales_by_depth() {
        assert_eq!(indent(0), "");
        assert_eq!(indent(2), "        ");
    }

    // =========================================================================
    // Scan output
    // =========================================================================

    #[test]
    fn scan_output_lists_pages_with_sources() {
        let m = manifest(vec![
            record("intro", "Why Functional Programming", 1),
            record("concepts/immutability", "Immutability", 2),
        ]);
        let lines = format_scan_output(&m);
        assert_eq!(lines[0], "Pages");
        assert_eq!(lines[1], "001 Why Functional Programming");
        assert_eq!(lines[2], "    Source: intro.md");
        assert_eq!(lines[3], "002 Immutability");
    }

    #[test]
    fn scan_output_counts_quiz_questions() {
        use crate::quiz::{Question, QuizBlock, QuizOption};
        let mut page = record("ch1", "Chapter 1", 1);
        page.quizzes = vec![QuizBlock {
            questions: vec![
                Question {
                    prompt: "Q1".into(),
                    options: vec![QuizOption {
                        text: "A".into(),
                        correct: true,
                    }],
                    explanation: String::new(),
                },
                Question {
                    prompt: "Q2".into(),
                    options: vec![],
                    explanation: String::new(),
                },
            ],
        }];
        let lines = format_scan_output(&manifest(vec![page]));
        assert!(lines.contains(&"    Quizzes: 1 (2 questions)".to_string()));
    }

    #[test]
    fn untitled_page_falls_back_to_path() {
        let lines = format_scan_output(&manifest(vec![record("notes/scratch", "", 1)]));
        assert_eq!(lines[1], "001 notes/scratch");
    }

    // =========================================================================
    // Diagnostics formatting
    // =========================================================================

    #[test]
    fn diagnostics_grouped_by_page() {
        let diags = vec![PageDiagnostics::new(
            "broken",
            vec![
                Diagnostic::new(DiagKind::MalformedMetadataLine, "bad line"),
                Diagnostic::new(DiagKind::NoCorrectAnswer, "Q?"),
            ],
        )];
        let lines = format_diagnostics(&diags);
        assert_eq!(lines[1], "Diagnostics");
        assert_eq!(lines[2], "broken");
        assert_eq!(
            lines[3],
            "    warning: malformed metadata line: bad line"
        );
        assert_eq!(lines[4], "    warning: no correct answer: Q?");
    }

    #[test]
    fn no_diagnostics_formats_to_nothing() {
        assert!(format_diagnostics(&[]).is_empty());
    }

    // =========================================================================
    // Build output
    // =========================================================================

    #[test]
    fn build_output_shows_tree_and_summary() {
        let m = manifest(vec![
            record("intro", "Intro", 10),
            record("concepts", "Concepts", 20),
            record("concepts/recursion", "Recursion", 1),
        ]);
        let site = pipeline::render_site(&m).unwrap();
        let report = pipeline::report_for(&m, site.pages.len());
        let lines = format_build_output(&site.tree, &report);

        assert_eq!(lines[0], "001 Intro \u{2192} intro/index.html");
        assert_eq!(lines[1], "002 Concepts \u{2192} concepts/index.html");
        assert_eq!(
            lines[2],
            "    001 Recursion \u{2192} concepts/recursion/index.html"
        );
        assert_eq!(
            lines.last().unwrap(),
            "Rendered 3 pages, 0 warnings, 0 failed"
        );
    }

    #[test]
    fn synthetic_sections_have_no_output_arrow() {
        let m = manifest(vec![record("part/ch1", "Chapter 1", 1)]);
        let site = pipeline::render_site(&m).unwrap();
        let report = pipeline::report_for(&m, 1);
        let lines = format_build_output(&site.tree, &report);
        assert_eq!(lines[0], "001 part");
        assert!(lines[1].contains("\u{2192} part/ch1/index.html"));
    }

    #[test]
    fn root_index_page_listed_first() {
        let m = manifest(vec![record("", "Home", 0), record("a", "A", 1)]);
        let site = pipeline::render_site(&m).unwrap();
        let report = pipeline::report_for(&m, 2);
        let lines = format_build_output(&site.tree, &report);
        assert_eq!(lines[0], "Home \u{2192} index.html");
    }
}
