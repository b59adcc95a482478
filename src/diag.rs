//! Collected diagnostics for the build pipeline.
//!
//! Most anomalies docweave encounters are not fatal: a malformed front-matter
//! line, a quiz question with two correct answers, an unreadable source file.
//! These are recorded as [`Diagnostic`]s attached to the affected page and the
//! build proceeds. The single fatal condition — duplicate logical paths — is
//! modeled as an error ([`crate::navtree::NavTreeError`]), not a diagnostic.
//!
//! ## Severity
//!
//! - **Warning**: the page still renders; the anomaly is surfaced in the
//!   build summary. `check --strict` promotes warnings to a failing exit.
//! - **Error**: the page is excluded from the render set (currently only
//!   unreadable sources), but the build of all other pages continues.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// What went wrong. The display string is the stable, user-facing kind label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiagKind {
    /// Front matter opened with `---` but never closed.
    MissingClosingDelimiter,
    /// A metadata line with no `:` separator.
    MalformedMetadataLine,
    /// `nav_weight` present but not an integer.
    UnparsableNavWeight,
    /// `date` present but not `YYYY-MM-DD`.
    UnparsableDate,
    /// A quiz question with zero `[x]` options.
    NoCorrectAnswer,
    /// A quiz question with two or more `[x]` options.
    MultipleCorrectAnswers,
    /// `{{< quizdown >}}` with no matching close tag.
    UnclosedQuizBlock,
    /// The source file could not be read.
    PageRead,
}

impl DiagKind {
    pub fn severity(&self) -> Severity {
        match self {
            DiagKind::PageRead => Severity::Error,
            _ => Severity::Warning,
        }
    }
}

impl fmt::Display for DiagKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DiagKind::MissingClosingDelimiter => "missing closing delimiter",
            DiagKind::MalformedMetadataLine => "malformed metadata line",
            DiagKind::UnparsableNavWeight => "unparsable nav_weight",
            DiagKind::UnparsableDate => "unparsable date",
            DiagKind::NoCorrectAnswer => "no correct answer",
            DiagKind::MultipleCorrectAnswers => "multiple correct answers",
            DiagKind::UnclosedQuizBlock => "unclosed quiz block",
            DiagKind::PageRead => "page read failed",
        };
        write!(f, "{}", label)
    }
}

/// A single recorded anomaly. `detail` carries context: the offending line,
/// the question prompt, the I/O error text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: DiagKind,
    pub detail: String,
}

impl Diagnostic {
    pub fn new(kind: DiagKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }

    pub fn severity(&self) -> Severity {
        self.kind.severity()
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.detail.is_empty() {
            write!(f, "{}: {}", self.severity(), self.kind)
        } else {
            write!(f, "{}: {}: {}", self.severity(), self.kind, self.detail)
        }
    }
}

/// All diagnostics recorded for one page, keyed by its logical path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageDiagnostics {
    pub page: String,
    pub entries: Vec<Diagnostic>,
}

impl PageDiagnostics {
    pub fn new(page: impl Into<String>, entries: Vec<Diagnostic>) -> Self {
        Self {
            page: page.into(),
            entries,
        }
    }

    /// The worst severity recorded for this page.
    pub fn max_severity(&self) -> Option<Severity> {
        self.entries.iter().map(|d| d.severity()).max()
    }
}

/// Count diagnostics of a given severity across all pages.
pub fn count_by_severity(diags: &[PageDiagnostics], severity: Severity) -> usize {
    diags
        .iter()
        .flat_map(|p| &p.entries)
        .filter(|d| d.severity() == severity)
        .count()
}
