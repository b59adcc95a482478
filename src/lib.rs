//! # docweave
//!
//! A static site builder for Hugo-style documentation trees. Your content
//! directory is a book: Markdown files with front-matter headers become
//! pages, directory nesting becomes the navigation hierarchy, and
//! `nav_weight` controls sibling order. Pages may embed self-assessment
//! quizzes via the `{{< quizdown >}}` shortcode.
//!
//! # Architecture: Fan-Out / Fan-In Pipeline
//!
//! Every page moves through an ordered stage progression:
//!
//! ```text
//! Raw → MetadataParsed → QuizExtracted → BodyRendered → Rendered
//! ```
//!
//! Per-page work is embarrassingly parallel; the only synchronization point
//! is the navigation tree, which needs complete knowledge of the page set
//! before sibling ordering is defined:
//!
//! ```text
//! 1. Fan out   parse front matter + extract quizzes per page (rayon)
//! 2. Barrier   build the navigation tree from all collected metadata
//! 3. Fan out   render each page against the shared immutable tree
//! ```
//!
//! The collect-then-build shape keeps the aggregation step pure and testable
//! in isolation — no locks, no shared mutable state, no incremental tree
//! mutation as pages stream in.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Stage 1 — walks the content root, parses pages, produces the scan manifest |
//! | [`frontmatter`] | Front-matter block parsing, typed metadata, round-trip serialization |
//! | [`quiz`] | `{{< quizdown >}}` region extraction and validation |
//! | [`navtree`] | Ordered navigation tree: weights, tie-breaks, breadcrumbs, siblings |
//! | [`pipeline`] | Build orchestration: stage machine, fan-out/fan-in, build report |
//! | [`render`] | HTML generation with Maud: page chrome, quiz widgets, Markdown via pulldown-cmark |
//! | [`config`] | `config.toml` loading and validation |
//! | [`diag`] | Collected non-fatal diagnostics (warnings and per-page errors) |
//! | [`output`] | CLI output formatting — information-first display of pipeline results |
//! | [`types`] | Shared types serialized between stages |
//!
//! # Design Decisions
//!
//! ## Diagnostics Over Exceptions
//!
//! Authoring anomalies — a malformed metadata line, a quiz question with two
//! correct answers, an unreadable file — never abort the build. They are
//! collected per page and reported at the end; only duplicate logical paths
//! are fatal, because sibling ordering becomes undefined. A broken header
//! must never stop the body from rendering.
//!
//! ## Maud Over Template Engines
//!
//! HTML is generated with [Maud](https://maud.lambda.xyz/), a compile-time
//! HTML macro system: malformed HTML is a build error, template variables
//! are Rust expressions, and all interpolation is auto-escaped.
//!
//! ## Deterministic Output
//!
//! Re-running the pipeline on an unchanged content tree produces
//! byte-identical pages and identical navigation ordering. `nav_weight`
//! ties break by path comparison, never by filesystem enumeration order.

pub mod config;
pub mod diag;
pub mod frontmatter;
pub mod navtree;
pub mod output;
pub mod pipeline;
pub mod quiz;
pub mod render;
pub mod scan;
pub mod types;
