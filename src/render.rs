//! HTML page rendering.
//!
//! Takes prepared pages plus the finished navigation tree and produces the
//! final HTML documents.
//!
//! ## Page Anatomy
//!
//! - **Sidebar navigation**: the full nav tree as nested lists, current page
//!   highlighted
//! - **Breadcrumbs**: trail from the site root to the current page
//! - **Body**: Markdown converted to HTML, quiz placeholders substituted
//!   with interactive widgets
//! - **Pager**: previous/next sibling links in nav order
//! - **Footer**: per-page license line, when the front matter carries one
//!
//! ## Output Structure
//!
//! ```text
//! dist/
//! ├── index.html                   # Root index page
//! ├── intro/index.html
//! └── concepts/
//!     ├── index.html               # Section index
//!     └── recursion/index.html
//! ```
//!
//! ## HTML Generation
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating —
//! type-safe templates with automatic XSS escaping. Markdown is converted
//! with pulldown-cmark. Quiz widget HTML is spliced in *after* Markdown
//! rendering, at the `<!--quiz:N-->` placeholders [`crate::quiz`] left in
//! the body (HTML comments pass through pulldown-cmark untouched).
//!
//! Static assets (`static/style.css`, `static/quiz.js`) are embedded at
//! compile time and inlined into every page, so the generated site has no
//! asset files to ship alongside the HTML.

use crate::config::SiteConfig;
use crate::navtree::NavNode;
use crate::quiz::{self, QuizBlock};
use crate::types::{PageRecord, RenderedPage};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use pulldown_cmark::{Options, Parser, html as md_html};

const CSS: &str = include_str!("../static/style.css");
const QUIZ_JS: &str = include_str!("../static/quiz.js");

/// Output file path for a logical page path.
///
/// The root index page maps to `index.html`; everything else gets a
/// directory-style URL (`concepts/recursion/index.html`).
pub fn output_path(logical: &str) -> String {
    if logical.is_empty() {
        "index.html".to_string()
    } else {
        format!("{}/index.html", logical)
    }
}

/// Href from the site root for a logical page path.
fn href(logical: &str) -> String {
    if logical.is_empty() {
        "/".to_string()
    } else {
        format!("/{}/", logical)
    }
}

/// Convert Markdown to HTML with the extensions the corpus relies on
/// (tables, strikethrough, footnotes).
pub fn render_markdown(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_FOOTNOTES);
    let parser = Parser::new_ext(markdown, options);
    let mut out = String::new();
    md_html::push_html(&mut out, parser);
    out
}

/// Render one page to a complete HTML document.
pub fn render_page(page: &PageRecord, tree: &NavNode, config: &SiteConfig) -> RenderedPage {
    let mut body_html = render_markdown(&page.body);

    // Two-phase rendering: splice quiz widgets in at the placeholders.
    for (i, block) in page.quizzes.iter().enumerate() {
        let widget = render_quiz(block, i).into_string();
        body_html = body_html.replace(&quiz::placeholder(i), &widget);
    }

    let title = if page.meta.title.is_empty() {
        page.path.clone()
    } else {
        page.meta.title.clone()
    };

    let nav = render_nav(tree, &page.path, &config.site.title);
    let breadcrumb = render_breadcrumbs(tree, &page.path, &config.site.title);
    let pager = render_pager(tree, &page.path);
    let has_quiz = !page.quizzes.is_empty();

    let content = html! {
        (nav)
        main.page {
            nav.breadcrumb { (breadcrumb) }
            article {
                (PreEscaped(body_html))
            }
            @if !page.meta.tags.is_empty() {
                div.tags {
                    @for tag in &page.meta.tags {
                        span.tag { (tag) }
                    }
                }
            }
            (pager)
            @if !page.meta.license.is_empty() {
                footer.page-footer { (page.meta.license) }
            }
        }
        @if has_quiz {
            script { (PreEscaped(QUIZ_JS)) }
        }
    };

    let html = base_document(&title, &page.meta.description, &canonical_url(page, config), content)
        .into_string();

    RenderedPage {
        path: page.path.clone(),
        title,
        output_path: output_path(&page.path),
        html,
    }
}

/// Canonical URL: the front-matter value wins; otherwise derived from
/// `site.base_url` when configured.
fn canonical_url(page: &PageRecord, config: &SiteConfig) -> String {
    if !page.meta.canonical.is_empty() {
        page.meta.canonical.clone()
    } else if !config.site.base_url.is_empty() {
        format!(
            "{}{}",
            config.site.base_url.trim_end_matches('/'),
            href(&page.path)
        )
    } else {
        String::new()
    }
}

// ============================================================================
// HTML Components
// ============================================================================

/// Renders the base HTML document structure.
fn base_document(title: &str, description: &str, canonical: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                @if !description.is_empty() {
                    meta name="description" content=(description);
                }
                @if !canonical.is_empty() {
                    link rel="canonical" href=(canonical);
                }
                style { (PreEscaped(CSS)) }
            }
            body {
                (content)
            }
        }
    }
}

/// Renders the sidebar navigation from the nav tree.
pub fn render_nav(tree: &NavNode, current_path: &str, site_title: &str) -> Markup {
    html! {
        nav.site-nav {
            a.site-title href="/" { (site_title) }
            ul {
                @for child in &tree.children {
                    (render_nav_item(child, current_path))
                }
            }
        }
    }
}

/// Renders a single navigation item (may have children).
fn render_nav_item(node: &NavNode, current_path: &str) -> Markup {
    let is_current = node.path == current_path
        || current_path.starts_with(&format!("{}/", node.path));

    html! {
        li class=[is_current.then_some("current")] {
            a href=(href(&node.path)) { (node.title()) }
            @if !node.children.is_empty() {
                ul {
                    @for child in &node.children {
                        (render_nav_item(child, current_path))
                    }
                }
            }
        }
    }
}

/// Renders the breadcrumb trail for a page.
fn render_breadcrumbs(tree: &NavNode, path: &str, site_title: &str) -> Markup {
    let trail = tree.breadcrumbs(path).unwrap_or_default();
    html! {
        a href="/" { (site_title) }
        @for (title, crumb_path) in &trail {
            " › "
            @if crumb_path == path {
                (title)
            } @else {
                a href=(href(crumb_path)) { (title) }
            }
        }
    }
}

/// Renders previous/next sibling links.
fn render_pager(tree: &NavNode, path: &str) -> Markup {
    let (prev, next) = tree.siblings(path);
    html! {
        @if prev.is_some() || next.is_some() {
            nav.pager {
                span {
                    @if let Some(p) = prev {
                        a href=(href(&p.path)) { "← " (p.title()) }
                    }
                }
                span {
                    @if let Some(n) = next {
                        a href=(href(&n.path)) { (n.title()) " →" }
                    }
                }
            }
        }
    }
}

/// Renders one quiz block as an interactive widget.
///
/// Each question is a fieldset of radio options carrying a `data-correct`
/// attribute the embedded script reads. Questions that violate the
/// one-correct-answer convention get a visible anomaly marker — the
/// diagnostic was already recorded at extraction time.
fn render_quiz(block: &QuizBlock, block_idx: usize) -> Markup {
    html! {
        div.quiz {
            @for (qi, question) in block.questions.iter().enumerate() {
                fieldset {
                    legend { (question.prompt) }
                    @if question.correct_count() != 1 {
                        p.quiz-anomaly { "This question does not have exactly one correct answer." }
                    }
                    @for (oi, option) in question.options.iter().enumerate() {
                        label {
                            input
                                type="radio"
                                name=(format!("quiz-{}-q{}", block_idx, qi))
                                value=(oi)
                                data-correct=(option.correct);
                            " "
                            (option.text)
                        }
                    }
                    @if !question.explanation.is_empty() {
                        div.explanation { (question.explanation) }
                    }
                }
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
