//! Quiz block extraction.
//!
//! Page bodies may embed self-assessment quizzes using the `quizdown`
//! shortcode:
//!
//! ```text
//! {{< quizdown >}}
//!
//! ### What does `map` return?
//!
//! - [x] A lazy sequence
//! - [ ] A vector
//! - [ ] Nothing
//!
//! > **Explanation:** `map` produces a lazy seq; nothing is realized until
//!
//! {{< /quizdown >}}
//! ```
//!
//! ## Grammar
//!
//! Inside a region, a `### ` heading starts a question (its text is the
//! prompt), `- [x]` / `- [ ]` bullets are its options (`[x]` marks correct),
//! and a `> **Explanation:**` blockquote is the explanation, terminating the
//! question. Immediately following `>` lines continue the explanation.
//!
//! ## Two-phase rendering
//!
//! Each extracted region is replaced in the returned body with a placeholder
//! comment `<!--quiz:N-->` (N is the zero-based block index within the page).
//! HTML comments pass through the Markdown renderer untouched, so the
//! shortcode syntax never reaches it; [`crate::render`] substitutes the quiz
//! widget HTML at the placeholder afterwards. This choice is stable: the
//! placeholder format is part of the module contract.
//!
//! ## Validation
//!
//! The corpus convention is exactly one correct option per question. Zero or
//! multiple `[x]` markers are authoring anomalies, surfaced as non-fatal
//! diagnostics ("no correct answer" / "multiple correct answers") — the block
//! is still extracted as written and downstream decides whether that breaks
//! the build. An unclosed `{{< quizdown >}}` leaves the region in the body
//! verbatim with an "unclosed quiz block" warning.

use crate::diag::{DiagKind, Diagnostic};
use serde::{Deserialize, Serialize};

const OPEN_TAG: &str = "{{< quizdown >}}";
const CLOSE_TAG: &str = "{{< /quizdown >}}";
const EXPLANATION_MARKER: &str = "> **Explanation:**";

/// One quiz region extracted from a page body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizBlock {
    pub questions: Vec<Question>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub prompt: String,
    pub options: Vec<QuizOption>,
    pub explanation: String,
}

impl Question {
    pub fn correct_count(&self) -> usize {
        self.options.iter().filter(|o| o.correct).count()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizOption {
    pub text: String,
    pub correct: bool,
}

/// Result of scanning a body for quiz regions.
#[derive(Debug, Clone)]
pub struct QuizExtraction {
    /// Body with each closed quiz region replaced by `<!--quiz:N-->`.
    pub body: String,
    pub blocks: Vec<QuizBlock>,
    pub diagnostics: Vec<Diagnostic>,
}

/// The placeholder emitted for block index `n`.
pub fn placeholder(n: usize) -> String {
    format!("<!--quiz:{}-->", n)
}

/// Scan `body` for `{{< quizdown >}}` regions and parse them.
///
/// Pure transformation over text; anomalies are reported through diagnostics
/// and never abort the page.
pub fn extract(body: &str) -> QuizExtraction {
    let mut out_lines: Vec<String> = Vec::new();
    let mut blocks = Vec::new();
    let mut diagnostics = Vec::new();

    let mut lines = body.lines();
    while let Some(line) = lines.next() {
        if line.trim() != OPEN_TAG {
            out_lines.push(line.to_string());
            continue;
        }

        // Capture region lines up to the close tag.
        let mut region: Vec<&str> = Vec::new();
        let mut closed = false;
        for inner in lines.by_ref() {
            if inner.trim() == CLOSE_TAG {
                closed = true;
                break;
            }
            region.push(inner);
        }

        if !closed {
            diagnostics.push(Diagnostic::new(
                DiagKind::UnclosedQuizBlock,
                "{{< quizdown >}} with no matching close tag",
            ));
            // Leave the region in the body as authored.
            out_lines.push(line.to_string());
            out_lines.extend(region.iter().map(|l| l.to_string()));
            continue;
        }

        let block = parse_block(&region, &mut diagnostics);
        out_lines.push(placeholder(blocks.len()));
        blocks.push(block);
    }

    let mut body = out_lines.join("\n");
    if !body.is_empty() {
        body.push('\n');
    }

    QuizExtraction {
        body,
        blocks,
        diagnostics,
    }
}

/// Parse the lines of one closed quiz region into questions.
fn parse_block(lines: &[&str], diagnostics: &mut Vec<Diagnostic>) -> QuizBlock {
    let mut questions: Vec<Question> = Vec::new();
    let mut current: Option<Question> = None;
    let mut in_explanation = false;

    for line in lines {
        let trimmed = line.trim();

        if let Some(prompt) = trimmed.strip_prefix("### ") {
            finish_question(&mut current, diagnostics, &mut questions);
            current = Some(Question {
                prompt: prompt.trim().to_string(),
                options: Vec::new(),
                explanation: String::new(),
            });
            in_explanation = false;
            continue;
        }

        let Some(question) = current.as_mut() else {
            continue;
        };

        if let Some(text) = trimmed.strip_prefix("- [x]") {
            question.options.push(QuizOption {
                text: text.trim().to_string(),
                correct: true,
            });
            in_explanation = false;
        } else if let Some(text) = trimmed.strip_prefix("- [ ]") {
            question.options.push(QuizOption {
                text: text.trim().to_string(),
                correct: false,
            });
            in_explanation = false;
        } else if let Some(text) = trimmed.strip_prefix(EXPLANATION_MARKER) {
            question.explanation = text.trim().to_string();
            in_explanation = true;
        } else if in_explanation && trimmed.starts_with('>') {
            let cont = trimmed.trim_start_matches('>').trim();
            if !cont.is_empty() {
                if !question.explanation.is_empty() {
                    question.explanation.push(' ');
                }
                question.explanation.push_str(cont);
            }
        } else if !trimmed.is_empty() {
            in_explanation = false;
        }
    }

    finish_question(&mut current, diagnostics, &mut questions);
    QuizBlock { questions }
}

/// Validate and store a completed question.
fn finish_question(
    current: &mut Option<Question>,
    diagnostics: &mut Vec<Diagnostic>,
    questions: &mut Vec<Question>,
) {
    let Some(question) = current.take() else {
        return;
    };
    match question.correct_count() {
        1 => {}
        0 => diagnostics.push(Diagnostic::new(DiagKind::NoCorrectAnswer, &question.prompt)),
        _ => diagnostics.push(Diagnostic::new(
            DiagKind::MultipleCorrectAnswers,
            &question.prompt,
        )),
    }
    questions.push(question);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diag::DiagKind;

    const THREE_QUESTIONS: &str = r#"Some intro prose.

## Quiz: Check Your Understanding

{{< quizdown >}}

### First question?

- [x] Right
- [ ] Wrong A
- [ ] Wrong B

> **Explanation:** Because it is right.

### Second question?

- [ ] Wrong
- [x] Right

> **Explanation:** Also right.

### Third question?

- [x] Only option

> **Explanation:** Trivially.

{{< /quizdown >}}

Closing prose.
"#;

    // =========================================================================
    // Extraction
    // =========================================================================

    #[test]
    fn extracts_all_questions() {
        let result = extract(THREE_QUESTIONS);
        assert_eq!(result.blocks.len(), 1);
        assert_eq!(result.blocks[0].questions.len(), 3);
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn question_count_matches_heading_count() {
        let result = extract(THREE_QUESTIONS);
        let headings = THREE_QUESTIONS
            .lines()
            .filter(|l| l.starts_with("### "))
            .count();
        assert_eq!(result.blocks[0].questions.len(), headings);
    }

    #[test]
    fn options_keep_order_and_correctness() {
        let result = extract(THREE_QUESTIONS);
        let q = &result.blocks[0].questions[0];
        assert_eq!(q.prompt, "First question?");
        assert_eq!(q.options.len(), 3);
        assert!(q.options[0].correct);
        assert_eq!(q.options[0].text, "Right");
        assert!(!q.options[1].correct);
        assert!(!q.options[2].correct);
    }

    #[test]
    fn explanation_captured() {
        let result = extract(THREE_QUESTIONS);
        assert_eq!(
            result.blocks[0].questions[0].explanation,
            "Because it is right."
        );
    }

    #[test]
    fn multi_line_explanation_joined() {
        let body = "{{< quizdown >}}\n### Q?\n- [x] A\n> **Explanation:** First part\n> second part.\n{{< /quizdown >}}\n";
        let result = extract(body);
        assert_eq!(
            result.blocks[0].questions[0].explanation,
            "First part second part."
        );
    }

    #[test]
    fn body_without_quizzes_passes_through() {
        let body = "# Heading\n\nProse only.\n";
        let result = extract(body);
        assert_eq!(result.body, body);
        assert!(result.blocks.is_empty());
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn region_replaced_with_placeholder() {
        let result = extract(THREE_QUESTIONS);
        assert!(result.body.contains("<!--quiz:0-->"));
        assert!(!result.body.contains(OPEN_TAG));
        assert!(!result.body.contains(CLOSE_TAG));
        assert!(result.body.contains("Some intro prose."));
        assert!(result.body.contains("Closing prose."));
    }

    #[test]
    fn multiple_blocks_indexed_in_order() {
        let body = "{{< quizdown >}}\n### A?\n- [x] a\n{{< /quizdown >}}\nmiddle\n{{< quizdown >}}\n### B?\n- [x] b\n{{< /quizdown >}}\n";
        let result = extract(body);
        assert_eq!(result.blocks.len(), 2);
        assert!(result.body.contains("<!--quiz:0-->"));
        assert!(result.body.contains("<!--quiz:1-->"));
        assert_eq!(result.blocks[0].questions[0].prompt, "A?");
        assert_eq!(result.blocks[1].questions[0].prompt, "B?");
    }

    // =========================================================================
    // Validation anomalies
    // =========================================================================

    #[test]
    fn zero_correct_options_flagged() {
        let body = "{{< quizdown >}}\n### Hard one?\n- [ ] A\n- [ ] B\n{{< /quizdown >}}\n";
        let result = extract(body);
        assert_eq!(result.blocks[0].questions.len(), 1);
        assert_eq!(result.diagnostics.len(), 1);
        assert_eq!(result.diagnostics[0].kind, DiagKind::NoCorrectAnswer);
        assert_eq!(result.diagnostics[0].detail, "Hard one?");
    }

    #[test]
    fn multiple_correct_options_flagged() {
        let body = "{{< quizdown >}}\n### Pick all?\n- [x] A\n- [x] B\n- [ ] C\n{{< /quizdown >}}\n";
        let result = extract(body);
        assert_eq!(result.diagnostics.len(), 1);
        assert_eq!(
            result.diagnostics[0].kind,
            DiagKind::MultipleCorrectAnswers
        );
    }

    #[test]
    fn anomalous_block_still_extracted() {
        let body = "{{< quizdown >}}\n### Q?\n- [x] A\n- [x] B\n{{< /quizdown >}}\n";
        let result = extract(body);
        assert_eq!(result.blocks[0].questions[0].options.len(), 2);
        assert_eq!(result.blocks[0].questions[0].correct_count(), 2);
    }

    #[test]
    fn unclosed_block_left_in_body_with_warning() {
        let body = "prose\n{{< quizdown >}}\n### Q?\n- [x] A\n";
        let result = extract(body);
        assert!(result.blocks.is_empty());
        assert_eq!(result.diagnostics.len(), 1);
        assert_eq!(result.diagnostics[0].kind, DiagKind::UnclosedQuizBlock);
        assert!(result.body.contains(OPEN_TAG));
        assert!(result.body.contains("### Q?"));
    }

    #[test]
    fn empty_region_yields_empty_block() {
        let body = "{{< quizdown >}}\n{{< /quizdown >}}\n";
        let result = extract(body);
        assert_eq!(result.blocks.len(), 1);
        assert!(result.blocks[0].questions.is_empty());
        assert!(result.diagnostics.is_empty());
    }
}
