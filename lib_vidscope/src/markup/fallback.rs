//! # Fallback Markup Parser
//!
//! A fixed, ordered list of text rewriting rules. Each rule is a pure
//! function over the whole text and later rules see the output of earlier
//! ones, so the order below is part of the contract:
//!
//! 1. `headings`   `#`..`####` lines to `<h1>`..`<h4>`
//! 2. `bold`       `**x**` / `__x__` to `<strong>`
//! 3. `italic`     `*x*` / `_x_` to `<em>`
//! 4. `bullets`    `* x` / `- x` lines to `<li>`
//! 5. `lists`      runs of `<li>` lines wrapped in one `<ul>`
//! 6. `paragraphs` remaining untagged lines wrapped in `<p>`
//! 7. `breaks`     blank-line pairs to `<br>`
//!
//! ## Known limitations
//! These are kept as they are; callers wanting real CommonMark use the
//! library parser.
//! - Nested lists and ordered lists are not recognized; numbered lines end up
//!   as paragraphs.
//! - Italic runs before bullets, so a bullet line holding a second `*`
//!   loses its marker to an `<em>`.
//! - Underscore emphasis also fires inside `snake_case_words`.
//! - The break pass runs after paragraph wrapping and can stack redundant
//!   `<br>` elements between blocks.
//! - Text is not escaped; raw `<` in the input is emitted verbatim.

use regex::{Captures, Regex};
use static_init::dynamic;

use super::MarkupParser;
use crate::errors::Result;

#[dynamic]
static H4: Regex = Regex::new(r"(?m)^#### (.*)$").unwrap();
#[dynamic]
static H3: Regex = Regex::new(r"(?m)^### (.*)$").unwrap();
#[dynamic]
static H2: Regex = Regex::new(r"(?m)^## (.*)$").unwrap();
#[dynamic]
static H1: Regex = Regex::new(r"(?m)^# (.*)$").unwrap();
#[dynamic]
static BOLD_STARS: Regex = Regex::new(r"\*\*(.+?)\*\*").unwrap();
#[dynamic]
static BOLD_UNDERSCORES: Regex = Regex::new(r"__(.+?)__").unwrap();
#[dynamic]
static ITALIC_STAR: Regex = Regex::new(r"\*([^*\n]+?)\*").unwrap();
#[dynamic]
static ITALIC_UNDERSCORE: Regex = Regex::new(r"_([^_\n]+?)_").unwrap();
#[dynamic]
static BULLET: Regex = Regex::new(r"(?m)^[*-] (.*)$").unwrap();
#[dynamic]
static LIST_RUN: Regex = Regex::new(r"(?m)^<li>.*</li>(?:\n<li>.*</li>)*").unwrap();
#[dynamic]
static BLOCK_TAG: Regex =
    Regex::new(r"^\s*</?(?:h[1-6]|ul|ol|li|p|pre|div|blockquote|table|br)\b").unwrap();

/// One named rewriting step.
#[derive(Clone, Copy)]
pub struct Rule {
    pub name: &'static str,
    pub apply: fn(&str) -> String,
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Rule").field(&self.name).finish()
    }
}

/// The rule set, in application order.
pub const RULES: &[Rule] = &[
    Rule { name: "headings", apply: headings },
    Rule { name: "bold", apply: bold },
    Rule { name: "italic", apply: italic },
    Rule { name: "bullets", apply: bullets },
    Rule { name: "lists", apply: lists },
    Rule { name: "paragraphs", apply: paragraphs },
    Rule { name: "breaks", apply: breaks },
];

fn headings(text: &str) -> String {
    let text = H4.replace_all(text, "<h4>$1</h4>");
    let text = H3.replace_all(&text, "<h3>$1</h3>");
    let text = H2.replace_all(&text, "<h2>$1</h2>");
    H1.replace_all(&text, "<h1>$1</h1>").into_owned()
}

fn bold(text: &str) -> String {
    let text = BOLD_STARS.replace_all(text, "<strong>$1</strong>");
    BOLD_UNDERSCORES.replace_all(&text, "<strong>$1</strong>").into_owned()
}

fn italic(text: &str) -> String {
    let text = ITALIC_STAR.replace_all(text, "<em>$1</em>");
    ITALIC_UNDERSCORE.replace_all(&text, "<em>$1</em>").into_owned()
}

fn bullets(text: &str) -> String {
    BULLET.replace_all(text, "<li>$1</li>").into_owned()
}

fn lists(text: &str) -> String {
    LIST_RUN
        .replace_all(text, |caps: &Captures<'_>| format!("<ul>{}</ul>", &caps[0]))
        .into_owned()
}

fn paragraphs(text: &str) -> String {
    text.split('\n')
        .map(|line| {
            if line.trim().is_empty() || BLOCK_TAG.is_match(line) {
                line.to_string()
            } else {
                format!("<p>{}</p>", line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn breaks(text: &str) -> String {
    text.replace("\n\n", "<br>")
}

/// Runs every rule over `text`, in order.
pub fn convert(text: &str) -> String {
    RULES
        .iter()
        .fold(text.to_string(), |acc, rule| (rule.apply)(&acc))
}

/// [`MarkupParser`] wrapper around [`convert`].
#[derive(Debug, Default, Clone, Copy)]
pub struct FallbackParser;

impl MarkupParser for FallbackParser {
    fn name(&self) -> &'static str {
        "fallback"
    }

    fn to_markup(&self, text: &str) -> Result<String> {
        Ok(convert(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_order_is_fixed() {
        let names: Vec<_> = RULES.iter().map(|r| r.name).collect();
        assert_eq!(
            names,
            ["headings", "bold", "italic", "bullets", "lists", "paragraphs", "breaks"]
        );
    }

    #[test]
    fn converts_the_reference_document() {
        let out = convert("# Title\n\n**bold** and *italic*\n- item one\n- item two");
        assert_eq!(
            out,
            "<h1>Title</h1><br><p><strong>bold</strong> and <em>italic</em></p>\n\
             <ul><li>item one</li>\n<li>item two</li></ul>"
        );
    }

    #[test]
    fn heading_levels_map_one_to_four() {
        let out = convert("#### d\n### c\n## b\n# a");
        assert!(out.contains("<h4>d</h4>"));
        assert!(out.contains("<h3>c</h3>"));
        assert!(out.contains("<h2>b</h2>"));
        assert!(out.contains("<h1>a</h1>"));
    }

    #[test]
    fn underscore_forms_convert_too() {
        let out = convert("__strong__ and _soft_");
        assert_eq!(out, "<p><strong>strong</strong> and <em>soft</em></p>");
    }

    #[test]
    fn separate_runs_get_separate_lists() {
        let out = convert("- a\n- b\nmiddle\n* c");
        assert_eq!(
            out,
            "<ul><li>a</li>\n<li>b</li></ul>\n<p>middle</p>\n<ul><li>c</li></ul>"
        );
    }

    #[test]
    fn numbered_lines_stay_paragraphs() {
        let out = convert("1. first\n2. second");
        assert_eq!(out, "<p>1. first</p>\n<p>2. second</p>");
    }

    #[test]
    fn snake_case_is_mangled_as_documented() {
        assert_eq!(convert("my_var_name"), "<p>my<em>var</em>name</p>");
    }

    #[test]
    fn blank_line_pairs_become_breaks_after_wrapping() {
        assert_eq!(convert("one\n\ntwo"), "<p>one</p><br><p>two</p>");
        assert_eq!(convert("one\n\n\n\ntwo"), "<p>one</p><br><br><p>two</p>");
    }

    #[test]
    fn empty_input_stays_empty() {
        assert_eq!(convert(""), "");
    }

    #[test]
    fn parser_trait_never_fails() {
        assert!(FallbackParser.to_markup("*unbalanced **markers").is_ok());
    }
}
