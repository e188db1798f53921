//! # CommonMark Parser
//!
//! The richer parser registered by default. Unlike the fallback rules it
//! handles ordered and nested lists, code spans and tables.

use pulldown_cmark::{html, Options, Parser};

use super::MarkupParser;
use crate::errors::{AnalyzerError, Result};

/// pulldown-cmark backed [`MarkupParser`].
#[derive(Debug, Default, Clone, Copy)]
pub struct CmarkParser;

impl CmarkParser {
    fn options() -> Options {
        Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS
    }
}

impl MarkupParser for CmarkParser {
    fn name(&self) -> &'static str {
        "cmark"
    }

    fn to_markup(&self, text: &str) -> Result<String> {
        let parser = Parser::new_ext(text, Self::options());
        let mut out = String::with_capacity(text.len() * 3 / 2);
        html::push_html(&mut out, parser);
        if out.trim().is_empty() && !text.trim().is_empty() {
            return Err(AnalyzerError::Render(
                "cmark produced no output for non-empty input".into(),
            ));
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_reference_document() {
        let out = CmarkParser
            .to_markup("# Title\n\n**bold** and *italic*\n- item one\n- item two")
            .unwrap();
        assert!(out.contains("<h1>Title</h1>"));
        assert!(out.contains("<strong>bold</strong>"));
        assert!(out.contains("<em>italic</em>"));
        assert!(out.contains("<ul>"));
        assert_eq!(out.matches("<li>").count(), 2);
    }

    #[test]
    fn ordered_lists_are_supported() {
        let out = CmarkParser.to_markup("1. first\n2. second").unwrap();
        assert!(out.contains("<ol>"));
    }
}
