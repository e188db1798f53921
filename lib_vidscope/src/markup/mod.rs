//! # Markup Conversion
//!
//! Everything needed to turn lightweight markup (headings, emphasis, bullets)
//! into structured markup that can be inserted into a render target.
//!
//! ## Contained Modules:
//!
//! - **`classifier`**: heuristic verdict, convert or pass through.
//! - **`fallback`**: the fixed, ordered rule set used when no library parser
//!   is registered or the library parser fails.
//! - **`cmark`**: the pulldown-cmark backed parser (feature `cmark`).
//!
//! Both parsers sit behind the [`MarkupParser`] trait so the renderer can
//! chain them and contain failures the same way.

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms, unused_qualifications)]

/// Heuristic lightweight-markup detection.
pub mod classifier;
/// Regex rule-based lightweight markup converter.
pub mod fallback;
/// pulldown-cmark backed converter.
#[cfg(feature = "cmark")]
pub mod cmark;

pub use classifier::{classify, Verdict};
pub use fallback::FallbackParser;
#[cfg(feature = "cmark")]
pub use cmark::CmarkParser;

use crate::errors::Result;

/// A converter from lightweight markup to structured markup.
pub trait MarkupParser: Send + Sync {
    /// Short name used in log lines.
    fn name(&self) -> &'static str;

    /// Converts `text`. Implementations report failure instead of panicking.
    fn to_markup(&self, text: &str) -> Result<String>;
}

/// Escapes the five HTML-significant characters.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
