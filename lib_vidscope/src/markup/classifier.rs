//! # Content Classifier
//!
//! Decides whether a string is lightweight markup that needs converting or
//! content that must be inserted as-is. The check is a best-effort
//! heuristic; misclassification is tolerated, panicking is not.
//!
//! ## Priority:
//! 1. A leading structured-markup opening token always wins: already rendered
//!    content is never parsed a second time.
//! 2. Otherwise any one lightweight signal is enough (emphasis pair, heading
//!    marker, bullet line, numbered line, underscore emphasis).
//! 3. No signal at all means pass-through.

use regex::Regex;
use static_init::dynamic;

#[dynamic]
static MARKUP_OPEN: Regex = Regex::new(r"^\s*<(?:[A-Za-z]|!|/)").unwrap();
#[dynamic]
static EMPHASIS_PAIR: Regex = Regex::new(r"\*{1,2}[^*\n]+\*{1,2}").unwrap();
#[dynamic]
static HEADING_MARKER: Regex = Regex::new(r"(?m)^\s*#{1,6}\s").unwrap();
#[dynamic]
static BULLET_LINE: Regex = Regex::new(r"(?m)^\s*[*-]\s+\S").unwrap();
#[dynamic]
static NUMBERED_LINE: Regex = Regex::new(r"(?m)^\s*\d+[.)]\s+\S").unwrap();
#[dynamic]
static UNDERSCORE_PAIR: Regex = Regex::new(r"(?:^|\W)_[^_\n]+_(?:\W|$)").unwrap();

/// Which heuristic signal marked a string as lightweight markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Emphasis,
    Heading,
    Bullet,
    Numbered,
    Underscore,
}

/// Classification outcome, recomputed on every render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Needs conversion; carries the first signal that matched.
    Lightweight(Signal),
    /// Insert unchanged.
    PassThrough,
}

impl Verdict {
    pub fn is_lightweight_markup(&self) -> bool {
        matches!(self, Verdict::Lightweight(_))
    }
}

/// Classifies `text`.
pub fn classify(text: &str) -> Verdict {
    if MARKUP_OPEN.is_match(text) {
        return Verdict::PassThrough;
    }

    let checks: [(&Regex, Signal); 5] = [
        (&*EMPHASIS_PAIR, Signal::Emphasis),
        (&*HEADING_MARKER, Signal::Heading),
        (&*BULLET_LINE, Signal::Bullet),
        (&*NUMBERED_LINE, Signal::Numbered),
        (&*UNDERSCORE_PAIR, Signal::Underscore),
    ];

    checks
        .iter()
        .find(|(pattern, _)| pattern.is_match(text))
        .map(|(_, signal)| Verdict::Lightweight(*signal))
        .unwrap_or(Verdict::PassThrough)
}
