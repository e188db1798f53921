//! # Markup Renderer
//!
//! Turns an [`AnalysisResult`] into the final content of a render target.
//!
//! ## Dispatch
//! - `Payload::Scalar`: classified first. Pass-through text is inserted
//!   unchanged. Lightweight markup goes to the registered library parser,
//!   then to the fallback rules if that is missing or fails, and finally to a
//!   preformatted, escaped block if even the fallback fails.
//! - `Payload::Structured`: recognized domain records (trend report, content
//!   ideas, performance report) get their card layouts; everything else is a
//!   definition list of field/value pairs. Structured input is never
//!   classified.
//!
//! A result carrying a populated `error` renders as the single `Error: …`
//! line, whatever its payload.
//!
//! Rendering never fails as a whole. The content is built completely before
//! [`Renderer::render_into`] swaps it into the target in one step.

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms, unused_qualifications)]

mod cards;
/// Shared presentational style block.
pub mod styles;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::errors::AnalyzerError;
use crate::markup::{classify, escape_html, FallbackParser, MarkupParser, Verdict};
use crate::model::{
    AnalysisResult, ContentIdeasReport, Payload, PerformanceReport, TrendReport, Workflow,
};
use crate::surface::{Surface, TargetId};
use styles::{SHARED_STYLE_CSS, SHARED_STYLE_ID};

/// Output of one render pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub html: String,
    /// True when the output uses the shared card/grid styles.
    pub rich: bool,
}

/// # Renderer
///
/// Holds the parser chain. Cheap to share behind an `Arc`.
pub struct Renderer {
    library: Option<Box<dyn MarkupParser>>,
    fallback: Box<dyn MarkupParser>,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Renderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Renderer")
            .field("library", &self.library.as_ref().map(|p| p.name()))
            .field("fallback", &self.fallback.name())
            .finish()
    }
}

impl Renderer {
    /// Renderer with the library parser registered when the `cmark` feature
    /// is enabled.
    pub fn new() -> Self {
        #[cfg(feature = "cmark")]
        let library: Option<Box<dyn MarkupParser>> = Some(Box::new(crate::markup::CmarkParser));
        #[cfg(not(feature = "cmark"))]
        let library: Option<Box<dyn MarkupParser>> = None;

        Self::with_parsers(library, Box::new(FallbackParser))
    }

    /// Renderer that always uses the fallback rules.
    pub fn fallback_only() -> Self {
        Self::with_parsers(None, Box::new(FallbackParser))
    }

    pub fn with_parsers(
        library: Option<Box<dyn MarkupParser>>,
        fallback: Box<dyn MarkupParser>,
    ) -> Self {
        Self { library, fallback }
    }

    /// Renders a text payload.
    pub fn render_text(&self, text: &str) -> String {
        match classify(text) {
            Verdict::PassThrough => text.to_string(),
            Verdict::Lightweight(signal) => {
                log::debug!("Lightweight markup detected ({:?}), converting", signal);
                self.convert(text)
            }
        }
    }

    fn convert(&self, text: &str) -> String {
        if let Some(library) = &self.library {
            match library.to_markup(text) {
                Ok(html) => return html,
                Err(e) => log::warn!("{} parser failed: {}. Using fallback rules.", library.name(), e),
            }
        }
        match self.fallback.to_markup(text) {
            Ok(html) => html,
            Err(e) => {
                log::error!("{} parser failed: {}. Showing plain text.", self.fallback.name(), e);
                preformatted(text)
            }
        }
    }

    /// Renders a record as a definition list.
    pub fn render_record(&self, record: &Map<String, Value>) -> String {
        let mut html = String::from("<dl class=\"result-record\">");
        for (field, value) in record {
            html.push_str(&format!(
                "<dt>{}</dt><dd>{}</dd>",
                escape_html(field),
                escape_html(&stringify(value))
            ));
        }
        html.push_str("</dl>");
        html
    }

    /// Renders one result.
    pub fn render(&self, result: &AnalysisResult) -> Rendered {
        if let Some(message) = &result.error {
            let line = AnalyzerError::Application(message.clone()).user_line();
            return Rendered { html: error_line(&line), rich: false };
        }
        match &result.raw_payload {
            Payload::Scalar(text) => Rendered { html: self.render_text(text), rich: false },
            Payload::Structured(record) => self.render_structured(result.workflow, record),
        }
    }

    fn render_structured(&self, workflow: Workflow, record: &Map<String, Value>) -> Rendered {
        let domain = match workflow {
            Workflow::Trend if record.contains_key("trendingVideos") => {
                decode::<TrendReport>(record).map(|r| cards::trend_report(self, &r))
            }
            Workflow::ContentIdea if record.contains_key("contentIdeas") => {
                decode::<ContentIdeasReport>(record).map(|r| cards::content_ideas(self, &r))
            }
            Workflow::Performance | Workflow::PageAnalysis
                if record.contains_key("performanceData") =>
            {
                decode::<PerformanceReport>(record).map(|r| cards::performance_report(self, &r))
            }
            _ => None,
        };

        match domain {
            Some(html) => Rendered { html, rich: true },
            None => Rendered { html: self.render_record(record), rich: false },
        }
    }

    /// Renders `result` and swaps the output into `target`.
    ///
    /// Rich output makes sure the shared style block is present first.
    pub fn render_into(&self, surface: &Surface, target: TargetId, result: &AnalysisResult) {
        let rendered = self.render(result);
        if rendered.rich && surface.inject_style(SHARED_STYLE_ID, SHARED_STYLE_CSS) {
            log::debug!("Injected shared style block '{}'", SHARED_STYLE_ID);
        }
        surface.replace_content(target, rendered.html);
    }
}

fn decode<T: DeserializeOwned>(record: &Map<String, Value>) -> Option<T> {
    match serde_json::from_value::<T>(Value::Object(record.clone())) {
        Ok(report) => Some(report),
        Err(e) => {
            log::warn!("Domain record did not match its layout ({}), showing fields instead", e);
            None
        }
    }
}

/// Scalars as their text; arrays and objects as JSON, nested values included.
fn stringify(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Markup of a single failure line.
pub fn error_line(line: &str) -> String {
    format!("<p class=\"error\">{}</p>", escape_html(line))
}

/// Last-resort display of unconvertible text.
pub fn preformatted(text: &str) -> String {
    format!("<pre class=\"plain-text\">{}</pre>", escape_html(text))
}
