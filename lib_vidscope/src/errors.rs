//! # Error Taxonomy
//!
//! Every failure a workflow can meet is one variant of [`AnalyzerError`].
//! None of them is fatal to the process: the orchestrator and the renderer
//! turn each one into a single inline message in the owning render target.

use thiserror::Error;

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, AnalyzerError>;

#[derive(Debug, Error)]
/// # Analyzer Error
///
/// Classifies failures by where they originate.
pub enum AnalyzerError {
    /// The user input was rejected before any remote call was made.
    #[error("{0}")]
    Validation(String),

    /// The network was unreachable or the response could not be decoded.
    #[error("{0}")]
    Transport(String),

    /// The remote service answered with a non-success status code.
    #[error("Server responded with status {status}{}", detail_suffix(.detail))]
    Protocol {
        /// Numeric HTTP status.
        status: u16,
        /// The `error` text of the response body, when it carried one.
        detail: Option<String>,
        /// Raw response body, kept for logging.
        body: Option<String>,
    },

    /// The payload decoded fine but carries an explicit error field.
    #[error("{0}")]
    Application(String),

    /// Classification or markup conversion failed.
    #[error("Render failed: {0}")]
    Render(String),

    /// The key-value store could not be read or written.
    #[error("Store error: {0}")]
    Store(String),

    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(String),
}

fn detail_suffix(detail: &Option<String>) -> String {
    match detail {
        Some(text) => format!(": {}", text),
        None => String::new(),
    }
}

impl AnalyzerError {
    /// The single human-readable line written into a render target.
    pub fn user_line(&self) -> String {
        format!("Error: {}", self)
    }

    /// True for errors the user must correct before trying again.
    pub fn is_validation(&self) -> bool {
        matches!(self, AnalyzerError::Validation(_))
    }
}

impl From<std::io::Error> for AnalyzerError {
    fn from(e: std::io::Error) -> Self {
        AnalyzerError::Store(e.to_string())
    }
}

impl From<serde_json::Error> for AnalyzerError {
    fn from(e: serde_json::Error) -> Self {
        AnalyzerError::Transport(format!("Failed to decode payload: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_line_is_prefixed() {
        let err = AnalyzerError::Application("Invalid YouTube URL".into());
        assert_eq!(err.user_line(), "Error: Invalid YouTube URL");
    }

    #[test]
    fn protocol_error_mentions_status() {
        let err = AnalyzerError::Protocol { status: 500, detail: None, body: Some("boom".into()) };
        assert_eq!(err.user_line(), "Error: Server responded with status 500");

        let err = AnalyzerError::Protocol {
            status: 500,
            detail: Some("Upstream quota exceeded".into()),
            body: None,
        };
        assert_eq!(
            err.user_line(),
            "Error: Server responded with status 500: Upstream quota exceeded"
        );
    }
}
