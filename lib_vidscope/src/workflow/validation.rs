//! Input checks run before any remote call is made.

use url::Url;

use crate::errors::{AnalyzerError, Result};
use crate::model::Workflow;

/// Prompt shown when the workflow's input is blank.
pub fn empty_input_prompt(workflow: Workflow) -> &'static str {
    match workflow {
        Workflow::Trend => "Please enter a niche keyword",
        Workflow::ContentIdea => "Please enter a content prompt",
        Workflow::Performance => "Please enter a YouTube video URL",
        Workflow::PageAnalysis => "No video id found on this page",
    }
}

/// Checks `input` for `workflow` and returns the trimmed value to send.
///
/// Performance tracking additionally requires a URL a video id can be
/// extracted from.
pub fn validate(workflow: Workflow, input: &str) -> Result<String> {
    let value = input.trim();
    if value.is_empty() {
        return Err(AnalyzerError::Validation(empty_input_prompt(workflow).to_string()));
    }
    if workflow == Workflow::Performance {
        extract_video_id(value)?;
    }
    Ok(value.to_string())
}

/// Pulls the video id out of a watch URL or a short URL.
///
/// * `youtube.com/watch?v=ID&...` yields `ID`
/// * `youtu.be/ID?...` yields `ID`
///
/// A missing scheme is tolerated (`youtu.be/ID`).
pub fn extract_video_id(input: &str) -> Result<String> {
    let invalid = || AnalyzerError::Validation("Invalid YouTube URL".to_string());

    let trimmed = input.trim();
    let url = Url::parse(trimmed)
        .or_else(|_| Url::parse(&format!("https://{}", trimmed)))
        .map_err(|_| invalid())?;
    let host = url.host_str().ok_or_else(invalid)?.to_ascii_lowercase();

    let id = if host == "youtube.com" || host.ends_with(".youtube.com") {
        url.query_pairs()
            .find(|(k, _)| k == "v")
            .map(|(_, v)| v.into_owned())
    } else if host == "youtu.be" {
        url.path_segments()
            .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
            .map(str::to_string)
    } else {
        None
    };

    id.filter(|id| !id.is_empty()).ok_or_else(invalid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("https://www.youtube.com/watch?v=dQw4w9WgXcQ", "dQw4w9WgXcQ")]
    #[case("https://youtube.com/watch?v=abc123&t=42s", "abc123")]
    #[case("https://m.youtube.com/watch?feature=share&v=xyz", "xyz")]
    #[case("https://youtu.be/dQw4w9WgXcQ", "dQw4w9WgXcQ")]
    #[case("https://youtu.be/dQw4w9WgXcQ?si=tracking", "dQw4w9WgXcQ")]
    #[case("youtu.be/short1", "short1")]
    fn extracts_ids(#[case] url: &str, #[case] expected: &str) {
        assert_eq!(extract_video_id(url).unwrap(), expected);
    }

    #[rstest]
    #[case("https://vimeo.com/12345")]
    #[case("https://www.youtube.com/feed/trending")]
    #[case("https://youtu.be/")]
    #[case("not a url at all")]
    fn rejects_unusable_urls(#[case] url: &str) {
        let err = extract_video_id(url).unwrap_err();
        assert!(err.is_validation());
        assert_eq!(err.to_string(), "Invalid YouTube URL");
    }

    #[rstest]
    #[case(Workflow::Trend, "")]
    #[case(Workflow::ContentIdea, "   ")]
    #[case(Workflow::Performance, "\t\n")]
    fn blank_input_is_rejected(#[case] workflow: Workflow, #[case] input: &str) {
        let err = validate(workflow, input).unwrap_err();
        assert_eq!(err.to_string(), empty_input_prompt(workflow));
    }

    #[test]
    fn input_is_trimmed() {
        assert_eq!(validate(Workflow::Trend, "  cooking ").unwrap(), "cooking");
    }
}
