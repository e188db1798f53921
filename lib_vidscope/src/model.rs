//! # Analysis Data Model
//!
//! Requests going out to the analysis service, results coming back, and the
//! strongly-typed views of the domain records the renderer knows how to lay
//! out (trend reports, content ideas, performance reports).
//!
//! ## Key Types:
//! - **`Workflow`**: which of the four analyze-and-display flows a value belongs to.
//! - **`AnalysisRequest`**: immutable once issued; carries a fresh session id.
//! - **`Payload`**: the tagged `Scalar | Structured` variant the renderer matches on.
//! - **`AnalysisResult`**: the decoded response, consumed exactly once by the renderer.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::utils::new_session_id;

/// The analyze-and-display flows the core coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Workflow {
    /// Trending videos for a niche keyword.
    Trend,
    /// Video, thumbnail and script ideas for a prompt.
    ContentIdea,
    /// Performance metrics for one video URL.
    Performance,
    /// Page-triggered analysis relayed through the background worker.
    PageAnalysis,
}

impl Workflow {
    /// Prefix of the session ids issued for this workflow.
    pub fn session_prefix(&self) -> &'static str {
        match self {
            Workflow::Trend => "trending",
            Workflow::ContentIdea => "content",
            Workflow::Performance => "performance",
            Workflow::PageAnalysis => "video",
        }
    }

    /// Name of the single input field the user fills in.
    pub fn input_field(&self) -> &'static str {
        match self {
            Workflow::Trend => "niche",
            Workflow::ContentIdea => "prompt",
            Workflow::Performance => "video_url",
            Workflow::PageAnalysis => "video_id",
        }
    }

    /// Human label used in log lines and prompts.
    pub fn label(&self) -> &'static str {
        match self {
            Workflow::Trend => "trend analysis",
            Workflow::ContentIdea => "content generation",
            Workflow::Performance => "performance tracking",
            Workflow::PageAnalysis => "page analysis",
        }
    }
}

/// # Page Video Record
///
/// The minimal, already-normalized record extracted from a video page.
/// Every field defaults to an empty value when the page did not provide it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageVideoRecord {
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    pub view_count: String,
    pub like_count: String,
    pub comment_count: String,
    pub channel_name: String,
    pub upload_date: String,
}

/// # Analysis Request
///
/// One outgoing call. Built on user submission or page trigger and never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    pub workflow: Workflow,
    /// Named input fields, sent verbatim in the request body.
    pub input: BTreeMap<String, String>,
    /// Page record, present only for page analysis.
    pub record: Option<PageVideoRecord>,
    /// Per-call token, opaque to the core.
    pub session_id: String,
    pub issued_at: DateTime<Utc>,
}

impl AnalysisRequest {
    /// Issues a request for `workflow` with `value` in the workflow's input field.
    pub fn new(workflow: Workflow, value: &str) -> Self {
        let mut input = BTreeMap::new();
        input.insert(workflow.input_field().to_string(), value.to_string());
        Self {
            workflow,
            input,
            record: None,
            session_id: new_session_id(workflow),
            issued_at: Utc::now(),
        }
    }

    /// Issues a page-analysis request for `video_id` with its scraped record.
    pub fn page(video_id: &str, record: PageVideoRecord) -> Self {
        let mut request = Self::new(Workflow::PageAnalysis, video_id);
        request.record = Some(record);
        request
    }

    /// The value of the workflow's main input field.
    pub fn primary_input(&self) -> &str {
        self.input
            .get(self.workflow.input_field())
            .map(String::as_str)
            .unwrap_or("")
    }

    /// JSON body posted to the remote service.
    pub fn body(&self) -> Value {
        let mut body = Map::new();
        for (key, value) in &self.input {
            body.insert(key.clone(), Value::String(value.clone()));
        }
        body.insert("sessionId".into(), Value::String(self.session_id.clone()));
        if let Some(record) = &self.record {
            body.insert(
                "video_data".into(),
                serde_json::to_value(record).unwrap_or(Value::Null),
            );
        }
        Value::Object(body)
    }
}

/// # Payload
///
/// What the remote service handed back, either plain text or a record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum Payload {
    Scalar(String),
    Structured(Map<String, Value>),
}

/// # Analysis Result
///
/// A decoded response. `error` is populated when the service reported an
/// application-level failure inside an otherwise decodable payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub workflow: Workflow,
    pub raw_payload: Payload,
    pub error: Option<String>,
}

impl AnalysisResult {
    /// Decodes a response body.
    ///
    /// A `result` field (the backing service's envelope) becomes the payload
    /// on its own; otherwise the whole object, minus `error`, is the payload.
    pub fn from_response(workflow: Workflow, body: Value) -> Self {
        match body {
            Value::Object(mut obj) => {
                let error = obj.remove("error").and_then(error_text);
                let raw_payload = match obj.remove("result") {
                    Some(Value::String(text)) => Payload::Scalar(text),
                    Some(Value::Object(record)) => Payload::Structured(record),
                    Some(Value::Null) | None => Payload::Structured(obj),
                    Some(other) => {
                        let mut wrapped = Map::new();
                        wrapped.insert("result".into(), other);
                        Payload::Structured(wrapped)
                    }
                };
                Self { workflow, raw_payload, error }
            }
            Value::String(text) => Self {
                workflow,
                raw_payload: Payload::Scalar(text),
                error: None,
            },
            other => Self {
                workflow,
                raw_payload: Payload::Scalar(other.to_string()),
                error: None,
            },
        }
    }
}

/// A populated error field: non-null and not an empty string.
fn error_text(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

/// Accepts strings, numbers or null and keeps the display form.
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    })
}

/// # Trend Report
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TrendReport {
    pub trending_videos: Vec<TrendingVideo>,
    pub analysis_results: Vec<VideoAnalysis>,
    pub ai_summary: Option<String>,
}

impl TrendReport {
    /// SEO score reported for `video_id`, if any.
    pub fn seo_score(&self, video_id: &str) -> Option<&str> {
        self.analysis_results
            .iter()
            .find(|a| a.video_id == video_id)
            .map(|a| a.seo_score.as_str())
            .filter(|s| !s.is_empty())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TrendingVideo {
    #[serde(deserialize_with = "lenient_string")]
    pub id: String,
    pub title: String,
    pub channel: String,
    pub thumbnail_url: String,
    #[serde(deserialize_with = "lenient_string")]
    pub views: String,
    #[serde(deserialize_with = "lenient_string")]
    pub likes: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VideoAnalysis {
    #[serde(alias = "id", deserialize_with = "lenient_string")]
    pub video_id: String,
    #[serde(deserialize_with = "lenient_string")]
    pub seo_score: String,
}

/// # Content Ideas Report
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContentIdeasReport {
    pub content_ideas: ContentIdeas,
    pub ai_insights: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContentIdeas {
    pub video_ideas: Vec<VideoIdea>,
    pub thumbnail_ideas: Vec<String>,
    pub script_template: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VideoIdea {
    pub title: String,
    pub hook: String,
    pub outline: Vec<String>,
}

/// # Performance Report
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PerformanceReport {
    pub performance_data: PerformanceData,
    pub ai_insights: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PerformanceData {
    pub title: String,
    #[serde(deserialize_with = "lenient_string")]
    pub views: String,
    #[serde(deserialize_with = "lenient_string")]
    pub likes: String,
    #[serde(deserialize_with = "lenient_string")]
    pub comments: String,
    #[serde(deserialize_with = "lenient_string")]
    pub engagement_rate: String,
    pub audience_retention: Vec<RetentionSegment>,
    pub improvement_suggestions: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RetentionSegment {
    pub segment: String,
    #[serde(deserialize_with = "lenient_string")]
    pub retention: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn result_envelope_text_becomes_scalar() {
        let res = AnalysisResult::from_response(
            Workflow::Trend,
            json!({"result": "# Hi", "conversation_id": "trending_1"}),
        );
        assert_eq!(res.raw_payload, Payload::Scalar("# Hi".into()));
        assert!(res.error.is_none());
    }

    #[test]
    fn bare_object_is_structured_without_error_field() {
        let res = AnalysisResult::from_response(
            Workflow::Performance,
            json!({"performanceData": {"views": 10}, "error": null}),
        );
        match res.raw_payload {
            Payload::Structured(map) => {
                assert!(map.contains_key("performanceData"));
                assert!(!map.contains_key("error"));
            }
            other => panic!("expected structured payload, got {:?}", other),
        }
    }

    #[test]
    fn populated_error_is_kept_and_empty_one_ignored() {
        let failed = AnalysisResult::from_response(Workflow::Trend, json!({"error": "quota"}));
        assert_eq!(failed.error.as_deref(), Some("quota"));

        let fine = AnalysisResult::from_response(Workflow::Trend, json!({"error": "", "result": "ok"}));
        assert!(fine.error.is_none());
    }

    #[test]
    fn request_body_carries_input_and_session() {
        let req = AnalysisRequest::new(Workflow::Trend, "cooking");
        let body = req.body();
        assert_eq!(body["niche"], "cooking");
        assert!(body["sessionId"].as_str().unwrap().starts_with("trending_"));
    }

    #[test]
    fn page_request_embeds_record() {
        let record = PageVideoRecord { title: "T".into(), ..Default::default() };
        let body = AnalysisRequest::page("abc", record).body();
        assert_eq!(body["video_id"], "abc");
        assert_eq!(body["video_data"]["title"], "T");
        assert_eq!(body["video_data"]["tags"], json!([]));
    }

    #[test]
    fn numeric_metrics_are_accepted() {
        let report: PerformanceReport = serde_json::from_value(json!({
            "performanceData": {"views": 12345, "likes": "1,234", "engagementRate": 4.5}
        }))
        .unwrap();
        assert_eq!(report.performance_data.views, "12345");
        assert_eq!(report.performance_data.likes, "1,234");
        assert_eq!(report.performance_data.engagement_rate, "4.5");
        assert_eq!(report.performance_data.comments, "");
    }
}
