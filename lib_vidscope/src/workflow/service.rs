//! # Analysis Service
//!
//! The remote collaborator every workflow talks to, behind an async trait so
//! the orchestrators and the relay worker can run against a stub.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::{AnalyzerError, Result};
use crate::model::{AnalysisRequest, Workflow};
use crate::retrieve::ky_http::{ApiClient, ApiResponse};

/// Body of the health probe.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthStatus {
    pub status: String,
    pub message: String,
    pub api_key_configured: bool,
}

/// Remote analysis backend.
#[async_trait]
pub trait AnalysisService: Send + Sync {
    /// Probes the backend.
    async fn health(&self) -> Result<HealthStatus>;

    /// Issues exactly one call for `request` and returns the decoded body.
    ///
    /// Application-level errors inside the body are not inspected here.
    async fn analyze(&self, request: &AnalysisRequest) -> Result<Value>;
}

/// Paths of the backend endpoints, relative to the base URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Endpoints {
    pub health: String,
    pub trend: String,
    pub content: String,
    pub performance: String,
    pub page: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            health: String::new(),
            trend: "analyze_trending".to_string(),
            content: "generate_content".to_string(),
            performance: "track_performance".to_string(),
            page: "analyze_video".to_string(),
        }
    }
}

impl Endpoints {
    pub fn path(&self, workflow: Workflow) -> &str {
        match workflow {
            Workflow::Trend => &self.trend,
            Workflow::ContentIdea => &self.content,
            Workflow::Performance => &self.performance,
            Workflow::PageAnalysis => &self.page,
        }
    }
}

/// # HTTP Analysis Service
///
/// [`AnalysisService`] over [`ApiClient`].
#[derive(Clone)]
pub struct HttpAnalysisService {
    client: ApiClient,
    endpoints: Endpoints,
}

impl HttpAnalysisService {
    pub fn new(client: ApiClient) -> Self {
        Self::with_endpoints(client, Endpoints::default())
    }

    pub fn with_endpoints(client: ApiClient, endpoints: Endpoints) -> Self {
        Self { client, endpoints }
    }

    /// Shorthand for a client on `base_url` with default endpoints.
    pub fn connect(base_url: &str, max_retries: u32) -> Result<Self> {
        let client = ApiClient::new(base_url, None, max_retries)
            .map_err(|e| AnalyzerError::Config(format!("{:#}", e)))?;
        Ok(Self::new(client))
    }
}

/// Splits a client response into data or the matching error.
fn unpack<T>(response: anyhow::Result<ApiResponse<T>>) -> Result<T> {
    let response = response.map_err(|e| AnalyzerError::Transport(format!("{:#}", e)))?;
    if !response.success {
        let detail = response.error_body.as_deref().and_then(error_field);
        return Err(AnalyzerError::Protocol {
            status: response.status,
            detail,
            body: response.error_body,
        });
    }
    response
        .data
        .ok_or_else(|| AnalyzerError::Transport("Empty response body".to_string()))
}

/// The non-empty `error` string of a JSON error body.
fn error_field(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    match value.get("error")? {
        Value::String(text) if !text.trim().is_empty() => Some(text.trim().to_string()),
        _ => None,
    }
}

#[async_trait]
impl AnalysisService for HttpAnalysisService {
    async fn health(&self) -> Result<HealthStatus> {
        let status = unpack(self.client.get::<HealthStatus>(&self.endpoints.health).await)?;
        if !status.api_key_configured {
            log::warn!("Analysis service reports no API key configured: {}", status.message);
        }
        Ok(status)
    }

    async fn analyze(&self, request: &AnalysisRequest) -> Result<Value> {
        let path = self.endpoints.path(request.workflow);
        log::info!(
            "Starting {} for '{}' (session {})",
            request.workflow.label(),
            request.primary_input(),
            request.session_id
        );
        let body = request.body();
        let result = unpack(self.client.post::<Value, Value>(path, &body).await);
        if let Err(e) = &result {
            log::error!("{} failed: {}", request.workflow.label(), e);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_paths_follow_backend() {
        let endpoints = Endpoints::default();
        assert_eq!(endpoints.path(Workflow::Trend), "analyze_trending");
        assert_eq!(endpoints.path(Workflow::ContentIdea), "generate_content");
        assert_eq!(endpoints.path(Workflow::Performance), "track_performance");
        assert_eq!(endpoints.path(Workflow::PageAnalysis), "analyze_video");
    }

    #[test]
    fn non_success_is_protocol_error() {
        let response: anyhow::Result<ApiResponse<Value>> = Ok(ApiResponse {
            data: None,
            error_body: Some("{\"error\":\"boom\"}".into()),
            status: 500,
            success: false,
            headers: Default::default(),
        });
        let err = unpack(response).unwrap_err();
        assert_eq!(err.to_string(), "Server responded with status 500: boom");
    }

    #[test]
    fn error_body_without_error_text_keeps_status_line() {
        for body in ["<html>Bad Gateway</html>", "{\"detail\":\"x\"}", "{\"error\":\"  \"}"] {
            let response: anyhow::Result<ApiResponse<Value>> = Ok(ApiResponse {
                data: None,
                error_body: Some(body.into()),
                status: 502,
                success: false,
                headers: Default::default(),
            });
            let err = unpack(response).unwrap_err();
            assert_eq!(err.to_string(), "Server responded with status 502");
        }
    }

    #[test]
    fn client_failure_is_transport_error() {
        let response: anyhow::Result<ApiResponse<Value>> = Err(anyhow::anyhow!("connection refused"));
        assert!(matches!(unpack(response), Err(AnalyzerError::Transport(m)) if m == "connection refused"));
    }

    #[test]
    fn health_body_is_lenient() {
        let status: HealthStatus =
            serde_json::from_str(r#"{"status":"ok","message":"up","api_key_configured":true}"#).unwrap();
        assert!(status.api_key_configured);
        let partial: HealthStatus = serde_json::from_str(r#"{"status":"ok"}"#).unwrap();
        assert!(!partial.api_key_configured);
    }
}
