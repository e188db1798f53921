//! # Test Support
//!
//! A scripted [`AnalysisService`] for the integration tests in `tests/`.
//! Replies are handed out in call order, each after its own delay, and every
//! request is recorded.

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms, unused_qualifications)]

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use lib_vidscope::workflow::service::{AnalysisService, HealthStatus};
use lib_vidscope::{AnalysisRequest, AnalyzerError, Result};

/// What the stub answers with.
#[derive(Debug, Clone)]
pub enum Reply {
    /// A decodable 2xx body.
    Body(Value),
    /// A non-success status.
    Status(u16),
    /// A network failure.
    Unreachable(String),
}

impl Reply {
    fn into_result(self) -> Result<Value> {
        match self {
            Reply::Body(v) => Ok(v),
            Reply::Status(status) => Err(AnalyzerError::Protocol { status, detail: None, body: None }),
            Reply::Unreachable(msg) => Err(AnalyzerError::Transport(msg)),
        }
    }
}

/// # Stub Service
pub struct StubService {
    replies: Mutex<VecDeque<(Duration, Reply)>>,
    health: Mutex<Option<HealthStatus>>,
    calls: Mutex<Vec<AnalysisRequest>>,
}

impl Default for StubService {
    fn default() -> Self {
        Self::new()
    }
}

impl StubService {
    /// A stub with a healthy probe and no scripted replies.
    pub fn new() -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            health: Mutex::new(Some(HealthStatus {
                status: "ok".into(),
                message: "stub".into(),
                api_key_configured: true,
            })),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Queues a reply returned immediately.
    pub fn reply(self, reply: Reply) -> Self {
        self.reply_after(Duration::ZERO, reply)
    }

    /// Queues a reply returned after `delay`.
    pub fn reply_after(self, delay: Duration, reply: Reply) -> Self {
        self.replies.lock().expect("replies lock poisoned").push_back((delay, reply));
        self
    }

    /// Makes the health probe fail.
    pub fn unhealthy(self) -> Self {
        *self.health.lock().expect("health lock poisoned") = None;
        self
    }

    pub fn calls(&self) -> Vec<AnalysisRequest> {
        self.calls.lock().expect("calls lock poisoned").clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().expect("calls lock poisoned").len()
    }
}

#[async_trait]
impl AnalysisService for StubService {
    async fn health(&self) -> Result<HealthStatus> {
        self.health
            .lock()
            .expect("health lock poisoned")
            .clone()
            .ok_or_else(|| AnalyzerError::Transport("connection refused".into()))
    }

    async fn analyze(&self, request: &AnalysisRequest) -> Result<Value> {
        self.calls.lock().expect("calls lock poisoned").push(request.clone());
        let next = self.replies.lock().expect("replies lock poisoned").pop_front();
        let (delay, reply) =
            next.unwrap_or_else(|| (Duration::ZERO, Reply::Unreachable("no scripted reply".into())));
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        reply.into_result()
    }
}
