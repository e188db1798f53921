//! # Request Orchestrator
//!
//! Drives one workflow through `Idle → Validating → Loading → {Success,
//! Failed} → Idle` against its own render target.
//!
//! ## Behavior
//! - Blank (or, for performance tracking, unusable) input is rejected before
//!   anything on the surface changes and before any remote call.
//! - Loading shows the indicator and an interim message, then makes exactly
//!   one call with a fresh session id. There is no retry and no timeout
//!   beyond the transport's own.
//! - Every failure ends as one `Error: …` line in the target.
//! - Submissions are re-entrant. Overlapping calls are not sequenced or
//!   cancelled: each one swaps in its own output when it completes, so the
//!   target ends up showing whichever finished last. [`Orchestrator::state`]
//!   stays `Loading` until the last overlapping call has finished.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use serde_json::Value;

use crate::errors::{AnalyzerError, Result};
use crate::model::{AnalysisRequest, AnalysisResult, Workflow};
use crate::render::{error_line, Renderer};
use crate::surface::{Surface, TargetId};

use super::service::AnalysisService;
use super::validation::validate;

/// Interim message shown while a call is in flight.
pub const WORKING_MESSAGE: &str = "Working…";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Idle,
    Validating,
    Loading,
    Success,
    Failed,
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            State::Idle => "idle",
            State::Validating => "validating",
            State::Loading => "loading",
            State::Success => "success",
            State::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// How one submission ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Input refused; carries the blocking prompt for the user.
    Rejected(String),
    /// Result rendered into the target.
    Succeeded,
    /// Failure line written into the target.
    Failed(String),
}

/// Turns a response body into a result, surfacing a populated `error` field.
pub fn into_result(workflow: Workflow, body: Value) -> Result<AnalysisResult> {
    let result = AnalysisResult::from_response(workflow, body);
    match result.error {
        Some(message) => Err(AnalyzerError::Application(message)),
        None => Ok(result),
    }
}

/// Markup of the single failure line.
pub fn error_markup(error: &AnalyzerError) -> String {
    error_line(&error.user_line())
}

#[derive(Debug)]
struct Progress {
    state: State,
    in_flight: usize,
}

/// # Orchestrator
///
/// Clonable; clones share the progress cell and the surface.
#[derive(Clone)]
pub struct Orchestrator {
    workflow: Workflow,
    target: TargetId,
    service: Arc<dyn AnalysisService>,
    renderer: Arc<Renderer>,
    surface: Surface,
    progress: Arc<Mutex<Progress>>,
}

impl fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Orchestrator")
            .field("workflow", &self.workflow)
            .field("target", &self.target)
            .field("state", &self.state())
            .finish()
    }
}

impl Orchestrator {
    /// # Arguments
    /// * `workflow` - The flow this orchestrator runs. Its target follows from it.
    /// * `service` - Remote backend.
    /// * `renderer` - Shared renderer.
    /// * `surface` - Document the target lives in.
    pub fn new(
        workflow: Workflow,
        service: Arc<dyn AnalysisService>,
        renderer: Arc<Renderer>,
        surface: Surface,
    ) -> Self {
        Self {
            workflow,
            target: TargetId::from(workflow),
            service,
            renderer,
            surface,
            progress: Arc::new(Mutex::new(Progress { state: State::Idle, in_flight: 0 })),
        }
    }

    pub fn workflow(&self) -> Workflow {
        self.workflow
    }

    pub fn target(&self) -> TargetId {
        self.target
    }

    /// Current state. `Loading` while any call is in flight.
    pub fn state(&self) -> State {
        self.lock().state
    }

    /// Number of calls currently in flight.
    pub fn in_flight(&self) -> usize {
        self.lock().in_flight
    }

    fn lock(&self) -> MutexGuard<'_, Progress> {
        self.progress.lock().expect("Orchestrator state lock poisoned")
    }

    fn transition(&self, next: State) {
        let mut progress = self.lock();
        Self::move_to(self.workflow, &mut progress, next);
    }

    fn move_to(workflow: Workflow, progress: &mut Progress, next: State) {
        log::debug!("{}: {} -> {}", workflow.label(), progress.state, next);
        progress.state = next;
    }

    fn start_call(&self) {
        let mut progress = self.lock();
        progress.in_flight += 1;
        Self::move_to(self.workflow, &mut progress, State::Loading);
    }

    /// Records how one call ended, then settles on `Idle` or, while other
    /// calls are still running, back on `Loading`.
    fn finish_call(&self, ended: State) {
        let mut progress = self.lock();
        progress.in_flight = progress.in_flight.saturating_sub(1);
        Self::move_to(self.workflow, &mut progress, ended);
        let settled = if progress.in_flight == 0 { State::Idle } else { State::Loading };
        Self::move_to(self.workflow, &mut progress, settled);
    }

    /// Runs one submission of user `input` to completion.
    pub async fn submit(&self, input: &str) -> Outcome {
        self.transition(State::Validating);
        let value = match validate(self.workflow, input) {
            Ok(value) => value,
            Err(e) => {
                log::info!("{} input rejected: {}", self.workflow.label(), e);
                self.transition(State::Idle);
                return Outcome::Rejected(e.to_string());
            }
        };
        self.execute(AnalysisRequest::new(self.workflow, &value)).await
    }

    /// Runs an already validated request: loading, one call, display.
    pub async fn execute(&self, request: AnalysisRequest) -> Outcome {
        self.start_call();
        self.surface.set_loading(self.target, true);
        self.surface.replace_content(
            self.target,
            format!("<p class=\"interim\">{}</p>", WORKING_MESSAGE),
        );

        let (outcome, ended) = match self.call(&request).await {
            Ok(result) => {
                self.renderer.render_into(&self.surface, self.target, &result);
                (Outcome::Succeeded, State::Success)
            }
            Err(e) => {
                self.surface.replace_content(self.target, error_markup(&e));
                (Outcome::Failed(e.user_line()), State::Failed)
            }
        };

        self.surface.set_loading(self.target, false);
        self.finish_call(ended);
        outcome
    }

    async fn call(&self, request: &AnalysisRequest) -> Result<AnalysisResult> {
        let body = self.service.analyze(request).await?;
        into_result(request.workflow, body)
    }
}
