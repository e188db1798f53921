//! # Interface
//!
//! The analyzer's user-facing side: one document, the three orchestrators
//! writing into it, and the open-time duties.
//!
//! ## On open
//! - Probe the service. A failed probe is not fatal; it leaves a warning in
//!   every target.
//! - Render a persisted `lastAnalysis` into the performance target and make
//!   that surface active. This happens at most once per `Interface`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::markup::escape_html;
use crate::model::Workflow;
use crate::render::Renderer;
use crate::store::{load_last_analysis, KeyValueStore};
use crate::surface::{Surface, TargetId};
use crate::workflow::orchestrator::Orchestrator;
use crate::workflow::service::{AnalysisService, HealthStatus};

/// What [`Interface::open`] found.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OpenReport {
    /// Health details, `None` when the probe failed.
    pub health: Option<HealthStatus>,
    /// Whether a persisted page analysis was displayed.
    pub restored: bool,
}

pub struct Interface {
    surface: Surface,
    renderer: Arc<Renderer>,
    service: Arc<dyn AnalysisService>,
    store: Arc<dyn KeyValueStore>,
    trend: Orchestrator,
    ideas: Orchestrator,
    performance: Orchestrator,
    picked_up: AtomicBool,
}

impl Interface {
    pub fn new(service: Arc<dyn AnalysisService>, store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_renderer(service, store, Arc::new(Renderer::new()))
    }

    pub fn with_renderer(
        service: Arc<dyn AnalysisService>,
        store: Arc<dyn KeyValueStore>,
        renderer: Arc<Renderer>,
    ) -> Self {
        let surface = Surface::new();
        let orchestrator = |workflow| {
            Orchestrator::new(workflow, service.clone(), renderer.clone(), surface.clone())
        };
        let trend = orchestrator(Workflow::Trend);
        let ideas = orchestrator(Workflow::ContentIdea);
        let performance = orchestrator(Workflow::Performance);
        Self {
            trend,
            ideas,
            performance,
            surface,
            renderer,
            service,
            store,
            picked_up: AtomicBool::new(false),
        }
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    /// The orchestrator driving `workflow`. Page analysis results share the
    /// performance orchestrator's target.
    pub fn orchestrator(&self, workflow: Workflow) -> &Orchestrator {
        match workflow {
            Workflow::Trend => &self.trend,
            Workflow::ContentIdea => &self.ideas,
            Workflow::Performance | Workflow::PageAnalysis => &self.performance,
        }
    }

    pub async fn open(&self) -> OpenReport {
        let health = match self.service.health().await {
            Ok(status) => {
                log::info!("Analysis service: {} ({})", status.status, status.message);
                Some(status)
            }
            Err(e) => {
                log::warn!("Health probe failed: {}", e);
                let warning = format!(
                    "<p class=\"warning\">Warning: Could not reach the analysis service. {}</p>",
                    escape_html(&e.to_string())
                );
                for target in TargetId::ALL {
                    self.surface.replace_content(target, warning.clone());
                }
                None
            }
        };
        let restored = self.pick_up_last_analysis();
        OpenReport { health, restored }
    }

    /// Displays the persisted page analysis, once per instance.
    ///
    /// Returns `true` only on the call that rendered something.
    pub fn pick_up_last_analysis(&self) -> bool {
        if self.picked_up.swap(true, Ordering::SeqCst) {
            return false;
        }
        match load_last_analysis(self.store.as_ref()) {
            Ok(Some(result)) => {
                self.renderer.render_into(&self.surface, TargetId::Performance, &result);
                self.surface.activate(TargetId::Performance);
                log::info!("Restored last page analysis");
                true
            }
            Ok(None) => false,
            Err(e) => {
                log::warn!("Could not read the last page analysis: {}", e);
                false
            }
        }
    }
}
