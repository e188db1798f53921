//! # Workflows
//!
//! The three user-driven "analyze, wait, display" flows.
//!
//! ## Contained Modules:
//!
//! - **`service`**: the [`AnalysisService`] seam and its HTTP implementation.
//! - **`validation`**: input checks, including video id extraction.
//! - **`orchestrator`**: the per-workflow request/display state machine.

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms, unused_qualifications)]

/// Per-workflow request/display state machine.
pub mod orchestrator;
/// Remote analysis backend seam.
pub mod service;
/// Input validation.
pub mod validation;

pub use orchestrator::{Orchestrator, Outcome, State};
pub use service::{AnalysisService, Endpoints, HealthStatus, HttpAnalysisService};
pub use validation::{extract_video_id, validate};
