//! # vidscope core
//!
//! Renders payloads from a remote video analysis service into a document and
//! coordinates the analyze, wait and display workflows around it.
//!
//! ## Modules
//! - **`markup`**: classifier plus the library and fallback parsers.
//! - **`render`**: payload dispatch, domain layouts, shared styles.
//! - **`surface`**: the headless document with one target per workflow.
//! - **`workflow`**: the service seam, validation and orchestrators.
//! - **`relay`**: page-analysis worker and `lastAnalysis` persistence.
//! - **`interface`**: open-time health probe and result pickup.
//! - **`store`**, **`configs`**, **`loggers`**, **`retrieve`**: ambient layers.

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms, unused_qualifications)]

pub mod configs;
pub mod errors;
pub mod interface;
pub mod loggers;
pub mod markup;
pub mod model;
pub mod relay;
pub mod render;
pub mod retrieve;
pub mod store;
pub mod surface;
pub mod utils;
pub mod workflow;

pub use errors::{AnalyzerError, Result};
pub use interface::{Interface, OpenReport};
pub use model::{AnalysisRequest, AnalysisResult, PageVideoRecord, Payload, Workflow};
pub use relay::{spawn_relay, RelayEvent, RelayHandle};
pub use render::Renderer;
pub use store::{JsonFileStore, KeyValueStore, MemoryStore};
pub use surface::{Surface, TargetId};
pub use workflow::{AnalysisService, HttpAnalysisService, Orchestrator, Outcome};
