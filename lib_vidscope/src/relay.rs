//! # Cross-Context Relay
//!
//! Carries page-analysis triggers from the page context to a background
//! worker task and back.
//!
//! ## Flow
//! 1. [`RelayHandle::analyze_page`] sends a [`RelayRequest`] (video id plus
//!    the page record) over an unbounded channel and waits for the ack.
//! 2. The worker makes the remote call and persists whatever decodable result
//!    comes back under `lastAnalysis`, including one whose `error` field is
//!    populated. Calls that fail before a body is decoded persist nothing. A
//!    store that refuses the write is logged and does not fail the analysis.
//! 3. The worker acks the sender through the request's oneshot responder and
//!    broadcasts a [`RelayEvent`] to every subscriber.
//!
//! Each request is processed on its own task, so the persisted record is the
//! one from whichever analysis completed last.

use std::sync::Arc;

use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::errors::{AnalyzerError, Result};
use crate::model::{AnalysisRequest, AnalysisResult, PageVideoRecord, Workflow};
use crate::store::{save_last_analysis, KeyValueStore};
use crate::workflow::service::AnalysisService;
use crate::workflow::validation::validate;

/// Result type for acknowledgements.
pub type AckResult = std::result::Result<(), String>;

/// A page-analysis trigger plus the channel for its acknowledgement.
pub struct RelayRequest {
    pub video_id: String,
    pub record: PageVideoRecord,
    pub responder: oneshot::Sender<AckResult>,
}

/// Completion notifications broadcast by the worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayEvent {
    AnalysisComplete { video_id: String },
    AnalysisFailed { video_id: String, message: String },
}

/// Sending side of the relay. Clonable.
#[derive(Clone)]
pub struct RelayHandle {
    tx: mpsc::UnboundedSender<RelayRequest>,
    events: broadcast::Sender<RelayEvent>,
}

impl RelayHandle {
    /// Sends one trigger and waits for the worker's ack.
    ///
    /// # Errors
    /// The worker's failure message as `Application`, or `Transport` if the
    /// worker is gone.
    pub async fn analyze_page(&self, video_id: &str, record: PageVideoRecord) -> Result<()> {
        let (responder, ack) = oneshot::channel();
        self.tx
            .send(RelayRequest { video_id: video_id.to_string(), record, responder })
            .map_err(|_| AnalyzerError::Transport("Relay worker is not running".to_string()))?;
        match ack.await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(message)) => Err(AnalyzerError::Application(message)),
            Err(_) => Err(AnalyzerError::Transport("Relay worker dropped the request".to_string())),
        }
    }

    /// Receives completion notifications sent after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<RelayEvent> {
        self.events.subscribe()
    }
}

/// Starts the worker task. It runs until every [`RelayHandle`] is dropped.
pub fn spawn_relay(
    service: Arc<dyn AnalysisService>,
    store: Arc<dyn KeyValueStore>,
) -> (RelayHandle, JoinHandle<()>) {
    let (tx, mut rx) = mpsc::unbounded_channel::<RelayRequest>();
    let (events, _) = broadcast::channel(64);
    let worker_events = events.clone();

    let worker = tokio::spawn(async move {
        log::info!("Relay worker started");
        while let Some(request) = rx.recv().await {
            let service = service.clone();
            let store = store.clone();
            let events = worker_events.clone();
            tokio::spawn(async move {
                process(service.as_ref(), store.as_ref(), &events, request).await;
            });
        }
        log::info!("Relay worker stopped");
    });

    (RelayHandle { tx, events }, worker)
}

async fn process(
    service: &dyn AnalysisService,
    store: &dyn KeyValueStore,
    events: &broadcast::Sender<RelayEvent>,
    request: RelayRequest,
) {
    let RelayRequest { video_id, record, responder } = request;
    let outcome = analyze(service, store, &video_id, record).await;

    let event = match &outcome {
        Ok(()) => {
            log::info!("Page analysis for {} completed", video_id);
            RelayEvent::AnalysisComplete { video_id }
        }
        Err(e) => {
            log::warn!("Page analysis for {} failed: {}", video_id, e);
            RelayEvent::AnalysisFailed { video_id, message: e.to_string() }
        }
    };

    if responder.send(outcome.map_err(|e| e.to_string())).is_err() {
        log::debug!("Relay sender went away before the ack");
    }
    // No subscribers is fine.
    let _ = events.send(event);
}

async fn analyze(
    service: &dyn AnalysisService,
    store: &dyn KeyValueStore,
    video_id: &str,
    record: PageVideoRecord,
) -> Result<()> {
    let video_id = validate(Workflow::PageAnalysis, video_id)?;
    let request = AnalysisRequest::page(&video_id, record);
    let body = service.analyze(&request).await?;
    let result = AnalysisResult::from_response(Workflow::PageAnalysis, body);
    if let Err(e) = save_last_analysis(store, &result) {
        log::warn!("Could not persist page analysis for {}: {}", video_id, e);
    }
    match result.error {
        Some(message) => Err(AnalyzerError::Application(message)),
        None => Ok(()),
    }
}
