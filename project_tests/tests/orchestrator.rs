//! Request/display state machine against the scripted service.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;

use lib_vidscope::workflow::orchestrator::{State, WORKING_MESSAGE};
use lib_vidscope::{Orchestrator, Outcome, Renderer, Surface, TargetId, Workflow};
use project_tests::{Reply, StubService};

fn setup(workflow: Workflow, stub: StubService) -> (Orchestrator, Surface, Arc<StubService>) {
    let stub = Arc::new(stub);
    let surface = Surface::new();
    let orch = Orchestrator::new(workflow, stub.clone(), Arc::new(Renderer::new()), surface.clone());
    (orch, surface, stub)
}

#[tokio::test]
async fn empty_input_leaves_everything_untouched() {
    let (orch, surface, stub) = setup(Workflow::ContentIdea, StubService::new());
    surface.replace_content(TargetId::Ideas, "<p>previous</p>".into());

    let outcome = orch.submit("").await;

    assert_eq!(outcome, Outcome::Rejected("Please enter a content prompt".into()));
    assert_eq!(stub.call_count(), 0);
    assert!(!surface.is_loading(TargetId::Ideas));
    assert_eq!(surface.content(TargetId::Ideas), "<p>previous</p>");

    surface.set_loading(TargetId::Ideas, true);
    let outcome = orch.submit("   ").await;

    assert!(matches!(outcome, Outcome::Rejected(_)));
    assert_eq!(stub.call_count(), 0);
    assert!(surface.is_loading(TargetId::Ideas));
    assert_eq!(surface.content(TargetId::Ideas), "<p>previous</p>");
}

#[tokio::test]
async fn loading_is_visible_while_the_call_is_in_flight() {
    let stub = StubService::new().reply_after(Duration::from_millis(100), Reply::Body(json!({"result": "done"})));
    let (orch, surface, _stub) = setup(Workflow::Trend, stub);

    let task = {
        let orch = orch.clone();
        tokio::spawn(async move { orch.submit("cooking").await })
    };
    tokio::time::sleep(Duration::from_millis(30)).await;
    assert!(surface.is_loading(TargetId::Trend));
    assert!(surface.content(TargetId::Trend).contains(WORKING_MESSAGE));

    assert_eq!(task.await.unwrap(), Outcome::Succeeded);
    assert!(!surface.is_loading(TargetId::Trend));
    assert_eq!(surface.content(TargetId::Trend), "done");
}

#[tokio::test]
async fn one_call_with_input_and_fresh_session() {
    let stub = StubService::new()
        .reply(Reply::Body(json!({"result": "a"})))
        .reply(Reply::Body(json!({"result": "b"})));
    let (orch, _surface, stub) = setup(Workflow::Trend, stub);

    orch.submit("  gaming ").await;
    orch.submit("gaming").await;

    let calls = stub.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].input.get("niche").map(String::as_str), Some("gaming"));
    assert!(calls[0].session_id.starts_with("trending_"));
    assert_ne!(calls[0].session_id, calls[1].session_id);
}

#[tokio::test]
async fn populated_error_field_gives_one_error_line() {
    let stub = StubService::new().reply(Reply::Body(json!({"error": "API quota exceeded", "trendingVideos": []})));
    let (orch, surface, _stub) = setup(Workflow::Trend, stub);

    let outcome = orch.submit("music").await;

    assert_eq!(outcome, Outcome::Failed("Error: API quota exceeded".into()));
    let content = surface.content(TargetId::Trend);
    assert_eq!(content.matches("Error: ").count(), 1);
    assert!(!content.contains('\n'));
    assert!(!surface.is_loading(TargetId::Trend));
}

#[tokio::test]
async fn non_success_status_is_reported() {
    let stub = StubService::new().reply(Reply::Status(500));
    let (orch, surface, _stub) = setup(Workflow::ContentIdea, stub);

    let outcome = orch.submit("vlog ideas").await;

    assert_eq!(outcome, Outcome::Failed("Error: Server responded with status 500".into()));
    assert!(surface.content(TargetId::Ideas).contains("Error: Server responded with status 500"));
    assert!(!surface.is_loading(TargetId::Ideas));
}

#[tokio::test]
async fn overlapping_calls_show_the_last_to_finish() {
    let stub = StubService::new()
        .reply_after(Duration::from_millis(120), Reply::Body(json!({"result": "slow first call"})))
        .reply_after(Duration::from_millis(10), Reply::Body(json!({"result": "fast second call"})));
    let (orch, surface, stub) = setup(Workflow::Trend, stub);

    let (first, second) = tokio::join!(orch.submit("first"), orch.submit("second"));

    assert_eq!(first, Outcome::Succeeded);
    assert_eq!(second, Outcome::Succeeded);
    assert_eq!(stub.call_count(), 2);
    assert_eq!(surface.content(TargetId::Trend), "slow first call");
    assert!(!surface.is_loading(TargetId::Trend));
}

#[tokio::test]
async fn state_stays_loading_until_every_call_finished() {
    let stub = StubService::new()
        .reply_after(Duration::from_millis(150), Reply::Body(json!({"result": "slow"})))
        .reply_after(Duration::from_millis(10), Reply::Body(json!({"result": "fast"})));
    let (orch, _surface, _stub) = setup(Workflow::Trend, stub);

    let slow = {
        let orch = orch.clone();
        tokio::spawn(async move { orch.submit("slow").await })
    };
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(orch.submit("fast").await, Outcome::Succeeded);

    assert_eq!(orch.in_flight(), 1);
    assert_eq!(orch.state(), State::Loading);

    assert_eq!(slow.await.unwrap(), Outcome::Succeeded);
    assert_eq!(orch.in_flight(), 0);
    assert_eq!(orch.state(), State::Idle);
}

#[tokio::test]
async fn workflows_never_share_a_target() {
    let stub = Arc::new(
        StubService::new()
            .reply(Reply::Body(json!({"result": "trend"})))
            .reply(Reply::Body(json!({"result": "ideas"}))),
    );
    let surface = Surface::new();
    let renderer = Arc::new(Renderer::new());
    let trend = Orchestrator::new(Workflow::Trend, stub.clone(), renderer.clone(), surface.clone());
    let ideas = Orchestrator::new(Workflow::ContentIdea, stub.clone(), renderer, surface.clone());

    trend.submit("a").await;
    ideas.submit("b").await;

    assert_eq!(surface.content(TargetId::Trend), "trend");
    assert_eq!(surface.content(TargetId::Ideas), "ideas");
    assert_eq!(surface.content(TargetId::Performance), "");
}
