//! Rendering properties across the classifier, the parsers and the renderer.

use rstest::rstest;
use serde_json::json;

use lib_vidscope::markup::classifier::classify;
use lib_vidscope::markup::fallback::convert;
use lib_vidscope::render::styles::SHARED_STYLE_ID;
use lib_vidscope::{AnalysisResult, Renderer, Surface, TargetId, Workflow};

#[rstest]
#[case("<div>**bold** inside markup</div>")]
#[case("   <p># not a heading</p>")]
#[case("<!-- comment --> - item")]
#[case("</section>")]
fn leading_markup_token_always_passes_through(#[case] text: &str) {
    assert!(!classify(text).is_lightweight_markup());
    assert_eq!(Renderer::new().render_text(text), text);
}

#[rstest]
#[case("some **bold** words")]
#[case("intro\n# Heading")]
#[case("list:\n- one\n- two")]
#[case("1. first step")]
#[case("an _emphasized_ word")]
#[case("3 < 4 and **bold**")]
fn lightweight_signals_are_detected(#[case] text: &str) {
    assert!(classify(text).is_lightweight_markup());
}

#[test]
fn fallback_reference_document() {
    let out = convert("# Title\n\n**bold** and *italic*\n- item one\n- item two");
    assert!(out.contains("<h1>Title</h1>"));
    assert!(out.contains("<strong>bold</strong>"));
    assert!(out.contains("<em>italic</em>"));
    assert_eq!(out.matches("<ul>").count(), 1);
    let list = &out[out.find("<ul>").unwrap()..out.find("</ul>").unwrap()];
    assert_eq!(list.matches("<li>").count(), 2);
}

#[test]
fn fallback_only_renderer_converts_markup() {
    let out = Renderer::fallback_only().render_text("## Summary\n**Great** video");
    assert!(out.starts_with("<h2>Summary</h2>"));
    assert!(out.contains("<strong>Great</strong>"));
}

#[test]
fn deeply_nested_record_never_panics() {
    let mut nested = json!({"leaf": [1, 2, {"x": "<y>"}]});
    for depth in 0..64 {
        let mut level = serde_json::Map::new();
        level.insert(format!("level{}", depth), nested);
        nested = serde_json::Value::Object(level);
    }
    let result = AnalysisResult::from_response(Workflow::ContentIdea, json!({"tree": nested, "n": null}));
    let out = Renderer::new().render(&result);
    assert!(out.html.starts_with("<dl class=\"result-record\"><dt>n</dt><dd></dd><dt>tree</dt>"));
    assert!(out.html.contains("&lt;y&gt;"));
    assert!(!out.html.contains("<y>"));
}

#[test]
fn shared_styles_are_injected_once_per_document() {
    let renderer = Renderer::new();
    let surface = Surface::new();
    let trend = AnalysisResult::from_response(
        Workflow::Trend,
        json!({"trendingVideos": [{"id": "a", "title": "A"}], "analysisResults": []}),
    );
    let ideas = AnalysisResult::from_response(
        Workflow::ContentIdea,
        json!({"contentIdeas": {"videoIdeas": [{"title": "Idea"}]}}),
    );

    renderer.render_into(&surface, TargetId::Trend, &trend);
    renderer.render_into(&surface, TargetId::Ideas, &ideas);
    renderer.render_into(&surface, TargetId::Trend, &trend);

    let doc = surface.snapshot();
    assert_eq!(doc.styles().len(), 1);
    assert_eq!(doc.styles()[0].id, SHARED_STYLE_ID);
    assert_eq!(surface.to_html_page().matches(SHARED_STYLE_ID).count(), 1);
}
