//! Fixed visual fragments for the recognized domain records.
//!
//! Each layout puts the AI narrative block first (when the service sent one)
//! and the fragments after it. The two are never interleaved.

use crate::markup::escape_html;
use crate::model::{ContentIdeasReport, PerformanceReport, TrendReport, TrendingVideo};

use super::Renderer;

fn narrative(renderer: &Renderer, text: Option<&str>) -> String {
    match text.map(str::trim).filter(|t| !t.is_empty()) {
        Some(t) => format!("<div class=\"ai-narrative\">{}</div>", renderer.render_text(t)),
        None => String::new(),
    }
}

fn or_na(value: &str) -> String {
    if value.trim().is_empty() {
        "N/A".to_string()
    } else {
        escape_html(value)
    }
}

fn video_card(video: &TrendingVideo, seo_score: Option<&str>) -> String {
    format!(
        "<div class=\"video-card\">\
         <img class=\"thumbnail\" src=\"{thumb}\" alt=\"{title}\">\
         <div class=\"video-info\">\
         <h3 class=\"video-title\">{title}</h3>\
         <p class=\"channel\">{channel}</p>\
         <div class=\"stats\">\
         <span class=\"views\">{views} views</span>\
         <span class=\"likes\">{likes} likes</span>\
         <span class=\"seo-score\">SEO: {seo}</span>\
         </div></div></div>",
        thumb = escape_html(&video.thumbnail_url),
        title = escape_html(&video.title),
        channel = escape_html(&video.channel),
        views = or_na(&video.views),
        likes = or_na(&video.likes),
        seo = or_na(seo_score.unwrap_or("")),
    )
}

/// Narrative summary followed by one card per trending video.
pub(super) fn trend_report(renderer: &Renderer, report: &TrendReport) -> String {
    let mut html = narrative(renderer, report.ai_summary.as_deref());
    if report.trending_videos.is_empty() {
        html.push_str("<p class=\"empty\">No trending videos found.</p>");
        return html;
    }
    html.push_str("<div class=\"video-grid\">");
    for video in &report.trending_videos {
        html.push_str(&video_card(video, report.seo_score(&video.id)));
    }
    html.push_str("</div>");
    html
}

/// Narrative insights, idea cards, thumbnail ideas, then the script template.
pub(super) fn content_ideas(renderer: &Renderer, report: &ContentIdeasReport) -> String {
    let ideas = &report.content_ideas;
    let mut html = narrative(renderer, report.ai_insights.as_deref());

    for idea in &ideas.video_ideas {
        html.push_str("<div class=\"idea-card\">");
        html.push_str(&format!("<h3>{}</h3>", escape_html(&idea.title)));
        if !idea.hook.is_empty() {
            html.push_str(&format!(
                "<p class=\"hook\"><strong>Hook:</strong> {}</p>",
                escape_html(&idea.hook)
            ));
        }
        if !idea.outline.is_empty() {
            html.push_str("<ol class=\"outline\">");
            for step in &idea.outline {
                html.push_str(&format!("<li>{}</li>", escape_html(step)));
            }
            html.push_str("</ol>");
        }
        html.push_str("</div>");
    }

    if !ideas.thumbnail_ideas.is_empty() {
        html.push_str("<div class=\"thumbnail-ideas\"><h3>Thumbnail Ideas</h3><ul>");
        for thumb in &ideas.thumbnail_ideas {
            html.push_str(&format!("<li>{}</li>", escape_html(thumb)));
        }
        html.push_str("</ul></div>");
    }

    if !ideas.script_template.trim().is_empty() {
        html.push_str(&format!(
            "<div class=\"script-template\"><h3>Script Template</h3><pre>{}</pre></div>",
            escape_html(&ideas.script_template)
        ));
    }
    html
}

/// Narrative insights, the metric grid, retention rows and suggestions.
pub(super) fn performance_report(renderer: &Renderer, report: &PerformanceReport) -> String {
    let data = &report.performance_data;
    let mut html = narrative(renderer, report.ai_insights.as_deref());

    if !data.title.is_empty() {
        html.push_str(&format!("<h3 class=\"video-title\">{}</h3>", escape_html(&data.title)));
    }

    html.push_str("<div class=\"metric-grid\">");
    for (label, value) in [
        ("Views", &data.views),
        ("Likes", &data.likes),
        ("Comments", &data.comments),
        ("Engagement Rate", &data.engagement_rate),
    ] {
        html.push_str(&format!(
            "<div class=\"metric\"><span class=\"metric-value\">{}</span><span class=\"metric-label\">{}</span></div>",
            or_na(value),
            label
        ));
    }
    html.push_str("</div>");

    if !data.audience_retention.is_empty() {
        html.push_str("<h4>Audience Retention</h4><table class=\"retention\">");
        for row in &data.audience_retention {
            html.push_str(&format!(
                "<tr><td>{}</td><td>{}</td></tr>",
                escape_html(&row.segment),
                escape_html(&row.retention)
            ));
        }
        html.push_str("</table>");
    }

    if !data.improvement_suggestions.is_empty() {
        html.push_str("<h4>Improvement Suggestions</h4><ul class=\"suggestions\">");
        for tip in &data.improvement_suggestions {
            html.push_str(&format!("<li>{}</li>", escape_html(tip)));
        }
        html.push_str("</ul>");
    }
    html
}
