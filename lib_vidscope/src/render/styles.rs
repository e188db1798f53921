/// Fixed id of the shared presentational style block.
pub const SHARED_STYLE_ID: &str = "vidscope-shared-styles";

/// Styles for video cards, idea cards and metric grids.
pub const SHARED_STYLE_CSS: &str = "\
.ai-narrative{margin-bottom:16px;line-height:1.5}\
.video-grid{display:grid;grid-template-columns:repeat(auto-fill,minmax(220px,1fr));gap:12px}\
.video-card{border:1px solid #ddd;border-radius:8px;overflow:hidden;background:#fff}\
.video-card .thumbnail{width:100%;aspect-ratio:16/9;object-fit:cover}\
.video-info{padding:8px}\
.video-title{font-size:14px;margin:0 0 4px}\
.channel{color:#606060;font-size:12px;margin:0 0 6px}\
.stats{display:flex;flex-wrap:wrap;gap:8px;font-size:12px}\
.seo-score{font-weight:bold;color:#065fd4}\
.idea-card{border-left:4px solid #c00;padding:8px 12px;margin-bottom:12px;background:#fafafa}\
.hook{font-style:italic}\
.metric-grid{display:grid;grid-template-columns:repeat(2,1fr);gap:8px;margin-bottom:12px}\
.metric{border:1px solid #ddd;border-radius:6px;padding:8px;text-align:center}\
.metric-value{display:block;font-size:18px;font-weight:bold}\
.metric-label{display:block;font-size:12px;color:#606060}\
.retention td{padding:2px 8px}";
