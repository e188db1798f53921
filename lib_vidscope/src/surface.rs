//! # Display Surfaces
//!
//! A headless document model standing in for the analyzer's result area.
//! It holds one [`RenderTarget`] per workflow (content plus loading
//! indicator), the injected style blocks, and which surface is active.
//!
//! ## Sharing
//! [`Surface`] is a cheap, clonable handle around `Arc<Mutex<Document>>`.
//! Every mutation is a short critical section and no lock is ever held across
//! an `.await`, so a target's content always changes in one swap: whatever a
//! reader sees is the output of exactly one finished render pass.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::model::Workflow;
use crate::utils::current_datetime_rfc9557;

/// Identifies one display surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TargetId {
    Trend,
    Ideas,
    Performance,
}

impl TargetId {
    pub const ALL: [TargetId; 3] = [TargetId::Trend, TargetId::Ideas, TargetId::Performance];

    /// Element id of the result container.
    pub fn element_id(&self) -> &'static str {
        match self {
            TargetId::Trend => "trend-results",
            TargetId::Ideas => "content-results",
            TargetId::Performance => "performance-results",
        }
    }

    /// Element id of the loading indicator.
    pub fn loader_id(&self) -> &'static str {
        match self {
            TargetId::Trend => "trend-loading",
            TargetId::Ideas => "content-loading",
            TargetId::Performance => "performance-loading",
        }
    }

    /// Tab caption.
    pub fn title(&self) -> &'static str {
        match self {
            TargetId::Trend => "Trend Analysis",
            TargetId::Ideas => "Content Ideas",
            TargetId::Performance => "Performance",
        }
    }
}

impl From<Workflow> for TargetId {
    /// Page analysis shares the performance surface.
    fn from(workflow: Workflow) -> Self {
        match workflow {
            Workflow::Trend => TargetId::Trend,
            Workflow::ContentIdea => TargetId::Ideas,
            Workflow::Performance | Workflow::PageAnalysis => TargetId::Performance,
        }
    }
}

/// A result container plus its loading indicator.
#[derive(Debug, Clone)]
pub struct RenderTarget {
    pub id: TargetId,
    /// Current structured-markup content.
    pub content: String,
    /// Whether the loading indicator is visible.
    pub loading: bool,
    /// Number of completed content swaps.
    pub revision: u64,
}

impl RenderTarget {
    fn new(id: TargetId) -> Self {
        Self {
            id,
            content: String::new(),
            loading: false,
            revision: 0,
        }
    }
}

/// A style element injected into the document head.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleBlock {
    pub id: String,
    pub css: String,
}

/// # Document
///
/// The state behind a [`Surface`].
#[derive(Debug, Clone)]
pub struct Document {
    targets: BTreeMap<TargetId, RenderTarget>,
    styles: Vec<StyleBlock>,
    active: TargetId,
}

impl Default for Document {
    fn default() -> Self {
        Self {
            targets: TargetId::ALL.iter().map(|id| (*id, RenderTarget::new(*id))).collect(),
            styles: Vec::new(),
            active: TargetId::Trend,
        }
    }
}

impl Document {
    pub fn target(&self, id: TargetId) -> &RenderTarget {
        // Every TargetId is inserted by Default and never removed.
        &self.targets[&id]
    }

    fn target_mut(&mut self, id: TargetId) -> &mut RenderTarget {
        self.targets.entry(id).or_insert_with(|| RenderTarget::new(id))
    }

    pub fn styles(&self) -> &[StyleBlock] {
        &self.styles
    }

    pub fn active(&self) -> TargetId {
        self.active
    }

    /// Full standalone HTML page for the current state.
    pub fn to_html_page(&self) -> String {
        let mut page = String::from("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>vidscope</title>\n");
        for style in &self.styles {
            page.push_str(&format!("<style id=\"{}\">{}</style>\n", style.id, style.css));
        }
        page.push_str("</head>\n<body>\n<nav class=\"tabs\">");
        for id in TargetId::ALL {
            let class = if id == self.active { "tab active" } else { "tab" };
            page.push_str(&format!("<button class=\"{}\">{}</button>", class, id.title()));
        }
        page.push_str("</nav>\n");
        for target in self.targets.values() {
            let class = if target.id == self.active { "tab-content active" } else { "tab-content" };
            let display = if target.loading { "block" } else { "none" };
            page.push_str(&format!(
                "<section class=\"{}\">\n<div id=\"{}\" class=\"loading\" style=\"display:{}\"></div>\n<div id=\"{}\">{}</div>\n</section>\n",
                class,
                target.id.loader_id(),
                display,
                target.id.element_id(),
                target.content
            ));
        }
        page.push_str(&format!(
            "<footer>Generated {}</footer>\n</body>\n</html>\n",
            current_datetime_rfc9557()
        ));
        page
    }
}

/// # Surface
///
/// Shared handle to a [`Document`].
#[derive(Debug, Clone, Default)]
pub struct Surface {
    inner: Arc<Mutex<Document>>,
}

impl Surface {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Document> {
        self.inner.lock().expect("Document lock poisoned")
    }

    /// Copy of the current document state.
    pub fn snapshot(&self) -> Document {
        self.lock().clone()
    }

    /// Current content of one target.
    pub fn content(&self, id: TargetId) -> String {
        self.lock().target(id).content.clone()
    }

    pub fn is_loading(&self, id: TargetId) -> bool {
        self.lock().target(id).loading
    }

    pub fn revision(&self, id: TargetId) -> u64 {
        self.lock().target(id).revision
    }

    pub fn set_loading(&self, id: TargetId, loading: bool) {
        self.lock().target_mut(id).loading = loading;
    }

    /// Swaps in fully built content for one target.
    pub fn replace_content(&self, id: TargetId, content: String) {
        let mut doc = self.lock();
        let target = doc.target_mut(id);
        target.content = content;
        target.revision += 1;
    }

    /// Inserts a style block unless one with the same id is present.
    ///
    /// Returns `true` when the block was inserted by this call.
    pub fn inject_style(&self, id: &str, css: &str) -> bool {
        let mut doc = self.lock();
        if doc.styles.iter().any(|s| s.id == id) {
            return false;
        }
        doc.styles.push(StyleBlock { id: id.to_string(), css: css.to_string() });
        true
    }

    pub fn style_count(&self) -> usize {
        self.lock().styles.len()
    }

    /// Makes `id` the visible surface.
    pub fn activate(&self, id: TargetId) {
        self.lock().active = id;
    }

    pub fn active(&self) -> TargetId {
        self.lock().active
    }

    pub fn to_html_page(&self) -> String {
        self.lock().to_html_page()
    }
}
