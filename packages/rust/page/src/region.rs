//! The scrollable content region of an [`HtmlPage`](crate::HtmlPage).

use scrolltoc_core::ContentRegion;
use scrolltoc_shared::{Heading, Rect};

use crate::layout::{FlowLayout, Span};

/// Headings of the selected region plus a scroll position over their layout.
#[derive(Debug, Clone)]
pub struct PageRegion {
    headings: Vec<Heading>,
    spans: Vec<Span>,
    content_height: f64,
    viewport_height: f64,
    scroll_top: f64,
}

impl PageRegion {
    pub(crate) fn new(layout: FlowLayout, viewport_height: f64) -> Self {
        let (headings, spans) = layout.headings.into_iter().unzip();
        Self {
            headings,
            spans,
            content_height: layout.content_height,
            viewport_height,
            scroll_top: 0.0,
        }
    }

    pub fn scroll_top(&self) -> f64 {
        self.scroll_top
    }

    /// Furthest the region can scroll.
    pub fn max_scroll(&self) -> f64 {
        (self.content_height - self.viewport_height).max(0.0)
    }

    /// Scroll to `y`, clamped to the scrollable range. Returns the position reached.
    pub fn scroll_to(&mut self, y: f64) -> f64 {
        self.scroll_top = y.clamp(0.0, self.max_scroll());
        self.scroll_top
    }

    /// Offset of a heading from the top of the content.
    pub fn heading_offset(&self, index: usize) -> Option<f64> {
        self.spans.get(index).map(|s| s.top)
    }
}

impl ContentRegion for PageRegion {
    fn headings(&self) -> Vec<Heading> {
        self.headings.clone()
    }

    fn set_heading_id(&mut self, index: usize, id: &str) {
        if let Some(heading) = self.headings.get_mut(index) {
            heading.id = Some(id.to_string());
        }
    }

    fn heading_rect(&self, index: usize) -> Option<Rect> {
        let span = self.spans.get(index)?;
        Some(Rect::new(span.top, span.top + span.height).shifted(self.scroll_top))
    }

    fn viewport_height(&self) -> f64 {
        self.viewport_height
    }
}
