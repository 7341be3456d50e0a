//! In-memory TOC container with its own scrollable area.

use std::collections::{BTreeSet, HashMap};

use scrolltoc_core::{TocContainer, render_toc_html};
use scrolltoc_shared::{Rect, TocForest};

/// Receives the generated lists and lays their links out as fixed-height rows.
#[derive(Debug, Clone)]
pub struct PageToc {
    id: String,
    lists: Vec<TocForest>,
    /// Link ids in display order.
    rows: Vec<String>,
    classes: HashMap<String, BTreeSet<String>>,
    row_height: f64,
    viewport_height: f64,
    scroll_top: f64,
}

impl PageToc {
    pub fn new(id: impl Into<String>, row_height: f64, viewport_height: f64) -> Self {
        Self {
            id: id.into(),
            lists: Vec::new(),
            rows: Vec::new(),
            classes: HashMap::new(),
            row_height,
            viewport_height,
            scroll_top: 0.0,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn scroll_top(&self) -> f64 {
        self.scroll_top
    }

    pub fn max_scroll(&self) -> f64 {
        (self.rows.len() as f64 * self.row_height - self.viewport_height).max(0.0)
    }

    pub fn has_class(&self, link_id: &str, class: &str) -> bool {
        self.classes
            .get(link_id)
            .is_some_and(|set| set.contains(class))
    }

    /// Links carrying `class`, in display order.
    pub fn links_with_class(&self, class: &str) -> Vec<&str> {
        self.rows
            .iter()
            .filter(|link| self.has_class(link, class))
            .map(String::as_str)
            .collect()
    }

    /// The container element with every appended list, `active_class` applied.
    pub fn render_html(&self, active_class: &str) -> String {
        let active = self.links_with_class(active_class).into_iter().next();
        let mut html = format!(
            "<nav id=\"{}\">\n",
            html_escape::encode_double_quoted_attribute(&self.id)
        );
        for list in &self.lists {
            html.push_str(&render_toc_html(list, active, active_class));
        }
        html.push_str("</nav>\n");
        html
    }
}

impl TocContainer for PageToc {
    fn append_list(&mut self, forest: &TocForest) {
        self.rows
            .extend(forest.iter().map(|(_, node)| node.link_id.clone()));
        self.lists.push(forest.clone());
    }

    fn set_link_class(&mut self, link_id: &str, class: &str, on: bool) -> bool {
        if !self.rows.iter().any(|row| row == link_id) {
            return false;
        }
        let set = self.classes.entry(link_id.to_string()).or_default();
        if on {
            set.insert(class.to_string());
        } else {
            set.remove(class);
        }
        true
    }

    fn link_rect(&self, link_id: &str) -> Option<Rect> {
        let row = self.rows.iter().position(|r| r == link_id)?;
        let top = row as f64 * self.row_height;
        Some(Rect::new(top, top + self.row_height).shifted(self.scroll_top))
    }

    fn viewport_rect(&self) -> Rect {
        Rect::new(0.0, self.viewport_height)
    }

    fn scroll_by(&mut self, dy: f64) {
        self.scroll_top = (self.scroll_top + dy).clamp(0.0, self.max_scroll());
    }
}
