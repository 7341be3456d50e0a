//! Estimated vertical flow layout for parsed HTML.
//!
//! There is no rendering engine here, so block heights are estimated from
//! their text: wrapped lines times line height, with headings drawn larger.
//! Good enough to drive scrolling for documents read from disk.

use scraper::{ElementRef, Selector};
use tracing::debug;

use scrolltoc_shared::{Heading, HeadingLevel, PageConfig};

/// Elements that stack vertically and carry their own text.
const BLOCK_SELECTOR: &str =
    "h1, h2, h3, h4, h5, h6, p, li, pre, blockquote, dt, dd, td, th, figcaption";

/// Vertical placement of a block within the content, from the content top.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Span {
    pub top: f64,
    pub height: f64,
}

/// Headings found under a root, with their estimated placement.
#[derive(Debug, Default)]
pub(crate) struct FlowLayout {
    pub headings: Vec<(Heading, Span)>,
    pub content_height: f64,
}

/// Walk the blocks under `root` in document order and stack them.
pub(crate) fn lay_out(root: ElementRef<'_>, config: &PageConfig) -> FlowLayout {
    let blocks = Selector::parse(BLOCK_SELECTOR).unwrap();
    let mut layout = FlowLayout::default();
    let mut cursor = 0.0;
    let mut stacked = 0usize;

    for el in root.select(&blocks) {
        let level = HeadingLevel::from_tag(el.value().name());

        // Containers like a <li> wrapping <p>s: the inner blocks carry the height.
        let has_inner_block = el
            .descendants()
            .skip(1)
            .filter_map(ElementRef::wrap)
            .any(|d| blocks.matches(&d));
        if level.is_none() && has_inner_block {
            continue;
        }

        let raw: String = el.text().collect();
        let text = raw.split_whitespace().collect::<Vec<_>>().join(" ");
        let height = match level {
            Some(level) => heading_height(&text, level, config),
            None if el.value().name() == "pre" => raw.lines().count().max(1) as f64 * config.line_height,
            None => wrapped_lines(text.chars().count(), config.chars_per_line) as f64 * config.line_height,
        };

        if let Some(level) = level {
            let heading = Heading {
                level,
                content: el.inner_html().trim().to_string(),
                text,
                id: el
                    .value()
                    .attr("id")
                    .filter(|id| !id.is_empty())
                    .map(String::from),
            };
            layout.headings.push((heading, Span { top: cursor, height }));
        }

        cursor += height + config.block_gap;
        stacked += 1;
    }

    if stacked > 0 {
        layout.content_height = cursor - config.block_gap;
    }
    debug!(
        blocks = stacked,
        headings = layout.headings.len(),
        content_height = layout.content_height,
        "flow layout estimated"
    );
    layout
}

/// Size multiplier for a heading level relative to body text.
fn heading_scale(level: HeadingLevel) -> f64 {
    match level.get() {
        1 => 2.0,
        2 => 1.5,
        _ => 1.25,
    }
}

fn heading_height(text: &str, level: HeadingLevel, config: &PageConfig) -> f64 {
    let scale = heading_scale(level);
    let per_line = ((config.chars_per_line as f64 / scale).floor() as usize).max(1);
    wrapped_lines(text.chars().count(), per_line) as f64 * config.line_height * scale
}

/// Lines needed for `chars` characters, at least one.
fn wrapped_lines(chars: usize, per_line: usize) -> usize {
    chars.div_ceil(per_line.max(1)).max(1)
}
