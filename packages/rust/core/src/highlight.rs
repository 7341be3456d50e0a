//! Scroll highlighter: picks the heading whose section is in view and keeps
//! its TOC link marked active.
//!
//! A TOC link stands for everything from its heading up to the next heading,
//! so the best candidate is usually the first heading intersecting the
//! viewport. Two corner cases refine that: a heading only peeking in at the
//! very bottom does not take over from the section filling the screen, and
//! once every heading has scrolled past the top the last one stays active.

use tracing::{debug, trace, warn};

use scrolltoc_shared::{Heading, HighlightConfig, Rect, ScrollTocError};

use crate::document::{ContentRegion, TocContainer};

/// Choose the active heading from `(index, rect)` pairs in document order.
///
/// `rects` is consumed lazily; the scan stops at the first heading that is not
/// above the viewport.
pub fn select_active<I>(rects: I, viewport_height: f64, config: &HighlightConfig) -> Option<usize>
where
    I: IntoIterator<Item = (usize, Rect)>,
{
    let epsilon = config.edge_epsilon;
    let mut above: Option<usize> = None;

    for (index, rect) in rects {
        if rect.bottom <= epsilon {
            above = Some(index);
            continue;
        }

        if above.is_some() && rect.top > viewport_height * config.bottom_fraction {
            trace!(index, top = rect.top, "heading only peeking in at the bottom");
            return above;
        }
        if rect.top < viewport_height - epsilon {
            return Some(index);
        }

        // Below the viewport; every later heading is further down.
        trace!(index, top = rect.top, "first visible candidate is below the viewport");
        break;
    }

    above
}

/// Owns the single active link and applies each evaluation to the TOC.
#[derive(Debug, Clone)]
pub struct Highlighter {
    config: HighlightConfig,
    active_link: Option<String>,
}

impl Highlighter {
    pub fn new(config: HighlightConfig) -> Self {
        Self {
            config,
            active_link: None,
        }
    }

    /// Element id of the link currently marked active.
    pub fn active_link(&self) -> Option<&str> {
        self.active_link.as_deref()
    }

    /// Re-evaluate the active heading and update the TOC.
    ///
    /// The previous link is always cleared first. Returns the index of the
    /// heading now highlighted, or `None` when nothing qualifies or its link
    /// could not be found.
    pub fn evaluate<R, T>(&mut self, headings: &[Heading], region: &R, toc: &mut T) -> Option<usize>
    where
        R: ContentRegion + ?Sized,
        T: TocContainer + ?Sized,
    {
        if let Some(previous) = self.active_link.take() {
            toc.set_link_class(&previous, &self.config.active_class, false);
        }

        let rects = (0..headings.len()).filter_map(|index| match region.heading_rect(index) {
            Some(rect) => Some((index, rect)),
            None => {
                debug!(index, "heading has no geometry, skipping");
                None
            }
        });
        let index = select_active(rects, region.viewport_height(), &self.config)?;

        let Some(link_id) = headings[index].link_id() else {
            warn!(index, "active heading has no identity, skipping highlight");
            return None;
        };
        if !toc.set_link_class(&link_id, &self.config.active_class, true) {
            let err = ScrollTocError::LinkNotFound { link_id };
            warn!(error = %err, index, "skipping highlight this cycle");
            return None;
        }

        scroll_into_view(toc, &link_id, self.config.edge_epsilon);
        debug!(index, %link_id, "active heading updated");
        self.active_link = Some(link_id);
        Some(index)
    }
}

/// Scroll the TOC by the smallest amount that puts `link_id` in view.
fn scroll_into_view<T: TocContainer + ?Sized>(toc: &mut T, link_id: &str, epsilon: f64) {
    let Some(link) = toc.link_rect(link_id) else {
        return;
    };
    let view = toc.viewport_rect();

    let dy = if link.top <= view.top + epsilon {
        link.top - view.top
    } else if link.bottom >= view.bottom {
        link.bottom - view.bottom
    } else {
        return;
    };

    if dy != 0.0 {
        trace!(link_id, dy, "scrolling TOC");
        toc.scroll_by(dy);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use scrolltoc_shared::{HeadingLevel, TocForest};

    use super::*;

    fn config() -> HighlightConfig {
        HighlightConfig::default()
    }

    fn select(rects: &[(f64, f64)], viewport: f64) -> Option<usize> {
        select_active(
            rects
                .iter()
                .enumerate()
                .map(|(i, &(top, bottom))| (i, Rect::new(top, bottom))),
            viewport,
            &config(),
        )
    }

    // --- select_active ---

    #[test]
    fn first_heading_in_view_wins() {
        assert_eq!(select(&[(100.0, 130.0), (400.0, 430.0)], 1000.0), Some(0));
    }

    #[test]
    fn peeking_heading_does_not_steal_from_section_above() {
        // Heading 0 scrolled away; heading 1 just entering at the bottom
        assert_eq!(select(&[(-50.0, -5.0), (920.0, 950.0)], 1000.0), Some(0));
        // Within epsilon of the bottom edge
        assert_eq!(select(&[(-40.0, 10.0), (995.0, 1025.0)], 1000.0), Some(0));
    }

    #[test]
    fn heading_low_in_viewport_without_candidate_above_is_selected() {
        assert_eq!(select(&[(950.0, 980.0)], 1000.0), Some(0));
    }

    #[test]
    fn heading_below_viewport_with_nothing_above_selects_nothing() {
        assert_eq!(select(&[(995.0, 1025.0), (1400.0, 1430.0)], 1000.0), None);
        assert_eq!(select(&[(1200.0, 1230.0)], 1000.0), None);
    }

    #[test]
    fn last_heading_above_stays_active_when_past_all_headings() {
        assert_eq!(select(&[(-400.0, -370.0)], 1000.0), Some(0));
        assert_eq!(
            select(&[(-900.0, -870.0), (-500.0, -470.0), (-40.0, -10.0)], 1000.0),
            Some(2)
        );
    }

    #[test]
    fn bottom_within_epsilon_counts_as_above() {
        assert_eq!(select(&[(-20.0, 10.0), (300.0, 330.0)], 1000.0), Some(1));
        assert_eq!(select(&[(-20.0, 10.5), (300.0, 330.0)], 1000.0), Some(0));
    }

    #[test]
    fn no_headings_selects_nothing() {
        assert_eq!(select(&[], 1000.0), None);
    }

    #[test]
    fn scan_stops_at_first_candidate() {
        let mut seen = 0;
        let rects = [(100.0, 130.0), (200.0, 230.0), (300.0, 330.0)];
        let result = select_active(
            rects.iter().enumerate().map(|(i, &(t, b))| {
                seen += 1;
                (i, Rect::new(t, b))
            }),
            1000.0,
            &config(),
        );
        assert_eq!(result, Some(0));
        assert_eq!(seen, 1);
    }

    #[test]
    fn fraction_and_epsilon_are_configurable() {
        let cfg = HighlightConfig {
            edge_epsilon: 0.0,
            bottom_fraction: 0.5,
            ..HighlightConfig::default()
        };
        let rects = [(0, Rect::new(-30.0, 0.0)), (1, Rect::new(600.0, 630.0))];
        assert_eq!(select_active(rects, 1000.0, &cfg), Some(0));
        let rects = [(0, Rect::new(-30.0, 0.5)), (1, Rect::new(600.0, 630.0))];
        assert_eq!(select_active(rects, 1000.0, &cfg), Some(0));
        let rects = [(0, Rect::new(-30.0, -1.0)), (1, Rect::new(400.0, 430.0))];
        assert_eq!(select_active(rects, 1000.0, &cfg), Some(1));
    }

    // --- Highlighter with test doubles ---

    struct FakeRegion {
        rects: Vec<Option<Rect>>,
        viewport: f64,
    }

    impl ContentRegion for FakeRegion {
        fn headings(&self) -> Vec<Heading> {
            Vec::new()
        }
        fn set_heading_id(&mut self, _index: usize, _id: &str) {}
        fn heading_rect(&self, index: usize) -> Option<Rect> {
            self.rects.get(index).copied().flatten()
        }
        fn viewport_height(&self) -> f64 {
            self.viewport
        }
    }

    #[derive(Default)]
    struct FakeToc {
        links: Vec<String>,
        active: BTreeSet<String>,
        row: f64,
        view: f64,
        scroll: f64,
    }

    impl FakeToc {
        fn with_links(ids: &[&str]) -> Self {
            Self {
                links: ids.iter().map(|id| format!("{id}-link")).collect(),
                row: 20.0,
                view: 60.0,
                ..Self::default()
            }
        }
    }

    impl TocContainer for FakeToc {
        fn append_list(&mut self, _forest: &TocForest) {}
        fn set_link_class(&mut self, link_id: &str, class: &str, on: bool) -> bool {
            assert_eq!(class, "active");
            if !self.links.iter().any(|l| l == link_id) {
                return false;
            }
            if on {
                self.active.insert(link_id.to_string());
            } else {
                self.active.remove(link_id);
            }
            true
        }
        fn link_rect(&self, link_id: &str) -> Option<Rect> {
            let row = self.links.iter().position(|l| l == link_id)? as f64;
            let top = row * self.row - self.scroll;
            Some(Rect::new(top, top + self.row))
        }
        fn viewport_rect(&self) -> Rect {
            Rect::new(0.0, self.view)
        }
        fn scroll_by(&mut self, dy: f64) {
            self.scroll += dy;
        }
    }

    fn identified(ids: &[&str]) -> Vec<Heading> {
        ids.iter()
            .map(|id| {
                let mut h = Heading::new(HeadingLevel::new(2).unwrap(), *id);
                h.id = Some(id.to_string());
                h
            })
            .collect()
    }

    fn region(tops: &[f64]) -> FakeRegion {
        FakeRegion {
            rects: tops.iter().map(|&t| Some(Rect::new(t, t + 30.0))).collect(),
            viewport: 1000.0,
        }
    }

    #[test]
    fn at_most_one_link_is_active_across_evaluations() {
        let ids = ["a", "b", "c", "d", "e"];
        let headings = identified(&ids);
        let mut toc = FakeToc::with_links(&ids);
        let mut hl = Highlighter::new(config());

        let mut expected = Vec::new();
        for scroll in [0.0, 250.0, 600.0, 1200.0, 50.0, 5000.0, 0.0] {
            let tops: Vec<f64> = (0..ids.len()).map(|i| 100.0 + i as f64 * 300.0 - scroll).collect();
            let selected = hl.evaluate(&headings, &region(&tops), &mut toc);
            expected.push(selected);
            assert!(toc.active.len() <= 1, "active links: {:?}", toc.active);
            assert_eq!(
                toc.active.iter().next().map(String::as_str),
                hl.active_link()
            );
        }
        assert_eq!(
            expected,
            vec![Some(0), Some(1), Some(2), Some(4), Some(0), Some(4), Some(0)]
        );
    }

    #[test]
    fn nothing_qualifying_clears_previous_link() {
        let headings = identified(&["a"]);
        let mut toc = FakeToc::with_links(&["a"]);
        let mut hl = Highlighter::new(config());

        assert_eq!(hl.evaluate(&headings, &region(&[100.0]), &mut toc), Some(0));
        assert_eq!(hl.active_link(), Some("a-link"));

        assert_eq!(hl.evaluate(&headings, &region(&[2000.0]), &mut toc), None);
        assert!(toc.active.is_empty());
        assert_eq!(hl.active_link(), None);
    }

    #[test]
    fn missing_link_skips_highlight_without_panicking() {
        let headings = identified(&["a", "b"]);
        let mut toc = FakeToc::with_links(&["a"]);
        let mut hl = Highlighter::new(config());

        assert_eq!(hl.evaluate(&headings, &region(&[100.0, 500.0]), &mut toc), Some(0));
        // "b" is current but has no link
        assert_eq!(hl.evaluate(&headings, &region(&[-300.0, 100.0]), &mut toc), None);
        assert!(toc.active.is_empty());
        assert_eq!(hl.active_link(), None);
    }

    #[test]
    fn headings_without_geometry_are_skipped() {
        let headings = identified(&["a", "b"]);
        let mut toc = FakeToc::with_links(&["a", "b"]);
        let mut hl = Highlighter::new(config());
        let region = FakeRegion {
            rects: vec![None, Some(Rect::new(200.0, 230.0))],
            viewport: 1000.0,
        };
        assert_eq!(hl.evaluate(&headings, &region, &mut toc), Some(1));
    }

    #[test]
    fn toc_scrolls_minimally_to_keep_active_link_visible() {
        // 5 rows of 20 in a 60-high TOC viewport
        let ids = ["a", "b", "c", "d", "e"];
        let headings = identified(&ids);
        let mut toc = FakeToc::with_links(&ids);
        let mut hl = Highlighter::new(config());

        let tops = |active: usize| -> Vec<f64> {
            (0..ids.len())
                .map(|i| if i < active { -200.0 } else { 100.0 + (i - active) as f64 * 300.0 })
                .collect()
        };

        // Row "b" spans 20..40, fully visible: untouched
        hl.evaluate(&headings, &region(&tops(1)), &mut toc);
        assert_eq!(toc.scroll, 0.0);

        // Row "e" spans 80..100, below the 60 bottom: align bottom
        hl.evaluate(&headings, &region(&tops(4)), &mut toc);
        assert_eq!(toc.scroll, 40.0);

        // Row "d" spans 20..40 after scrolling: untouched
        hl.evaluate(&headings, &region(&tops(3)), &mut toc);
        assert_eq!(toc.scroll, 40.0);

        // Row "a" spans -40..-20: align top
        hl.evaluate(&headings, &region(&tops(0)), &mut toc);
        assert_eq!(toc.scroll, 0.0);
    }

    #[test]
    fn link_near_top_edge_is_aligned_to_top() {
        let headings = identified(&["a", "b"]);
        let mut toc = FakeToc::with_links(&["a", "b"]);
        toc.scroll = 15.0;
        let mut hl = Highlighter::new(config());

        // Row "b" spans 5..25: within epsilon of the top edge
        hl.evaluate(&headings, &region(&[-200.0, 100.0]), &mut toc);
        assert_eq!(toc.scroll, 20.0);
    }
}
