//! Initialization entry point and the scroll callback.

use tracing::{debug, info, instrument};

use scrolltoc_shared::{Heading, HighlightConfig, Result, ScrollTocError, TocForest, TocOptions};

use crate::document::{ContentRegion, Document, TocContainer};
use crate::highlight::Highlighter;
use crate::toc::build_toc;

/// A TOC attached to a document: built once, re-highlighted on every scroll.
pub struct ScrollToc<R, T> {
    region: R,
    toc: T,
    headings: Vec<Heading>,
    forest: TocForest,
    highlighter: Highlighter,
    active: Option<usize>,
}

/// Build the TOC for `document` and highlight the current heading once.
///
/// Fails fast, before anything is appended, when the content region or the
/// TOC container cannot be found.
#[instrument(skip_all, fields(selector = %options.content_selector, toc_id = %options.toc_id))]
pub fn attach<D: Document>(
    document: &D,
    options: &TocOptions,
    highlight: &HighlightConfig,
) -> Result<ScrollToc<D::Region, D::Toc>> {
    let mut region = document
        .content_region(&options.content_selector)?
        .ok_or_else(|| ScrollTocError::MissingContentRegion {
            selector: options.content_selector.clone(),
        })?;
    let mut toc = document
        .toc_container(&options.toc_id)
        .ok_or_else(|| ScrollTocError::MissingTocContainer {
            id: options.toc_id.clone(),
        })?;

    let mut headings = region.headings();
    let forest = build_toc(&mut headings, options.lowercase_ids);
    // Existing identities are written back unchanged.
    for (index, heading) in headings.iter().enumerate() {
        if let Some(id) = heading.id() {
            region.set_heading_id(index, id);
        }
    }

    toc.append_list(&forest);
    info!(
        headings = headings.len(),
        depth = forest.depth(),
        "table of contents attached"
    );

    let mut attached = ScrollToc {
        region,
        toc,
        headings,
        forest,
        highlighter: Highlighter::new(highlight.clone()),
        active: None,
    };
    attached.on_scroll();
    Ok(attached)
}

impl<R: ContentRegion, T: TocContainer> ScrollToc<R, T> {
    /// Scroll callback: re-evaluate and return the heading now active.
    pub fn on_scroll(&mut self) -> Option<&Heading> {
        self.active = self
            .highlighter
            .evaluate(&self.headings, &self.region, &mut self.toc);
        debug!(active = ?self.active, "scroll evaluated");
        self.active_heading()
    }

    pub fn active_heading(&self) -> Option<&Heading> {
        self.active.and_then(|index| self.headings.get(index))
    }

    /// Element id of the highlighted TOC link.
    pub fn active_link(&self) -> Option<&str> {
        self.highlighter.active_link()
    }

    pub fn headings(&self) -> &[Heading] {
        &self.headings
    }

    pub fn forest(&self) -> &TocForest {
        &self.forest
    }

    pub fn region(&self) -> &R {
        &self.region
    }

    /// Mutable access for hosts that drive scrolling themselves.
    pub fn region_mut(&mut self) -> &mut R {
        &mut self.region
    }

    pub fn toc(&self) -> &T {
        &self.toc
    }

}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::BTreeMap;
    use std::rc::Rc;

    use scrolltoc_shared::{HeadingLevel, Rect};

    use super::*;

    /// Headings laid out 300 apart, 30 high, in a 1000-high viewport.
    #[derive(Clone)]
    struct StubRegion {
        headings: Vec<Heading>,
        written: Rc<RefCell<BTreeMap<usize, String>>>,
        scroll: f64,
    }

    impl ContentRegion for StubRegion {
        fn headings(&self) -> Vec<Heading> {
            self.headings.clone()
        }
        fn set_heading_id(&mut self, index: usize, id: &str) {
            self.written.borrow_mut().insert(index, id.to_string());
        }
        fn heading_rect(&self, index: usize) -> Option<Rect> {
            let top = 100.0 + index as f64 * 300.0 - self.scroll;
            Some(Rect::new(top, top + 30.0))
        }
        fn viewport_height(&self) -> f64 {
            1000.0
        }
    }

    #[derive(Clone, Default)]
    struct StubToc {
        lists: Vec<TocForest>,
        active: Vec<String>,
    }

    impl TocContainer for StubToc {
        fn append_list(&mut self, forest: &TocForest) {
            self.lists.push(forest.clone());
        }
        fn set_link_class(&mut self, link_id: &str, _class: &str, on: bool) -> bool {
            let known = self.lists.iter().any(|f| f.find_link(link_id).is_some());
            if known {
                self.active.retain(|l| l != link_id);
                if on {
                    self.active.push(link_id.to_string());
                }
            }
            known
        }
        fn link_rect(&self, _link_id: &str) -> Option<Rect> {
            Some(Rect::new(0.0, 20.0))
        }
        fn viewport_rect(&self) -> Rect {
            Rect::new(0.0, 400.0)
        }
        fn scroll_by(&mut self, _dy: f64) {}
    }

    struct StubDocument {
        region: Option<StubRegion>,
        toc: Option<StubToc>,
    }

    impl Document for StubDocument {
        type Region = StubRegion;
        type Toc = StubToc;

        fn content_region(&self, selector: &str) -> Result<Option<StubRegion>> {
            if selector.is_empty() {
                return Err(ScrollTocError::parse("empty selector"));
            }
            Ok(self.region.clone())
        }
        fn toc_container(&self, _id: &str) -> Option<StubToc> {
            self.toc.clone()
        }
    }

    fn document(shape: &[(u8, &str, Option<&str>)]) -> StubDocument {
        let headings = shape
            .iter()
            .map(|&(level, text, id)| {
                let mut h = Heading::new(HeadingLevel::new(level).unwrap(), text);
                h.id = id.map(String::from);
                h
            })
            .collect();
        StubDocument {
            region: Some(StubRegion {
                headings,
                written: Rc::default(),
                scroll: 0.0,
            }),
            toc: Some(StubToc::default()),
        }
    }

    #[test]
    fn attach_builds_writes_ids_and_highlights_once() {
        let doc = document(&[(1, "Guide", None), (2, "Install", Some("install")), (2, "Use", None)]);
        let attached = attach(&doc, &TocOptions::default(), &HighlightConfig::default())
            .expect("attach");

        let written = attached.region().written.borrow().clone();
        assert_eq!(
            written.into_iter().collect::<Vec<_>>(),
            vec![
                (0, "guide-0".to_string()),
                (1, "install".to_string()),
                (2, "use-2".to_string()),
            ]
        );
        assert_eq!(attached.toc().lists.len(), 1);
        assert_eq!(attached.forest().len(), 3);
        assert_eq!(attached.active_link(), Some("guide-0-link"));
        assert_eq!(attached.active_heading().and_then(Heading::id), Some("guide-0"));
    }

    #[test]
    fn reattaching_keeps_written_identities() {
        let doc = document(&[(1, "Guide", None), (2, "Use", None)]);
        let first = attach(&doc, &TocOptions::default(), &HighlightConfig::default())
            .expect("attach");
        let ids: Vec<String> = first.headings().iter().filter_map(Heading::id).map(String::from).collect();

        let mut again = document(&[]);
        again.region.as_mut().unwrap().headings = first.headings().to_vec();
        let second = attach(&again, &TocOptions::default(), &HighlightConfig::default())
            .expect("attach");
        let written: Vec<String> = second.region().written.borrow().values().cloned().collect();
        assert_eq!(written, ids);
        assert_eq!(second.forest(), first.forest());
    }

    #[test]
    fn scrolling_moves_the_single_active_link() {
        let doc = document(&[(1, "A", None), (2, "B", None), (2, "C", None)]);
        let mut attached = attach(&doc, &TocOptions::default(), &HighlightConfig::default())
            .expect("attach");

        attached.region_mut().scroll = 350.0;
        let active = attached.on_scroll().and_then(Heading::id).map(String::from);
        assert_eq!(active.as_deref(), Some("b-1"));
        assert_eq!(attached.toc().active, vec!["b-1-link".to_string()]);

        attached.region_mut().scroll = 10_000.0;
        assert_eq!(attached.on_scroll().and_then(Heading::id), Some("c-2"));
        assert_eq!(attached.toc().active, vec!["c-2-link".to_string()]);
    }

    #[test]
    fn missing_content_region_is_fatal() {
        let mut doc = document(&[]);
        doc.region = None;
        let err = attach(&doc, &TocOptions::default(), &HighlightConfig::default())
            .err()
            .expect("must fail");
        assert!(matches!(err, ScrollTocError::MissingContentRegion { ref selector } if selector == "main"));
        assert!(err.is_configuration());
    }

    #[test]
    fn missing_toc_container_is_fatal() {
        let mut doc = document(&[(1, "A", None)]);
        doc.toc = None;
        let err = attach(&doc, &TocOptions::default(), &HighlightConfig::default())
            .err()
            .expect("must fail");
        assert!(matches!(err, ScrollTocError::MissingTocContainer { ref id } if id == "toc"));
    }

    #[test]
    fn bad_selector_propagates() {
        let doc = document(&[]);
        let options = TocOptions {
            content_selector: String::new(),
            ..TocOptions::default()
        };
        let err = attach(&doc, &options, &HighlightConfig::default())
            .err()
            .expect("must fail");
        assert!(matches!(err, ScrollTocError::Parse { .. }));
    }

    #[test]
    fn document_without_headings_attaches_an_empty_list() {
        let doc = document(&[]);
        let mut attached = attach(&doc, &TocOptions::default(), &HighlightConfig::default())
            .expect("attach");
        assert_eq!(attached.toc().lists, vec![TocForest::default()]);
        assert!(attached.on_scroll().is_none());
        assert!(attached.active_link().is_none());
    }
}
