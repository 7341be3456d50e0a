//! Collaborator traits for the live document.
//!
//! The TOC logic never touches a DOM directly. A host (a browser binding, the
//! in-memory page in `scrolltoc-page`, a test double) implements these traits
//! and hands itself to [`attach`](crate::attach).

use scrolltoc_shared::{Heading, Rect, Result, TocForest};

/// A document that can hand out the two regions the TOC works with.
pub trait Document {
    type Region: ContentRegion;
    type Toc: TocContainer;

    /// Locate the container whose headings are indexed.
    ///
    /// `Ok(None)` means nothing matched; `Err` means the selector itself is unusable.
    fn content_region(&self, selector: &str) -> Result<Option<Self::Region>>;

    /// Locate the element that receives the generated list.
    fn toc_container(&self, id: &str) -> Option<Self::Toc>;
}

/// The scrollable content area holding the headings.
pub trait ContentRegion {
    /// Every `h1`..`h6` below the region, in document order.
    fn headings(&self) -> Vec<Heading>;

    /// Write an identity onto the heading at `index`.
    fn set_heading_id(&mut self, index: usize, id: &str);

    /// Live box of the heading at `index`, relative to the viewport top.
    fn heading_rect(&self, index: usize) -> Option<Rect>;

    fn viewport_height(&self) -> f64;
}

/// The element the generated list is attached under. It scrolls on its own.
pub trait TocContainer {
    /// Append a nested list structure.
    fn append_list(&mut self, forest: &TocForest);

    /// Add or remove `class` on the link with element id `link_id`.
    ///
    /// Returns `false` when no such link exists.
    fn set_link_class(&mut self, link_id: &str, class: &str, on: bool) -> bool;

    /// Box of a link relative to the container's own viewport.
    fn link_rect(&self, link_id: &str) -> Option<Rect>;

    /// The container's visible area, in the same coordinates as [`link_rect`](Self::link_rect).
    fn viewport_rect(&self) -> Rect;

    /// Scroll the container's content by `dy` (positive moves content up).
    fn scroll_by(&mut self, dy: f64);
}
