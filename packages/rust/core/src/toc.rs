//! TOC (Table of Contents) builder.
//!
//! Turns the flat, document-ordered heading sequence of a content region into
//! a nested [`TocForest`], assigning stable identities to headings on the way.

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, instrument, trace};

use scrolltoc_shared::{Heading, HeadingLevel, TocForest, TocNode};

/// Assign identities, then build the forest. The usual entry point.
#[instrument(skip_all, fields(heading_count = headings.len()))]
pub fn build_toc(headings: &mut [Heading], lowercase_ids: bool) -> TocForest {
    let assigned = assign_heading_ids(headings, lowercase_ids);
    debug!(assigned = assigned.len(), "heading identities assigned");
    build_forest(headings)
}

/// Give every heading without an identity one derived from its text and position.
///
/// Headings that already carry an identity are left untouched, so running this
/// twice is a no-op. Returns the indices of headings that were changed.
pub fn assign_heading_ids(headings: &mut [Heading], lowercase_ids: bool) -> Vec<usize> {
    let mut assigned = Vec::new();
    for (index, heading) in headings.iter_mut().enumerate() {
        if heading.id().is_some() {
            continue;
        }
        let id = heading_slug(&heading.text, index, lowercase_ids);
        trace!(index, %id, "assigning heading id");
        heading.id = Some(id);
        assigned.push(index);
    }
    assigned
}

/// Derive a heading identity: letters and spaces only, trimmed, words joined
/// by `-`, suffixed with the heading's index.
///
/// The index suffix keeps identities unique when headings share their text.
pub fn heading_slug(text: &str, index: usize, lowercase: bool) -> String {
    static NON_LETTER_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"[^a-zA-Z ]").expect("valid regex"));

    let letters = NON_LETTER_RE.replace_all(text, "");
    let trimmed = letters.trim();
    let cased = if lowercase {
        trimmed.to_lowercase()
    } else {
        trimmed.to_string()
    };

    // Split on single spaces so runs of spaces keep one dash each.
    let words = cased.split(' ').collect::<Vec<_>>().join("-");
    format!("{words}-{index}")
}

/// Build the nested forest from headings that already have identities.
///
/// Headings without an identity cannot be linked to and are left out.
pub fn build_forest(headings: &[Heading]) -> TocForest {
    let mut forest = TocForest::default();
    let mut cursor = ListCursor::default();
    let mut prev_level: Option<HeadingLevel> = None;

    for (index, heading) in headings.iter().enumerate() {
        let Some(id) = heading.id() else {
            debug!(index, "heading has no identity, skipping");
            continue;
        };

        if let Some(prev) = prev_level {
            let (level, prev) = (heading.level.get(), prev.get());
            if level > prev {
                cursor.descend(&forest.entries);
            } else if level < prev {
                cursor.ascend(usize::from(prev - level));
            }
        }

        cursor
            .list_mut(&mut forest.entries)
            .push(TocNode::new(index, id, heading.content.clone()));
        prev_level = Some(heading.level);
    }

    debug!(entries = forest.len(), depth = forest.depth(), "TOC forest built");
    forest
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Path from the top-level list to the current insertion list.
///
/// Each element is the index of the entry whose children are the next list down.
#[derive(Debug, Default)]
struct ListCursor {
    path: Vec<usize>,
}

impl ListCursor {
    /// Make the children of the most recently inserted entry the current list.
    ///
    /// Descends one level no matter how large the level jump was.
    fn descend(&mut self, top: &[TocNode]) {
        let mut list = top;
        for &i in &self.path {
            list = list[i].children.as_slice();
        }
        if let Some(last) = list.len().checked_sub(1) {
            self.path.push(last);
        }
    }

    /// Climb `levels` lists, stopping at the top-level list.
    fn ascend(&mut self, levels: usize) {
        for _ in 0..levels {
            if self.path.pop().is_none() {
                trace!(levels, "ascend clamped at top-level list");
                break;
            }
        }
    }

    fn list_mut<'a>(&self, top: &'a mut Vec<TocNode>) -> &'a mut Vec<TocNode> {
        let mut list = top;
        for &i in &self.path {
            list = &mut list[i].children;
        }
        list
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
