//! Core domain types for scrolltoc.

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScrollTocError};

/// Deepest heading level a document may use (`<h6>`).
pub const MAX_HEADING_LEVEL: u8 = 6;

// ---------------------------------------------------------------------------
// HeadingLevel
// ---------------------------------------------------------------------------

/// A heading level in `1..=6`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct HeadingLevel(u8);

impl HeadingLevel {
    /// Validate a raw level.
    pub fn new(level: u8) -> Result<Self> {
        if (1..=MAX_HEADING_LEVEL).contains(&level) {
            Ok(Self(level))
        } else {
            Err(ScrollTocError::validation(format!(
                "heading level {level} outside 1..={MAX_HEADING_LEVEL}"
            )))
        }
    }

    /// Level of a heading tag name such as `h3` or `H3`.
    pub fn from_tag(tag: &str) -> Option<Self> {
        let digits = tag.strip_prefix(['h', 'H'])?;
        let level: u8 = digits.parse().ok()?;
        Self::new(level).ok()
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for HeadingLevel {
    type Error = ScrollTocError;

    fn try_from(level: u8) -> Result<Self> {
        Self::new(level)
    }
}

impl From<HeadingLevel> for u8 {
    fn from(level: HeadingLevel) -> Self {
        level.0
    }
}

impl std::fmt::Display for HeadingLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "h{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Heading
// ---------------------------------------------------------------------------

/// A heading discovered in the content region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Heading {
    pub level: HeadingLevel,
    /// Inner markup, mirrored verbatim into the TOC link.
    pub content: String,
    /// Plain text of `content`, used to derive identities.
    pub text: String,
    /// Stable identity (the element `id`), once known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl Heading {
    /// A heading whose markup is just its text.
    pub fn new(level: HeadingLevel, text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            level,
            content: text.clone(),
            text,
            id: None,
        }
    }

    /// Identity, treating an empty string as absent.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.is_empty())
    }

    /// Id of the TOC link that points at this heading.
    pub fn link_id(&self) -> Option<String> {
        self.id().map(link_id_for)
    }
}

/// Id given to the TOC link for the heading with identity `heading_id`.
pub fn link_id_for(heading_id: &str) -> String {
    format!("{heading_id}-link")
}

// ---------------------------------------------------------------------------
// Rect
// ---------------------------------------------------------------------------

/// Vertical extent of a box relative to its viewport's top edge.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub top: f64,
    pub bottom: f64,
}

impl Rect {
    pub fn new(top: f64, bottom: f64) -> Self {
        Self { top, bottom }
    }

    /// Same box after scrolling its viewport down by `dy`.
    pub fn shifted(&self, dy: f64) -> Self {
        Self {
            top: self.top - dy,
            bottom: self.bottom - dy,
        }
    }
}

// ---------------------------------------------------------------------------
// TocNode / TocForest
// ---------------------------------------------------------------------------

/// One link in the generated table of contents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TocNode {
    /// Position of the heading in document order.
    pub heading_index: usize,
    /// Identity of the heading this entry points at.
    pub heading_id: String,
    /// Element id of the link itself (`<heading_id>-link`).
    pub link_id: String,
    /// Link destination (`#<heading_id>`).
    pub href: String,
    /// Heading markup, mirrored.
    pub content: String,
    /// Next-deeper nesting level.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TocNode>,
}

impl TocNode {
    pub fn new(heading_index: usize, heading_id: &str, content: impl Into<String>) -> Self {
        Self {
            heading_index,
            heading_id: heading_id.to_string(),
            link_id: link_id_for(heading_id),
            href: format!("#{heading_id}"),
            content: content.into(),
            children: Vec::new(),
        }
    }
}

/// The generated list structure: an ordered top-level list of trees.
///
/// The top-level list always exists, even when the document has no headings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TocForest {
    pub entries: Vec<TocNode>,
}

impl TocForest {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of links at every depth.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Preorder walk yielding `(depth, node)`, depth 0 being the top-level list.
    pub fn iter(&self) -> Preorder<'_> {
        Preorder {
            stack: self.entries.iter().rev().map(|n| (0, n)).collect(),
        }
    }

    /// Find a node by the id of its link.
    pub fn find_link(&self, link_id: &str) -> Option<&TocNode> {
        self.iter().map(|(_, n)| n).find(|n| n.link_id == link_id)
    }

    /// Deepest nesting level present (0 when the forest is empty).
    pub fn depth(&self) -> usize {
        self.iter().map(|(d, _)| d + 1).max().unwrap_or(0)
    }
}

/// Preorder iterator over a [`TocForest`].
pub struct Preorder<'a> {
    stack: Vec<(usize, &'a TocNode)>,
}

impl<'a> Iterator for Preorder<'a> {
    type Item = (usize, &'a TocNode);

    fn next(&mut self) -> Option<Self::Item> {
        let (depth, node) = self.stack.pop()?;
        self.stack
            .extend(node.children.iter().rev().map(|c| (depth + 1, c)));
        Some((depth, node))
    }
}
