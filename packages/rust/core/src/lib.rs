//! Core TOC logic for scrolltoc.
//!
//! This crate builds the nested table of contents from a document's headings
//! and keeps one link highlighted while the content scrolls. The document
//! itself is reached only through the traits in [`document`].

pub mod controller;
pub mod document;
pub mod highlight;
pub mod render;
pub mod toc;

pub use controller::{ScrollToc, attach};
pub use document::{ContentRegion, Document, TocContainer};
pub use highlight::{Highlighter, select_active};
pub use render::render_toc_html;
pub use toc::{assign_heading_ids, build_forest, build_toc, heading_slug};
