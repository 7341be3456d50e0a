//! An in-memory document for scrolltoc, backed by `scraper`.
//!
//! [`HtmlPage`] parses an HTML document and implements the core
//! [`Document`] trait: selectors locate the content region, `h1`..`h6`
//! below it become headings, and an estimated flow layout supplies the
//! geometry the highlighter needs. [`PageToc`] stands in for the TOC element.

mod layout;
mod region;
mod toc;

use std::path::Path;

use scraper::{Html, Selector};
use tracing::{debug, instrument};

use scrolltoc_core::Document;
use scrolltoc_shared::{PageConfig, Result, ScrollTocError};

pub use region::PageRegion;
pub use toc::PageToc;

/// A parsed HTML document with page geometry settings.
pub struct HtmlPage {
    html: Html,
    config: PageConfig,
}

impl HtmlPage {
    pub fn parse(source: &str, config: PageConfig) -> Self {
        Self {
            html: Html::parse_document(source),
            config,
        }
    }

    /// Read and parse an HTML file.
    pub fn from_path(path: &Path, config: PageConfig) -> Result<Self> {
        let source = std::fs::read_to_string(path).map_err(|e| ScrollTocError::io(path, e))?;
        Ok(Self::parse(&source, config))
    }
}

impl Document for HtmlPage {
    type Region = PageRegion;
    type Toc = PageToc;

    #[instrument(skip(self))]
    fn content_region(&self, selector: &str) -> Result<Option<PageRegion>> {
        let parsed = Selector::parse(selector)
            .map_err(|e| ScrollTocError::parse(format!("invalid selector `{selector}`: {e}")))?;

        let Some(root) = self.html.select(&parsed).next() else {
            debug!("no element matches the content selector");
            return Ok(None);
        };

        let flow = layout::lay_out(root, &self.config);
        Ok(Some(PageRegion::new(flow, self.config.viewport_height)))
    }

    fn toc_container(&self, id: &str) -> Option<PageToc> {
        let with_id = Selector::parse("[id]").unwrap();
        self.html
            .select(&with_id)
            .any(|el| el.value().attr("id") == Some(id))
            .then(|| PageToc::new(id, self.config.toc_row_height, self.config.toc_viewport_height))
    }
}
