//! Shared types, error model, and configuration for scrolltoc.
//!
//! This crate is the foundation depended on by all other scrolltoc crates.
//! It provides:
//! - [`ScrollTocError`]: the unified error type
//! - Domain types ([`Heading`], [`HeadingLevel`], [`Rect`], [`TocNode`], [`TocForest`])
//! - Configuration ([`AppConfig`], [`TocOptions`], [`HighlightConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, HighlightConfig, PageConfig, TocOptions, config_dir, config_file_path, init_config,
    load_config, load_config_from, validate_config,
};
pub use error::{Result, ScrollTocError};
pub use types::{
    Heading, HeadingLevel, MAX_HEADING_LEVEL, Preorder, Rect, TocForest, TocNode, link_id_for,
};
