//! Application configuration for scrolltoc.
//!
//! User config lives at `~/.scrolltoc/scrolltoc.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScrollTocError};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "scrolltoc.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".scrolltoc";

// ---------------------------------------------------------------------------
// Config structs (matching scrolltoc.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Where headings come from and where the list goes.
    #[serde(default)]
    pub toc: TocOptions,

    /// Active-heading selection tuning.
    #[serde(default)]
    pub highlight: HighlightConfig,

    /// Geometry of the in-memory page used by the CLI.
    #[serde(default)]
    pub page: PageConfig,
}

/// `[toc]` section, also the options handed to `attach`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TocOptions {
    /// Selector of the container whose headings are indexed.
    #[serde(default = "default_content_selector")]
    pub content_selector: String,

    /// Id of the element that receives the generated list.
    #[serde(default = "default_toc_id")]
    pub toc_id: String,

    /// Lower-case generated heading identities.
    #[serde(default = "default_true")]
    pub lowercase_ids: bool,
}

impl Default for TocOptions {
    fn default() -> Self {
        Self {
            content_selector: default_content_selector(),
            toc_id: default_toc_id(),
            lowercase_ids: true,
        }
    }
}

fn default_content_selector() -> String {
    "main".into()
}
fn default_toc_id() -> String {
    "toc".into()
}
fn default_true() -> bool {
    true
}

/// `[highlight]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighlightConfig {
    /// Tolerance, in viewport units, for "at or above the top edge".
    #[serde(default = "default_edge_epsilon")]
    pub edge_epsilon: f64,

    /// Headings whose top lies below this fraction of the viewport height do
    /// not take over from the section filling the viewport.
    #[serde(default = "default_bottom_fraction")]
    pub bottom_fraction: f64,

    /// Class toggled on the active link.
    #[serde(default = "default_active_class")]
    pub active_class: String,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            edge_epsilon: default_edge_epsilon(),
            bottom_fraction: default_bottom_fraction(),
            active_class: default_active_class(),
        }
    }
}

fn default_edge_epsilon() -> f64 {
    10.0
}
fn default_bottom_fraction() -> f64 {
    0.9
}
fn default_active_class() -> String {
    "active".into()
}

/// `[page]` section: layout estimates for documents without a rendering engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageConfig {
    /// Height of the content viewport.
    #[serde(default = "default_viewport_height")]
    pub viewport_height: f64,

    /// Height of one line of body text.
    #[serde(default = "default_line_height")]
    pub line_height: f64,

    /// Characters that fit on one line before wrapping.
    #[serde(default = "default_chars_per_line")]
    pub chars_per_line: usize,

    /// Vertical space after each block.
    #[serde(default = "default_block_gap")]
    pub block_gap: f64,

    /// Height of one TOC link row.
    #[serde(default = "default_toc_row_height")]
    pub toc_row_height: f64,

    /// Height of the TOC's own scrollable area.
    #[serde(default = "default_toc_viewport_height")]
    pub toc_viewport_height: f64,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            viewport_height: default_viewport_height(),
            line_height: default_line_height(),
            chars_per_line: default_chars_per_line(),
            block_gap: default_block_gap(),
            toc_row_height: default_toc_row_height(),
            toc_viewport_height: default_toc_viewport_height(),
        }
    }
}

fn default_viewport_height() -> f64 {
    800.0
}
fn default_line_height() -> f64 {
    24.0
}
fn default_chars_per_line() -> usize {
    80
}
fn default_block_gap() -> f64 {
    16.0
}
fn default_toc_row_height() -> f64 {
    28.0
}
fn default_toc_viewport_height() -> f64 {
    400.0
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.scrolltoc/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| ScrollTocError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.scrolltoc/scrolltoc.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| ScrollTocError::io(path, e))?;

    let config: AppConfig = toml::from_str(&content).map_err(|e| {
        ScrollTocError::config(format!("failed to parse {}: {e}", path.display()))
    })?;
    validate_config(&config)?;
    Ok(config)
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| ScrollTocError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| ScrollTocError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| ScrollTocError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

/// Reject values the highlighter and layout cannot work with.
pub fn validate_config(config: &AppConfig) -> Result<()> {
    if config.toc.content_selector.trim().is_empty() {
        return Err(ScrollTocError::config("toc.content_selector must not be empty"));
    }
    if config.toc.toc_id.trim().is_empty() {
        return Err(ScrollTocError::config("toc.toc_id must not be empty"));
    }

    let hl = &config.highlight;
    if hl.edge_epsilon.is_nan() || hl.edge_epsilon < 0.0 {
        return Err(ScrollTocError::config(format!(
            "highlight.edge_epsilon must be >= 0, got {}",
            hl.edge_epsilon
        )));
    }
    if hl.bottom_fraction.is_nan() || hl.bottom_fraction <= 0.0 || hl.bottom_fraction > 1.0 {
        return Err(ScrollTocError::config(format!(
            "highlight.bottom_fraction must be in (0, 1], got {}",
            hl.bottom_fraction
        )));
    }
    if hl.active_class.trim().is_empty() {
        return Err(ScrollTocError::config("highlight.active_class must not be empty"));
    }

    let page = &config.page;
    for (name, value) in [
        ("page.viewport_height", page.viewport_height),
        ("page.line_height", page.line_height),
        ("page.toc_row_height", page.toc_row_height),
        ("page.toc_viewport_height", page.toc_viewport_height),
    ] {
        if value.is_nan() || value <= 0.0 {
            return Err(ScrollTocError::config(format!(
                "{name} must be positive, got {value}"
            )));
        }
    }
    if page.block_gap.is_nan() || page.block_gap < 0.0 {
        return Err(ScrollTocError::config("page.block_gap must not be negative"));
    }
    if page.chars_per_line == 0 {
        return Err(ScrollTocError::config("page.chars_per_line must be positive"));
    }

    Ok(())
}
