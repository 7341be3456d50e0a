//! CLI command definitions, routing, and tracing setup.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use color_eyre::eyre::Result;
use serde::Serialize;
use tracing::info;

use scrolltoc_core::{ScrollToc, TocContainer, attach};
use scrolltoc_page::{HtmlPage, PageRegion, PageToc};
use scrolltoc_shared::{
    AppConfig, Heading, init_config, load_config, load_config_from, validate_config,
};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// scrolltoc: nested tables of contents with scroll-tracked highlighting.
#[derive(Parser)]
#[command(
    name = "scrolltoc",
    version,
    about = "Build a table of contents for an HTML page and track the active section while scrolling.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file to use instead of ~/.scrolltoc/scrolltoc.toml.
    #[arg(long, global = true, env = "SCROLLTOC_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// How `build` prints the table of contents.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum OutputFormat {
    Html,
    Json,
}

/// Options shared by every command that loads a page.
#[derive(Args)]
pub(crate) struct PageArgs {
    /// HTML file to index.
    pub file: PathBuf,

    /// Selector of the content region (overrides config).
    #[arg(long)]
    pub content: Option<String>,

    /// Id of the TOC container element (overrides config).
    #[arg(long)]
    pub toc: Option<String>,

    /// Height of the content viewport (overrides config).
    #[arg(long)]
    pub viewport_height: Option<f64>,

    /// Keep the original letter case in generated heading ids.
    #[arg(long)]
    pub keep_case: bool,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Build the table of contents and print it.
    Build {
        #[command(flatten)]
        page: PageArgs,

        /// Output format.
        #[arg(long, default_value = "html")]
        format: OutputFormat,
    },

    /// Scroll to each position in turn and report the active heading.
    Highlight {
        #[command(flatten)]
        page: PageArgs,

        /// Scroll offsets to visit, in order.
        #[arg(long = "scroll", num_args = 1.., required = true, allow_negative_numbers = true)]
        scroll: Vec<f64>,

        /// Print one JSON object per position instead of a table.
        #[arg(long)]
        json: bool,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "scrolltoc=warn",
        1 => "scrolltoc=info",
        2 => "scrolltoc=debug",
        _ => "scrolltoc=trace",
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config;
    match cli.command {
        Command::Build { page, format } => cmd_build(config_path, &page, &format),
        Command::Highlight { page, scroll, json } => {
            cmd_highlight(config_path, &page, &scroll, json)
        }
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(config_path),
        },
    }
}

/// Load the config file, then apply command-line overrides.
fn resolve_config(config_path: Option<PathBuf>, page: Option<&PageArgs>) -> Result<AppConfig> {
    let mut config = match config_path {
        Some(path) => load_config_from(&path)?,
        None => load_config()?,
    };

    if let Some(page) = page {
        if let Some(selector) = &page.content {
            config.toc.content_selector = selector.clone();
        }
        if let Some(id) = &page.toc {
            config.toc.toc_id = id.clone();
        }
        if let Some(height) = page.viewport_height {
            config.page.viewport_height = height;
        }
        if page.keep_case {
            config.toc.lowercase_ids = false;
        }
    }

    validate_config(&config)?;
    Ok(config)
}

fn open_page(config: &AppConfig, page: &PageArgs) -> Result<ScrollToc<PageRegion, PageToc>> {
    let document = HtmlPage::from_path(&page.file, config.page.clone())?;
    let attached = attach(&document, &config.toc, &config.highlight)?;
    info!(
        file = %page.file.display(),
        headings = attached.headings().len(),
        "page loaded"
    );
    Ok(attached)
}

fn cmd_build(config_path: Option<PathBuf>, page: &PageArgs, format: &OutputFormat) -> Result<()> {
    let config = resolve_config(config_path, Some(page))?;
    let attached = open_page(&config, page)?;

    match format {
        OutputFormat::Html => {
            print!("{}", attached.toc().render_html(&config.highlight.active_class));
        }
        OutputFormat::Json => {
            let out = serde_json::json!({
                "headings": attached.headings(),
                "toc": attached.forest(),
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
    }

    Ok(())
}

/// One replayed scroll position.
#[derive(Serialize)]
struct ScrollReport<'a> {
    requested: f64,
    scroll_top: f64,
    active: Option<&'a str>,
    active_link: Option<&'a str>,
    toc_scroll_top: f64,
}

fn cmd_highlight(
    config_path: Option<PathBuf>,
    page: &PageArgs,
    positions: &[f64],
    json: bool,
) -> Result<()> {
    let config = resolve_config(config_path, Some(page))?;
    let mut attached = open_page(&config, page)?;

    if !json {
        println!("{:>10}  {:>10}  {:>10}  ACTIVE", "REQUESTED", "SCROLL", "TOC");
    }

    for &requested in positions {
        let scroll_top = attached.region_mut().scroll_to(requested);
        attached.on_scroll();

        let report = ScrollReport {
            requested,
            scroll_top,
            active: attached.active_heading().and_then(Heading::id),
            active_link: attached.active_link(),
            toc_scroll_top: attached.toc().scroll_top(),
        };

        if json {
            println!("{}", serde_json::to_string(&report)?);
        } else {
            println!(
                "{:>10.1}  {:>10.1}  {:>10.1}  {}",
                report.requested,
                report.scroll_top,
                report.toc_scroll_top,
                report.active.unwrap_or("-"),
            );
        }
    }

    debug_assert!(
        attached
            .toc()
            .links_with_class(&config.highlight.active_class)
            .len()
            <= 1
    );
    debug_assert!(
        attached
            .active_link()
            .is_none_or(|link| attached.toc().link_rect(link).is_some())
    );

    Ok(())
}

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show(config_path: Option<PathBuf>) -> Result<()> {
    let config = resolve_config(config_path, None)?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}
