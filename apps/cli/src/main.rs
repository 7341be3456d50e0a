//! scrolltoc CLI: build a table of contents for an HTML page and replay
//! scrolling to see which entry stays highlighted.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli)
}
