mod app;
mod cli;
mod content;
mod http;
mod logging;
mod paths;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    logging::init_logging();
    app::run(cli)
}
