mod cli;
mod dom;
mod download;
mod latest_versions;
mod logging;
mod output;
mod paths;
mod pep;
mod session;
mod table;
mod whats_new;

use clap::Parser;
use cli::{Cli, Mode};
use table::ResultTable;
use tracing::info;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = logging::init() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    info!("scraper started");
    info!(mode = %cli.mode, clear_cache = cli.clear_cache, output = ?cli.output, "command line arguments");

    if let Err(e) = run(&cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    info!("scraper finished");
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let session = session::Session::new()?;
    if cli.clear_cache {
        session.clear_cache()?;
        info!("HTTP cache cleared");
    }

    let results: Option<ResultTable> = match cli.mode {
        Mode::WhatsNew => Some(whats_new::run(&session)?),
        Mode::LatestVersions => Some(latest_versions::run(&session)?),
        Mode::Download => {
            download::run(&session)?;
            None
        }
        Mode::Pep => Some(pep::run(&session)?),
    };

    if let Some(table) = results {
        output::render(&table, cli.mode, cli.output)?;
    }

    Ok(())
}
