use maps_scraper_lib::{input_loader, logger, orchestrator, settings};
use maps_scraper_lib::{ChromeSession, Settings};

use std::path::PathBuf;
use std::process::ExitCode;
use anyhow::Context;
use clap::Parser;
use log::{info, error};

#[derive(Parser, Debug)]
#[command(name = "maps-business-scraper", version, about = "Collect business listings from map search results")]
struct Cli {
    /// Search a single term instead of reading the input file
    #[arg(short, long)]
    search: Option<String>,

    /// Maximum number of businesses to collect per search term
    #[arg(short, long, default_value_t = settings::DEFAULT_TOTAL)]
    total: usize,

    /// File with one search term per line
    #[arg(long, default_value = settings::DEFAULT_INPUT_FILE)]
    input: PathBuf,

    /// Directory for per-search CSV files and the master list
    #[arg(long, default_value = settings::DEFAULT_OUTPUT_DIR)]
    output_dir: PathBuf,

    /// Directory for diagnostic screenshots
    #[arg(long, default_value = settings::DEFAULT_SCREENSHOT_DIR)]
    screenshots: PathBuf,

    /// Show the browser window
    #[arg(long)]
    headful: bool,

    /// Log per-entry detail
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logger::init(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    info!("Starting maps business scraper...");

    let terms = match cli.search {
        Some(term) => vec![term],
        None => input_loader::load_search_terms(&cli.input),
    };
    if terms.is_empty() {
        anyhow::bail!(
            "no search terms: pass --search or add searches to {}",
            cli.input.display()
        );
    }

    let settings = Settings {
        headless: !cli.headful,
        screenshot_dir: Some(cli.screenshots),
        ..Settings::default()
    };

    // Dropping the session closes the browser, whichever way this returns.
    let mut session = ChromeSession::launch(&settings).context("could not set up the browser session")?;
    orchestrator::run_searches(&mut session, &terms, cli.total, &cli.output_dir, &settings)?;
    Ok(())
}
