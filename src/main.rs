// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging on stderr
// 3. Validate the selection (before any network traffic)
// 4. Fetch the mirror list and write it to a new file
// 5. Exit with status 0 on success, 1 on any failure
//
// Only one request is ever in flight, so a single-threaded tokio runtime is
// all we need to drive reqwest.
// =============================================================================

mod cli;
mod error;
mod mirrorlist;
mod output;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use mirrorlist::{MirrorListFetcher, Termination};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse_from(cli::normalize_args(std::env::args_os()));

    if let Err(e) = init_logging(cli.log_level_filter()) {
        eprintln!("Warning: could not set up logging: {}", e);
    }

    let exit_code = match run(cli).await {
        Ok(()) => 0,
        Err(e) => {
            // {:#} prints the whole context chain on one line
            eprintln!("Error: {:#}", e);
            1
        }
    };

    std::process::exit(exit_code);
}

fn init_logging(level: log::LevelFilter) -> Result<()> {
    stderrlog::new()
        .module(module_path!())
        .show_module_names(true)
        .verbosity(level)
        .init()?;
    Ok(())
}

async fn run(cli: Cli) -> Result<()> {
    // Check if we have all we need
    let config = cli.fetch_config()?;
    let out = cli.output_path()?;

    let fetcher = MirrorListFetcher::builder()
        .base_url(cli.url.as_str())
        .timeout(cli.timeout())
        .build()?;

    println!("🔍 Fetching mirror list for country '{}'", config.country());

    let lines = fetcher
        .fetch(&config)
        .await
        .context("Failed requesting the mirrorlist")?;

    let lines = if cli.strict {
        lines.into_complete().context("Failed requesting the mirrorlist")?
    } else {
        if let Termination::ReadError(message) = lines.termination() {
            println!(
                "⚠️  Download broke off ({}); saving the {} line(s) received",
                message,
                lines.len()
            );
        }
        lines
    };

    if lines.html_detected() {
        println!("⚠️  The response contains HTML; the mirror list may not work");
    }

    if lines.is_empty() {
        println!("⚠️  The mirror list is empty");
    }

    let written = output::write_mirrorlist(out, &lines)?;
    log::info!("{} line(s), {} byte(s)", lines.len(), written);

    println!("✅ Mirror list written to {}", out.display());
    Ok(())
}
