//! Pledge CLI - Command-line interface for pledge-loan analysis.
//!
//! # Usage
//!
//! ```bash
//! # Analyze with manual prices
//! pledge analyze --holding 0050=10 --holding 00878=20 --price 0050.TW=150 --price 00878.TW=22.5
//!
//! # Prices from a file, 40% loan-to-value
//! pledge analyze --portfolio holdings.csv --prices prices.csv --ltv 40
//!
//! # Live quotes (requires the `yahoo` feature)
//! pledge analyze --holding 0050=10 --live --format json
//!
//! # Write a default configuration file
//! pledge config init
//! ```

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cli;
mod commands;
mod error;
mod output;
mod settings;

use cli::{Cli, Commands};

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("pledge_cli=debug,pledge_core=debug,pledge_traits=debug,pledge_ext_file=debug")
        })
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    // stdout carries the report
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let ctx = commands::Context {
        format: cli.format,
        quiet: cli.quiet,
        config_path: cli.config,
    };

    match cli.command {
        Commands::Analyze(args) => commands::analyze::execute(args, &ctx).await?,
        Commands::Config(args) => commands::config::execute(args, &ctx)?,
    }

    Ok(())
}
