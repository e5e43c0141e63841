use clap::Parser;
use owo_colors::OwoColorize;
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod commands;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // -v raises core/cli logging; RUST_LOG still wins when set
    let default_filter = match cli.verbose {
        0 => "vidmark_cli=info",
        1 => "vidmark_cli=debug,vidmark_core=debug",
        _ => "trace",
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let result = match &cli.command {
        Commands::Add { url } => commands::add::run(&cli, url).await,
        Commands::Import { file } => commands::import::run(&cli, file.as_deref()).await,
        Commands::List { limit } => commands::list::run(&cli, *limit).await,
        Commands::Stats => commands::stats::run(&cli).await,
        Commands::Export { output } => commands::export::run(&cli, output.as_deref()).await,
        Commands::Delete { id } => commands::delete::run(&cli, id).await,
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        process::exit(1);
    }
}
