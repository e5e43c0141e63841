use owo_colors::OwoColorize;

use crate::cli::Cli;
use crate::commands::{build_pipeline, Result};

pub async fn run(cli: &Cli, id: &str) -> Result<()> {
    let pipeline = build_pipeline(cli).await?;
    pipeline.delete(id).await?;

    println!("{} record {}", "Removed".green().bold(), id.bold());
    Ok(())
}
