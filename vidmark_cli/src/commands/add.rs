use owo_colors::OwoColorize;

use crate::cli::{Cli, OutputFormat};
use crate::commands::{build_pipeline, Result};

pub async fn run(cli: &Cli, url: &str) -> Result<()> {
    let pipeline = build_pipeline(cli).await?;
    let record = pipeline.ingest(url).await?;

    match cli.output {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
        OutputFormat::Pretty => {
            println!("{} {}", "Saved".green().bold(), record.title.bold());
            println!("  {}  {}", "Channel:".dimmed(), record.channel_title);
            println!(
                "  {}  {} ({:.0}% confidence)",
                "Category:".dimmed(),
                record.main_category.cyan(),
                record.confidence * 100.0
            );
            if !record.tags.is_empty() {
                println!("  {}  {}", "Tags:".dimmed(), record.tags.join(", "));
            }
            println!("  {}  {}", "Id:".dimmed(), record.id);
        }
    }

    Ok(())
}
