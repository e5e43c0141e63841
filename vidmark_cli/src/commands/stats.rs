use owo_colors::OwoColorize;

use crate::cli::{Cli, OutputFormat};
use crate::commands::{build_pipeline, Result};

pub async fn run(cli: &Cli) -> Result<()> {
    let pipeline = build_pipeline(cli).await?;

    let Some(stats) = pipeline.stats().await else {
        println!("{}", "The collection is empty".yellow());
        return Ok(());
    };

    match cli.output {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        OutputFormat::Pretty => {
            println!("{}", "Collection Statistics".bold().cyan());
            println!();
            println!("  {}  {}", "Total videos:".dimmed(), stats.total_videos);
            println!(
                "  {}  {}%",
                "Average confidence:".dimmed(),
                stats.average_confidence
            );
            println!(
                "  {}  {}",
                "Added this week:".dimmed(),
                stats.recent_additions
            );

            if !stats.top_categories.is_empty() {
                println!();
                println!("  {}", "Top categories".bold());
                for entry in &stats.top_categories {
                    println!("    {}  {}", entry.category.cyan(), entry.count);
                }
            }

            if !stats.top_tags.is_empty() {
                println!();
                println!("  {}", "Top tags".bold());
                for entry in &stats.top_tags {
                    println!("    {}  {}", entry.tag, entry.count);
                }
            }

            if !stats.monthly_additions.is_empty() {
                println!();
                println!("  {}", "By month".bold());
                let mut months: Vec<_> = stats.monthly_additions.iter().collect();
                months.sort_by(|a, b| b.1.cmp(a.1));
                for (month, count) in months {
                    println!("    {month}  {count}");
                }
            }
        }
    }

    Ok(())
}
