use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, ContentArrangement, Table};
use owo_colors::OwoColorize;

use crate::cli::{Cli, OutputFormat};
use crate::commands::{build_pipeline, Result};

const TITLE_WIDTH: usize = 50;

/// Truncate on a char boundary, adding "..." when shortened.
fn truncate(text: &str, max_width: usize) -> String {
    if text.chars().count() <= max_width {
        return text.to_string();
    }
    let kept: String = text.chars().take(max_width.saturating_sub(3)).collect();
    format!("{kept}...")
}

pub async fn run(cli: &Cli, limit: usize) -> Result<()> {
    let pipeline = build_pipeline(cli).await?;
    // The warm cache holds the default window; larger limits need a reload
    if limit > vidmark_core::pipeline::DEFAULT_LIST_LIMIT {
        pipeline.load_limit(limit).await?;
    }
    let mut records = pipeline.collection().snapshot().await;
    records.truncate(limit);

    if records.is_empty() {
        println!("{}", "The collection is empty".yellow());
        return Ok(());
    }

    match cli.output {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
        OutputFormat::Pretty => {
            println!("{}", "Your Collection".bold().cyan());
            println!();

            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .apply_modifier(UTF8_ROUND_CORNERS)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["Id", "Title", "Channel", "Category", "Added"]);

            for record in &records {
                table.add_row(vec![
                    record.id.clone(),
                    truncate(&record.title, TITLE_WIDTH),
                    record.channel_title.clone(),
                    record.main_category.clone(),
                    record.timestamp.format("%Y-%m-%d").to_string(),
                ]);
            }

            println!("{table}");
            println!();
            println!(
                "{} {} record(s). Use {} for machine-readable output",
                "Showing".dimmed(),
                records.len(),
                "--output json".cyan()
            );
        }
    }

    Ok(())
}
