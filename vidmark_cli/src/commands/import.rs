use std::io::Read;
use std::path::Path;

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;

use crate::cli::{Cli, OutputFormat};
use crate::commands::{build_pipeline, Result};
use vidmark_core::{pipeline::split_batch, BulkState};

pub async fn run(cli: &Cli, file: Option<&Path>) -> Result<()> {
    let text = match file {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };

    let total = split_batch(&text).len();
    if total == 0 {
        println!("{}", "Nothing to import".yellow());
        return Ok(());
    }

    let pipeline = build_pipeline(cli).await?;
    let mut progress = pipeline.subscribe();

    let bar = match cli.output {
        OutputFormat::Pretty => {
            let bar = ProgressBar::new(total as u64);
            bar.set_style(
                ProgressStyle::with_template("{bar:40} {pos}/{len} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_bar()),
            );
            Some(bar)
        }
        OutputFormat::Json => None,
    };

    // Drive the bar from the watch channel, but never outlive the run:
    // if the run is refused up front it publishes no states at all.
    let run = pipeline.run_bulk(&text);
    tokio::pin!(run);
    let mut watching = true;
    let report = loop {
        tokio::select! {
            result = &mut run => break result,
            changed = progress.changed(), if watching => {
                if changed.is_err() {
                    watching = false;
                    continue;
                }
                if let BulkState::Running { completed, failures, .. } =
                    *progress.borrow_and_update()
                {
                    if let Some(bar) = &bar {
                        bar.set_position(completed as u64);
                        if failures > 0 {
                            bar.set_message(format!("{failures} failed"));
                        }
                    }
                }
            }
        }
    }?;

    if let Some(bar) = bar {
        bar.finish_and_clear();
    }

    match cli.output {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({
                    "created": report.created,
                    "failures": report.failures,
                }))?
            );
        }
        OutputFormat::Pretty => {
            println!(
                "{} {} of {} links imported",
                "Done:".green().bold(),
                report.created,
                total
            );
            if let Some(digest) = report.digest() {
                println!("{}", "Some links failed:".yellow().bold());
                println!("{digest}");
            }
        }
    }

    Ok(())
}
