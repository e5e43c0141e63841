use std::path::Path;

use owo_colors::OwoColorize;

use crate::cli::Cli;
use crate::commands::{build_pipeline, Result};

pub async fn run(cli: &Cli, output: Option<&Path>) -> Result<()> {
    let pipeline = build_pipeline(cli).await?;
    let document = pipeline.export().await;

    let path = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| document.default_filename().into());

    std::fs::write(&path, serde_json::to_string_pretty(&document)?)?;

    println!(
        "{} {} video(s) written to {}",
        "Exported".green().bold(),
        document.total_videos,
        path.display()
    );

    Ok(())
}
