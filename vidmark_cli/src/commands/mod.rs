pub mod add;
pub mod delete;
pub mod export;
pub mod import;
pub mod list;
pub mod stats;

use thiserror::Error;
use vidmark_core::providers::{GroqClassifier, YouTubeDataApi};
use vidmark_core::{AppwriteStore, MemoryStore, Pipeline, PipelineError, Store};

use crate::cli::{Cli, StoreBackend};

#[derive(Error, Debug)]
pub enum CommandError {
    #[error("{0}")]
    Pipeline(#[from] PipelineError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CommandError>;

pub type CliPipeline = Pipeline<YouTubeDataApi, GroqClassifier, Box<dyn Store>>;

/// Wire providers and the chosen store, then warm the cache from storage.
pub async fn build_pipeline(cli: &Cli) -> Result<CliPipeline> {
    let store: Box<dyn Store> = match cli.store {
        StoreBackend::Appwrite => Box::new(AppwriteStore::from_env()?),
        StoreBackend::Memory => {
            tracing::warn!("memory store selected, records are lost on exit");
            Box::new(MemoryStore::new())
        }
    };

    let pipeline = Pipeline::new(
        YouTubeDataApi::new(None)?,
        GroqClassifier::new(None, None)?,
        store,
    );
    pipeline.load().await?;
    Ok(pipeline)
}
