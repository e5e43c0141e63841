// src/lib.rs
pub mod collection;
pub mod error;
pub mod export;
pub mod model;
pub mod pipeline;
pub mod providers;
pub mod resolver;
pub mod stats;
pub mod store;

use async_trait::async_trait;

pub use crate::collection::Collection;
pub use crate::error::{PipelineError, Result};
pub use crate::export::ExportDocument;
pub use crate::model::{Classification, NewVideoRecord, VideoMetadata, VideoRecord};
pub use crate::pipeline::{BulkReport, BulkState, Pipeline};
pub use crate::stats::CollectionStats;
pub use crate::store::{AppwriteStore, MemoryStore, Store};

/// Retrieves title/description/channel/thumbnail/view-count for a resolved
/// video id from an external video-info provider.
///
/// Kept deliberately narrow so concrete providers are substitutable and
/// mockable in tests.
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    async fn fetch_metadata(&self, video_id: &str) -> Result<VideoMetadata>;
}

/// Requests a structured category/tag/confidence judgment for fetched video
/// metadata from an external language-model provider.
///
/// Implementations surface their errors; the pipeline absorbs every failure
/// into [`Classification::fallback`] so classification can never block
/// ingestion.
#[async_trait]
pub trait Classifier: Send + Sync {
    async fn classify(&self, metadata: &VideoMetadata) -> Result<Classification>;
}
