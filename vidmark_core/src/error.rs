// src/error.rs

/// Errors surfaced by the ingestion pipeline. Each variant maps to one
/// failure kind; classification failures are deliberately absent from the
/// single-item surface because the pipeline absorbs them into the fallback
/// classification (see `Pipeline::classify_or_fallback`).
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("invalid YouTube URL: {0}")]
    InvalidUrl(String),

    #[error("video already exists in your collection: {0}")]
    DuplicateVideo(String),

    #[error("video metadata unavailable: {0}")]
    MetadataUnavailable(String),

    #[error("classification failed: {0}")]
    Classification(String),

    #[error("store error: {0}")]
    Store(String),

    #[error("a bulk import is already running")]
    Busy,

    #[error("configuration error: {0}")]
    Config(String),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serde JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PipelineError {
    pub fn code_str(&self) -> &'static str {
        match self {
            PipelineError::InvalidUrl(_) => "invalid_url",
            PipelineError::DuplicateVideo(_) => "duplicate_video",
            PipelineError::MetadataUnavailable(_) => "metadata_unavailable",
            PipelineError::Classification(_) => "classification_failed",
            PipelineError::Store(_) => "store_error",
            PipelineError::Busy => "busy",
            PipelineError::Config(_) => "config_error",
            PipelineError::Http(_) => "upstream_error",
            PipelineError::Json(_) => "parse_error",
        }
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;
