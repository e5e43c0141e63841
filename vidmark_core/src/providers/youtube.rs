// src/providers/youtube.rs

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::error::{PipelineError, Result};
use crate::model::VideoMetadata;
use crate::MetadataProvider;

const VIDEOS_ENDPOINT: &str = "https://www.googleapis.com/youtube/v3/videos";

/// Metadata provider backed by the YouTube Data API v3 `videos` endpoint.
pub struct YouTubeDataApi {
    client: Client,
    api_key: String,
}

impl YouTubeDataApi {
    /// Build from an explicit key, falling back to `YOUTUBE_API_KEY`.
    pub fn new(api_key: Option<String>) -> Result<Self> {
        let api_key = api_key
            .or_else(|| std::env::var("YOUTUBE_API_KEY").ok())
            .ok_or_else(|| PipelineError::Config("YOUTUBE_API_KEY not set".to_string()))?;

        Ok(Self {
            client: Client::builder()
                .user_agent(crate::providers::USER_AGENT)
                .build()?,
            api_key,
        })
    }
}

#[derive(Debug, Deserialize)]
struct VideosResponse {
    #[serde(default)]
    items: Vec<VideoItem>,
}

#[derive(Debug, Deserialize)]
struct VideoItem {
    snippet: Option<Snippet>,
    statistics: Option<Statistics>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Snippet {
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    channel_title: String,
    #[serde(default)]
    published_at: String,
    #[serde(default)]
    thumbnails: Thumbnails,
}

#[derive(Debug, Default, Deserialize)]
struct Thumbnails {
    high: Option<Thumbnail>,
    medium: Option<Thumbnail>,
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    url: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Statistics {
    // The Data API returns counters as strings
    #[serde(default)]
    view_count: String,
}

impl VideoItem {
    fn into_metadata(self) -> Option<VideoMetadata> {
        let snippet = self.snippet?;
        let thumbnail = snippet
            .thumbnails
            .high
            .or(snippet.thumbnails.medium)
            .map(|t| t.url)
            .unwrap_or_default();
        let view_count = self
            .statistics
            .map(|s| s.view_count.parse().unwrap_or(0))
            .unwrap_or(0);

        Some(VideoMetadata {
            title: snippet.title,
            description: snippet.description,
            thumbnail,
            channel_title: snippet.channel_title,
            published_at: snippet.published_at,
            view_count,
        })
    }
}

#[async_trait]
impl MetadataProvider for YouTubeDataApi {
    async fn fetch_metadata(&self, video_id: &str) -> Result<VideoMetadata> {
        let response = self
            .client
            .get(VIDEOS_ENDPOINT)
            .query(&[
                ("id", video_id),
                ("key", self.api_key.as_str()),
                ("part", "snippet,statistics"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(%status, video_id, "videos endpoint returned an error");
            return Err(PipelineError::MetadataUnavailable(format!(
                "videos endpoint returned {status}: {body}"
            )));
        }

        let payload: VideosResponse = response.json().await?;
        payload
            .items
            .into_iter()
            .next()
            .and_then(VideoItem::into_metadata)
            .ok_or_else(|| {
                PipelineError::MetadataUnavailable(format!("video not found: {video_id}"))
            })
    }
}
