// src/model.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The fixed candidate set the classifier must pick `main_category` from.
pub const CATEGORIES: &[&str] = &[
    "Technology",
    "Education",
    "Entertainment",
    "Music",
    "Gaming",
    "Sports",
    "News",
    "Lifestyle",
    "Business",
    "Science",
    "Art",
    "Comedy",
    "Travel",
    "Food",
    "Health",
    "DIY",
    "Review",
    "Tutorial",
    "Vlog",
    "Other",
];

pub const MAX_SUB_CATEGORIES: usize = 3;
pub const MAX_TAGS: usize = 6;

/// Provider-sourced video details, as returned by the metadata provider.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VideoMetadata {
    pub title: String,
    pub description: String,
    pub thumbnail: String,
    pub channel_title: String,
    pub published_at: String,
    pub view_count: u64,
}

/// The AI-derived category/tag/confidence judgment for one video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub main_category: String,
    #[serde(default)]
    pub sub_categories: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub confidence: f64,
}

impl Classification {
    /// The fixed default used whenever the classification provider cannot
    /// produce a valid result. Ingestion never fails on classification.
    pub fn fallback() -> Self {
        Self {
            main_category: "Other".to_string(),
            sub_categories: Vec::new(),
            tags: vec!["video".to_string(), "content".to_string()],
            confidence: 0.5,
        }
    }

    /// Enforce the record invariants: non-empty category, at most 3
    /// sub-categories, at most 6 tags (insertion order kept), confidence
    /// clamped to [0, 1].
    pub fn normalize(mut self) -> Self {
        if self.main_category.trim().is_empty() {
            self.main_category = "Other".to_string();
        }
        self.sub_categories.truncate(MAX_SUB_CATEGORIES);
        self.tags.truncate(MAX_TAGS);
        self.confidence = self.confidence.clamp(0.0, 1.0);
        self
    }
}

/// A persisted, classified video bookmark. Immutable once created; the only
/// lifecycle transition after creation is deletion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoRecord {
    pub id: String,
    pub url: String,
    pub video_id: String,
    pub timestamp: DateTime<Utc>,
    pub title: String,
    pub description: String,
    pub thumbnail: String,
    pub channel_title: String,
    pub published_at: String,
    pub main_category: String,
    pub sub_categories: Vec<String>,
    pub tags: Vec<String>,
    pub confidence: f64,
    pub view_count: u64,
}

/// A record ready for persistence; the store assigns the id on create.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewVideoRecord {
    pub url: String,
    pub video_id: String,
    pub timestamp: DateTime<Utc>,
    pub title: String,
    pub description: String,
    pub thumbnail: String,
    pub channel_title: String,
    pub published_at: String,
    pub main_category: String,
    pub sub_categories: Vec<String>,
    pub tags: Vec<String>,
    pub confidence: f64,
    pub view_count: u64,
}

impl NewVideoRecord {
    /// Pure composition of the pipeline stages' outputs into a persistable
    /// record, applying all documented field defaults. No I/O.
    pub fn assemble(
        url: &str,
        video_id: &str,
        metadata: VideoMetadata,
        classification: Classification,
    ) -> Self {
        let classification = classification.normalize();
        Self {
            url: url.to_string(),
            video_id: video_id.to_string(),
            timestamp: Utc::now(),
            title: metadata.title,
            description: metadata.description,
            thumbnail: metadata.thumbnail,
            channel_title: metadata.channel_title,
            published_at: metadata.published_at,
            main_category: classification.main_category,
            sub_categories: classification.sub_categories,
            tags: classification.tags,
            confidence: classification.confidence,
            view_count: metadata.view_count,
        }
    }

    pub fn into_record(self, id: String) -> VideoRecord {
        VideoRecord {
            id,
            url: self.url,
            video_id: self.video_id,
            timestamp: self.timestamp,
            title: self.title,
            description: self.description,
            thumbnail: self.thumbnail,
            channel_title: self.channel_title,
            published_at: self.published_at,
            main_category: self.main_category,
            sub_categories: self.sub_categories,
            tags: self.tags,
            confidence: self.confidence,
            view_count: self.view_count,
        }
    }
}
