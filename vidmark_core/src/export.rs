// src/export.rs

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::model::VideoRecord;

/// Portable snapshot of the collection for backup or interchange.
#[derive(Debug, Serialize)]
pub struct ExportDocument {
    pub exported_at: DateTime<Utc>,
    pub total_videos: usize,
    pub videos: Vec<ExportEntry>,
}

#[derive(Debug, Serialize)]
pub struct ExportEntry {
    pub title: String,
    pub url: String,
    pub category: String,
    pub tags: Vec<String>,
    pub confidence: f64,
    pub added_at: DateTime<Utc>,
    pub channel: String,
    pub view_count: u64,
}

impl ExportDocument {
    pub fn from_records(records: &[VideoRecord], exported_at: DateTime<Utc>) -> Self {
        Self {
            exported_at,
            total_videos: records.len(),
            videos: records
                .iter()
                .map(|record| ExportEntry {
                    title: record.title.clone(),
                    url: record.url.clone(),
                    category: record.main_category.clone(),
                    tags: record.tags.clone(),
                    confidence: record.confidence,
                    added_at: record.timestamp,
                    channel: record.channel_title.clone(),
                    view_count: record.view_count,
                })
                .collect(),
        }
    }

    /// `youtube_collection_<YYYY-MM-DD>.json`, dated from the export time.
    pub fn default_filename(&self) -> String {
        format!(
            "youtube_collection_{}.json",
            self.exported_at.format("%Y-%m-%d")
        )
    }
}
