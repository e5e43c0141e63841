//! Aggregate statistics over the collection snapshot.
//!
//! Pure computation; the caller supplies the records and the reference time
//! so results are reproducible in tests.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::model::VideoRecord;

const TOP_TAGS: usize = 5;
const TOP_CATEGORIES: usize = 3;
const RECENT_WINDOW_DAYS: i64 = 7;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TagCount {
    pub tag: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct CollectionStats {
    pub total_videos: usize,
    /// Mean confidence as a percentage, rounded to one decimal.
    pub average_confidence: f64,
    /// Records added in the trailing seven days.
    pub recent_additions: usize,
    /// Counts per "Month Year" bucket (e.g. "May 2024").
    pub monthly_additions: HashMap<String, usize>,
    pub top_tags: Vec<TagCount>,
    pub top_categories: Vec<CategoryCount>,
}

/// Counter that remembers first-encounter order, so equal counts rank in the
/// order their key first appeared.
struct OrderedCounter {
    counts: HashMap<String, usize>,
    order: Vec<String>,
}

impl OrderedCounter {
    fn new() -> Self {
        Self {
            counts: HashMap::new(),
            order: Vec::new(),
        }
    }

    fn bump(&mut self, key: &str) {
        let entry = self.counts.entry(key.to_string()).or_insert(0);
        if *entry == 0 {
            self.order.push(key.to_string());
        }
        *entry += 1;
    }

    /// Top `n` entries by count, first-encounter order breaking ties.
    fn top(self, n: usize) -> Vec<(String, usize)> {
        let counts = self.counts;
        let mut ranked: Vec<(String, usize)> = self
            .order
            .into_iter()
            .map(|key| {
                let count = counts[&key];
                (key, count)
            })
            .collect();
        // Stable sort keeps encounter order among equal counts
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.truncate(n);
        ranked
    }
}

impl CollectionStats {
    /// Returns `None` for an empty collection; every statistic is undefined
    /// without at least one record.
    pub fn compute(records: &[VideoRecord], now: DateTime<Utc>) -> Option<Self> {
        if records.is_empty() {
            return None;
        }

        let week_ago = now - Duration::days(RECENT_WINDOW_DAYS);
        let mut categories = OrderedCounter::new();
        let mut tags = OrderedCounter::new();
        let mut monthly_additions: HashMap<String, usize> = HashMap::new();
        let mut confidence_sum = 0.0;
        let mut recent_additions = 0;

        for record in records {
            let category = if record.main_category.is_empty() {
                "Uncategorized"
            } else {
                record.main_category.as_str()
            };
            categories.bump(category);

            for tag in &record.tags {
                tags.bump(tag);
            }

            let month = record.timestamp.format("%B %Y").to_string();
            *monthly_additions.entry(month).or_insert(0) += 1;

            confidence_sum += record.confidence;

            if record.timestamp > week_ago {
                recent_additions += 1;
            }
        }

        let mean_percent = confidence_sum / records.len() as f64 * 100.0;
        let average_confidence = (mean_percent * 10.0).round() / 10.0;

        Some(Self {
            total_videos: records.len(),
            average_confidence,
            recent_additions,
            monthly_additions,
            top_tags: tags
                .top(TOP_TAGS)
                .into_iter()
                .map(|(tag, count)| TagCount { tag, count })
                .collect(),
            top_categories: categories
                .top(TOP_CATEGORIES)
                .into_iter()
                .map(|(category, count)| CategoryCount { category, count })
                .collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Classification, NewVideoRecord, VideoMetadata};

    fn record(
        category: &str,
        tags: &[&str],
        confidence: f64,
        timestamp: DateTime<Utc>,
    ) -> VideoRecord {
        let mut record = NewVideoRecord::assemble(
            "https://youtu.be/dQw4w9WgXcQ",
            "dQw4w9WgXcQ",
            VideoMetadata::default(),
            Classification {
                main_category: category.to_string(),
                sub_categories: Vec::new(),
                tags: tags.iter().map(|t| t.to_string()).collect(),
                confidence,
            },
        )
        .into_record("id".to_string());
        record.timestamp = timestamp;
        record
    }

    fn at(rfc3339: &str) -> DateTime<Utc> {
        rfc3339.parse().unwrap()
    }

    #[test]
    fn empty_collection_has_no_stats() {
        assert!(CollectionStats::compute(&[], Utc::now()).is_none());
    }

    #[test]
    fn confidence_is_a_one_decimal_percentage() {
        let now = at("2024-05-10T00:00:00Z");
        let records = vec![
            record("Music", &[], 0.8, now),
            record("Music", &[], 0.85, now),
        ];
        let stats = CollectionStats::compute(&records, now).unwrap();
        assert_eq!(stats.average_confidence, 82.5);
    }

    #[test]
    fn recent_window_is_trailing_seven_days() {
        let now = at("2024-05-10T00:00:00Z");
        let records = vec![
            record("Music", &[], 0.5, at("2024-05-09T00:00:00Z")),
            record("Music", &[], 0.5, at("2024-05-01T00:00:00Z")),
        ];
        let stats = CollectionStats::compute(&records, now).unwrap();
        assert_eq!(stats.recent_additions, 1);
    }

    #[test]
    fn monthly_buckets_use_month_and_year() {
        let now = at("2024-06-01T00:00:00Z");
        let records = vec![
            record("Music", &[], 0.5, at("2024-05-09T00:00:00Z")),
            record("Music", &[], 0.5, at("2024-05-20T00:00:00Z")),
            record("Music", &[], 0.5, at("2024-06-01T00:00:00Z")),
        ];
        let stats = CollectionStats::compute(&records, now).unwrap();
        assert_eq!(stats.monthly_additions["May 2024"], 2);
        assert_eq!(stats.monthly_additions["June 2024"], 1);
    }

    #[test]
    fn top_lists_are_capped_and_tie_break_on_first_encounter() {
        let now = at("2024-05-10T00:00:00Z");
        let records = vec![
            record("Music", &["a", "b"], 0.5, now),
            record("Gaming", &["b", "c"], 0.5, now),
            record("Music", &["d", "e", "f"], 0.5, now),
            record("Tech", &[], 0.5, now),
            record("News", &[], 0.5, now),
        ];
        let stats = CollectionStats::compute(&records, now).unwrap();

        assert_eq!(stats.top_tags.len(), 5);
        assert_eq!(stats.top_tags[0].tag, "b");
        assert_eq!(stats.top_tags[0].count, 2);
        // Ties keep the order tags were first seen in
        assert_eq!(stats.top_tags[1].tag, "a");

        assert_eq!(stats.top_categories.len(), 3);
        assert_eq!(stats.top_categories[0].category, "Music");
        assert_eq!(stats.top_categories[1].category, "Gaming");
        assert_eq!(stats.top_categories[2].category, "Tech");
    }

    #[test]
    fn empty_category_counts_as_uncategorized() {
        let now = at("2024-05-10T00:00:00Z");
        // Simulates a stored record predating the category default
        let mut legacy = record("Music", &[], 0.5, now);
        legacy.main_category = String::new();
        let records = vec![legacy];
        let stats = CollectionStats::compute(&records, now).unwrap();
        assert_eq!(stats.top_categories[0].category, "Uncategorized");
    }
}
