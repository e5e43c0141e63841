// src/collection.rs

use tokio::sync::RwLock;

use crate::error::Result;
use crate::model::VideoRecord;
use crate::store::Store;

/// In-memory cache of the collection, newest first. Refreshed from the store
/// and kept in step with every create and delete so reads never need a
/// round trip.
#[derive(Default)]
pub struct Collection {
    records: RwLock<Vec<VideoRecord>>,
}

impl Collection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the cache with a fresh newest-first listing from the store.
    pub async fn refresh<S: Store + ?Sized>(&self, store: &S, limit: usize) -> Result<()> {
        let records = store.list(limit).await?;
        *self.records.write().await = records;
        Ok(())
    }

    pub async fn prepend(&self, record: VideoRecord) {
        self.records.write().await.insert(0, record);
    }

    /// Batch variant; the batch lands ahead of existing records with its own
    /// internal order preserved.
    pub async fn prepend_batch(&self, batch: Vec<VideoRecord>) {
        let mut records = self.records.write().await;
        for record in batch.into_iter().rev() {
            records.insert(0, record);
        }
    }

    pub async fn remove(&self, id: &str) {
        self.records.write().await.retain(|r| r.id != id);
    }

    pub async fn snapshot(&self) -> Vec<VideoRecord> {
        self.records.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Classification, NewVideoRecord, VideoMetadata};

    fn record(id: &str) -> VideoRecord {
        NewVideoRecord::assemble(
            "https://youtu.be/dQw4w9WgXcQ",
            "dQw4w9WgXcQ",
            VideoMetadata::default(),
            Classification::fallback(),
        )
        .into_record(id.to_string())
    }

    #[tokio::test]
    async fn prepend_batch_keeps_batch_order() {
        let collection = Collection::new();
        collection.prepend(record("old")).await;
        collection
            .prepend_batch(vec![record("a"), record("b")])
            .await;

        let ids: Vec<String> = collection
            .snapshot()
            .await
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec!["a", "b", "old"]);
    }

    #[tokio::test]
    async fn remove_drops_only_the_target() {
        let collection = Collection::new();
        collection.prepend(record("keep")).await;
        collection.prepend(record("drop")).await;

        collection.remove("drop").await;
        assert_eq!(collection.len().await, 1);
        assert_eq!(collection.snapshot().await[0].id, "keep");
    }
}
