// src/store/mod.rs

pub mod appwrite;

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::Result;
use crate::model::{NewVideoRecord, VideoRecord};

pub use appwrite::AppwriteStore;

/// Persistence boundary for the collection. The store is the sole source of
/// truth; the in-memory [`Collection`](crate::Collection) is a cache over it.
#[async_trait]
pub trait Store: Send + Sync {
    /// Newest-first listing, capped at `limit` records.
    async fn list(&self, limit: usize) -> Result<Vec<VideoRecord>>;

    /// Persist a record and return it with its store-assigned id.
    async fn create(&self, record: NewVideoRecord) -> Result<VideoRecord>;

    async fn delete(&self, id: &str) -> Result<()>;

    /// Duplicate lookup by canonical video id.
    async fn find_by_video_id(&self, video_id: &str) -> Result<Option<VideoRecord>>;
}

#[async_trait]
impl<T: Store + ?Sized> Store for std::sync::Arc<T> {
    async fn list(&self, limit: usize) -> Result<Vec<VideoRecord>> {
        (**self).list(limit).await
    }

    async fn create(&self, record: NewVideoRecord) -> Result<VideoRecord> {
        (**self).create(record).await
    }

    async fn delete(&self, id: &str) -> Result<()> {
        (**self).delete(id).await
    }

    async fn find_by_video_id(&self, video_id: &str) -> Result<Option<VideoRecord>> {
        (**self).find_by_video_id(video_id).await
    }
}

#[async_trait]
impl<T: Store + ?Sized> Store for Box<T> {
    async fn list(&self, limit: usize) -> Result<Vec<VideoRecord>> {
        (**self).list(limit).await
    }

    async fn create(&self, record: NewVideoRecord) -> Result<VideoRecord> {
        (**self).create(record).await
    }

    async fn delete(&self, id: &str) -> Result<()> {
        (**self).delete(id).await
    }

    async fn find_by_video_id(&self, video_id: &str) -> Result<Option<VideoRecord>> {
        (**self).find_by_video_id(video_id).await
    }
}

/// In-process store. Useful for tests and for running without a configured
/// backend; contents are lost on exit.
#[derive(Default)]
pub struct MemoryStore {
    records: RwLock<Vec<VideoRecord>>,
    next_id: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn list(&self, limit: usize) -> Result<Vec<VideoRecord>> {
        let records = self.records.read().await;
        let mut listed: Vec<VideoRecord> = records.iter().cloned().collect();
        listed.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        listed.truncate(limit);
        Ok(listed)
    }

    async fn create(&self, record: NewVideoRecord) -> Result<VideoRecord> {
        let id = format!("rec-{}", self.next_id.fetch_add(1, Ordering::Relaxed) + 1);
        let record = record.into_record(id);
        self.records.write().await.push(record.clone());
        Ok(record)
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let mut records = self.records.write().await;
        records.retain(|r| r.id != id);
        Ok(())
    }

    async fn find_by_video_id(&self, video_id: &str) -> Result<Option<VideoRecord>> {
        let records = self.records.read().await;
        Ok(records.iter().find(|r| r.video_id == video_id).cloned())
    }
}
