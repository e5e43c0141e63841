//! Ingestion pipeline: resolve, duplicate-check, fetch, classify, assemble,
//! persist. Single links and bulk batches share the same per-item path.

use std::time::Duration;

use chrono::Utc;
use tokio::sync::watch;

use crate::collection::Collection;
use crate::error::{PipelineError, Result};
use crate::export::ExportDocument;
use crate::model::{Classification, NewVideoRecord, VideoMetadata, VideoRecord};
use crate::resolver::resolve_video_id;
use crate::stats::CollectionStats;
use crate::store::Store;
use crate::{Classifier, MetadataProvider};

/// How many records the cache holds after a refresh.
pub const DEFAULT_LIST_LIMIT: usize = 100;

/// Pause between bulk items, skipped after the final one.
const PACING_DELAY: Duration = Duration::from_secs(1);

/// Failures quoted verbatim in a digest before collapsing to a count.
const DIGEST_VERBATIM: usize = 3;

/// Observable state of the bulk runner, published over a watch channel.
/// `Running` also acts as the reentrancy guard: a second bulk import is
/// refused while one is in flight.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum BulkState {
    #[default]
    Idle,
    Running {
        total: usize,
        completed: usize,
        failures: usize,
    },
    Completed {
        created: usize,
        failures: usize,
    },
}

/// Outcome of a bulk import. Per-item failures are recorded and reported;
/// they never abort the batch.
#[derive(Debug, Clone)]
pub struct BulkReport {
    pub created: usize,
    /// One `"<url>: <error>"` line per failed item, in input order.
    pub failures: Vec<String>,
}

impl BulkReport {
    /// First few failures verbatim, the rest as a count.
    pub fn digest(&self) -> Option<String> {
        if self.failures.is_empty() {
            return None;
        }
        let mut digest = self
            .failures
            .iter()
            .take(DIGEST_VERBATIM)
            .cloned()
            .collect::<Vec<_>>()
            .join("\n");
        if self.failures.len() > DIGEST_VERBATIM {
            digest.push_str(&format!(
                "\n...and {} more",
                self.failures.len() - DIGEST_VERBATIM
            ));
        }
        Some(digest)
    }
}

pub struct Pipeline<M, C, S> {
    metadata: M,
    classifier: C,
    store: S,
    collection: Collection,
    bulk: watch::Sender<BulkState>,
    pacing: Duration,
}

impl<M, C, S> Pipeline<M, C, S>
where
    M: MetadataProvider,
    C: Classifier,
    S: Store,
{
    pub fn new(metadata: M, classifier: C, store: S) -> Self {
        let (bulk, _) = watch::channel(BulkState::Idle);
        Self {
            metadata,
            classifier,
            store,
            collection: Collection::new(),
            bulk,
            pacing: PACING_DELAY,
        }
    }

    /// Override the inter-item pause. Tests use zero.
    pub fn with_pacing(mut self, pacing: Duration) -> Self {
        self.pacing = pacing;
        self
    }

    /// Watch bulk progress; receivers see every state transition.
    pub fn subscribe(&self) -> watch::Receiver<BulkState> {
        self.bulk.subscribe()
    }

    pub fn collection(&self) -> &Collection {
        &self.collection
    }

    /// Refresh the cache from the store, newest first.
    pub async fn load(&self) -> Result<()> {
        self.load_limit(DEFAULT_LIST_LIMIT).await
    }

    /// Refresh with an explicit cap, for callers that need more than the
    /// default window.
    pub async fn load_limit(&self, limit: usize) -> Result<()> {
        self.collection.refresh(&self.store, limit).await
    }

    /// Ingest a single link and make it visible in the cache.
    pub async fn ingest(&self, url: &str) -> Result<VideoRecord> {
        let record = self.process_link(url).await?;
        self.collection.prepend(record.clone()).await;
        Ok(record)
    }

    /// The shared per-item path. Duplicate checks are fail-closed: a store
    /// error here rejects the item rather than risking a duplicate record.
    async fn process_link(&self, url: &str) -> Result<VideoRecord> {
        let video_id = resolve_video_id(url)?;

        if let Some(existing) = self.store.find_by_video_id(&video_id).await? {
            return Err(PipelineError::DuplicateVideo(existing.video_id));
        }

        let metadata = self.metadata.fetch_metadata(&video_id).await?;
        let classification = self.classify_or_fallback(&metadata).await;
        let record = NewVideoRecord::assemble(url, &video_id, metadata, classification);

        self.store.create(record).await
    }

    /// Classification never blocks ingestion; any provider failure degrades
    /// to the fixed fallback.
    async fn classify_or_fallback(&self, metadata: &VideoMetadata) -> Classification {
        match self.classifier.classify(metadata).await {
            Ok(classification) => classification,
            Err(e) => {
                tracing::warn!(error = %e, title = %metadata.title, "classification failed, using fallback");
                Classification::fallback()
            }
        }
    }

    /// Run every item in the batch, pacing requests and recording per-item
    /// failures. Refused with [`PipelineError::Busy`] while another bulk
    /// import is running.
    pub async fn run_bulk(&self, text: &str) -> Result<BulkReport> {
        if matches!(*self.bulk.borrow(), BulkState::Running { .. }) {
            return Err(PipelineError::Busy);
        }

        let items = split_batch(text);
        let total = items.len();
        self.bulk.send_replace(BulkState::Running {
            total,
            completed: 0,
            failures: 0,
        });

        let mut created = Vec::new();
        let mut failures = Vec::new();

        for (index, url) in items.iter().enumerate() {
            match self.process_link(url).await {
                Ok(record) => created.push(record),
                Err(e) => failures.push(format!("{url}: {e}")),
            }

            self.bulk.send_replace(BulkState::Running {
                total,
                completed: index + 1,
                failures: failures.len(),
            });

            if index + 1 < total && !self.pacing.is_zero() {
                tokio::time::sleep(self.pacing).await;
            }
        }

        let report = BulkReport {
            created: created.len(),
            failures,
        };

        self.collection.prepend_batch(created).await;
        self.bulk.send_replace(BulkState::Completed {
            created: report.created,
            failures: report.failures.len(),
        });

        Ok(report)
    }

    /// Delete from the store first, then drop from the cache.
    pub async fn delete(&self, id: &str) -> Result<()> {
        self.store.delete(id).await?;
        self.collection.remove(id).await;
        Ok(())
    }

    pub async fn stats(&self) -> Option<CollectionStats> {
        let snapshot = self.collection.snapshot().await;
        CollectionStats::compute(&snapshot, Utc::now())
    }

    pub async fn export(&self) -> ExportDocument {
        let snapshot = self.collection.snapshot().await;
        ExportDocument::from_records(&snapshot, Utc::now())
    }
}

/// One candidate link per line; blank lines are dropped.
pub fn split_batch(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_batch_trims_and_drops_blanks() {
        let items =
            split_batch("https://youtu.be/aaaaaaaaaaa\n\n  https://youtu.be/bbbbbbbbbbb  \r\n\t\n");
        assert_eq!(
            items,
            vec![
                "https://youtu.be/aaaaaaaaaaa",
                "https://youtu.be/bbbbbbbbbbb"
            ]
        );
    }

    #[test]
    fn digest_quotes_first_failures_then_counts() {
        let report = BulkReport {
            created: 0,
            failures: (1..=5).map(|i| format!("url{i}: bad")).collect(),
        };
        assert_eq!(
            report.digest().unwrap(),
            "url1: bad\nurl2: bad\nurl3: bad\n...and 2 more"
        );

        let small = BulkReport {
            created: 2,
            failures: vec!["url1: bad".to_string()],
        };
        assert_eq!(small.digest().unwrap(), "url1: bad");

        let clean = BulkReport {
            created: 3,
            failures: Vec::new(),
        };
        assert!(clean.digest().is_none());
    }
}
