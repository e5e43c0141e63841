use std::time::Duration;

use async_trait::async_trait;
use vidmark_core::{
    BulkState, Classification, Classifier, MemoryStore, MetadataProvider, Pipeline, PipelineError,
    Result, VideoMetadata,
};

struct FakeMetadata;

#[async_trait]
impl MetadataProvider for FakeMetadata {
    async fn fetch_metadata(&self, video_id: &str) -> Result<VideoMetadata> {
        Ok(VideoMetadata {
            title: format!("video {video_id}"),
            description: "a description".to_string(),
            thumbnail: "https://img/high.jpg".to_string(),
            channel_title: "a channel".to_string(),
            published_at: "2024-05-01T12:00:00Z".to_string(),
            view_count: 100,
        })
    }
}

struct FailingMetadata;

#[async_trait]
impl MetadataProvider for FailingMetadata {
    async fn fetch_metadata(&self, video_id: &str) -> Result<VideoMetadata> {
        Err(PipelineError::MetadataUnavailable(format!(
            "video not found: {video_id}"
        )))
    }
}

/// Holds each fetch long enough for a concurrent caller to observe the
/// running state.
struct SlowMetadata;

#[async_trait]
impl MetadataProvider for SlowMetadata {
    async fn fetch_metadata(&self, video_id: &str) -> Result<VideoMetadata> {
        tokio::time::sleep(Duration::from_millis(20)).await;
        FakeMetadata.fetch_metadata(video_id).await
    }
}

struct FakeClassifier;

#[async_trait]
impl Classifier for FakeClassifier {
    async fn classify(&self, _metadata: &VideoMetadata) -> Result<Classification> {
        Ok(Classification {
            main_category: "Music".to_string(),
            sub_categories: vec!["Pop".to_string()],
            tags: vec!["music".to_string(), "pop".to_string()],
            confidence: 0.9,
        })
    }
}

struct FailingClassifier;

#[async_trait]
impl Classifier for FailingClassifier {
    async fn classify(&self, _metadata: &VideoMetadata) -> Result<Classification> {
        Err(PipelineError::Classification(
            "model reply is not JSON".to_string(),
        ))
    }
}

fn pipeline<M: MetadataProvider, C: Classifier>(
    metadata: M,
    classifier: C,
) -> Pipeline<M, C, MemoryStore> {
    Pipeline::new(metadata, classifier, MemoryStore::new()).with_pacing(Duration::ZERO)
}

#[tokio::test]
async fn ingest_persists_and_caches_the_record() {
    let pipeline = pipeline(FakeMetadata, FakeClassifier);

    let record = pipeline
        .ingest("https://youtu.be/dQw4w9WgXcQ")
        .await
        .unwrap();

    assert_eq!(record.video_id, "dQw4w9WgXcQ");
    assert_eq!(record.title, "video dQw4w9WgXcQ");
    assert_eq!(record.main_category, "Music");
    assert_eq!(record.confidence, 0.9);
    assert!(!record.id.is_empty());

    let cached = pipeline.collection().snapshot().await;
    assert_eq!(cached.len(), 1);
    assert_eq!(cached[0].id, record.id);
}

#[tokio::test]
async fn duplicate_links_are_rejected() {
    let pipeline = pipeline(FakeMetadata, FakeClassifier);

    pipeline
        .ingest("https://youtu.be/dQw4w9WgXcQ")
        .await
        .unwrap();
    let second = pipeline
        .ingest("https://www.youtube.com/watch?v=dQw4w9WgXcQ")
        .await;

    assert!(matches!(second, Err(PipelineError::DuplicateVideo(_))));
    assert_eq!(pipeline.collection().len().await, 1);
}

#[tokio::test]
async fn classifier_failure_degrades_to_fallback() {
    let pipeline = pipeline(FakeMetadata, FailingClassifier);

    let record = pipeline
        .ingest("https://youtu.be/dQw4w9WgXcQ")
        .await
        .unwrap();

    assert_eq!(record.main_category, "Other");
    assert_eq!(record.tags, vec!["video", "content"]);
    assert_eq!(record.confidence, 0.5);
}

#[tokio::test]
async fn metadata_failure_aborts_the_item() {
    let pipeline = pipeline(FailingMetadata, FakeClassifier);

    let result = pipeline.ingest("https://youtu.be/dQw4w9WgXcQ").await;
    assert!(matches!(result, Err(PipelineError::MetadataUnavailable(_))));
    assert!(pipeline.collection().is_empty().await);
}

#[tokio::test]
async fn bulk_records_failures_without_aborting() {
    let pipeline = pipeline(FakeMetadata, FakeClassifier);
    pipeline
        .ingest("https://youtu.be/aaaaaaaaaaa")
        .await
        .unwrap();

    let text = "https://youtu.be/bbbbbbbbbbb\n\
                https://youtu.be/aaaaaaaaaaa\n\
                not a url\n\
                https://youtu.be/ccccccccccc\n";
    let report = pipeline.run_bulk(text).await.unwrap();

    assert_eq!(report.created, 2);
    assert_eq!(report.failures.len(), 2);
    assert!(report.failures[0].starts_with("https://youtu.be/aaaaaaaaaaa: "));
    assert!(report.failures[1].starts_with("not a url: "));

    assert_eq!(
        *pipeline.subscribe().borrow(),
        BulkState::Completed {
            created: 2,
            failures: 2
        }
    );

    // Cache and store agree after the batch
    assert_eq!(pipeline.collection().len().await, 3);
    let cached = pipeline.collection().snapshot().await;
    assert_eq!(cached[0].video_id, "bbbbbbbbbbb");
    assert_eq!(cached[1].video_id, "ccccccccccc");
    assert_eq!(cached[2].video_id, "aaaaaaaaaaa");
}

#[tokio::test]
async fn bulk_publishes_progress() {
    let pipeline = pipeline(FakeMetadata, FakeClassifier);
    let mut progress = pipeline.subscribe();

    let text = "https://youtu.be/aaaaaaaaaaa\nhttps://youtu.be/bbbbbbbbbbb\n";
    pipeline.run_bulk(text).await.unwrap();

    // The receiver observes the latest state after completion
    assert_eq!(
        *progress.borrow_and_update(),
        BulkState::Completed {
            created: 2,
            failures: 0
        }
    );
}

#[tokio::test]
async fn concurrent_bulk_imports_are_refused() {
    let pipeline = pipeline(SlowMetadata, FakeClassifier);
    let mut progress = pipeline.subscribe();

    let first = pipeline.run_bulk("https://youtu.be/aaaaaaaaaaa\nhttps://youtu.be/bbbbbbbbbbb");
    let second = async {
        progress
            .wait_for(|state| matches!(state, BulkState::Running { .. }))
            .await
            .unwrap();
        pipeline.run_bulk("https://youtu.be/ccccccccccc").await
    };

    let (first, second) = tokio::join!(first, second);
    assert_eq!(first.unwrap().created, 2);
    assert!(matches!(second, Err(PipelineError::Busy)));

    // The refused run publishes nothing; the channel holds only the first
    // run's final state
    assert_eq!(
        *pipeline.subscribe().borrow(),
        BulkState::Completed {
            created: 2,
            failures: 0
        }
    );
}

#[tokio::test]
async fn load_refreshes_the_cache_from_the_store() {
    let store = std::sync::Arc::new(MemoryStore::new());

    let writer = Pipeline::new(FakeMetadata, FakeClassifier, store.clone());
    writer
        .ingest("https://youtu.be/aaaaaaaaaaa")
        .await
        .unwrap();

    // A second pipeline over the same store starts empty until loaded
    let reader = Pipeline::new(FakeMetadata, FakeClassifier, store);
    assert!(reader.collection().is_empty().await);
    reader.load().await.unwrap();
    assert_eq!(reader.collection().len().await, 1);
    assert_eq!(reader.collection().snapshot().await[0].video_id, "aaaaaaaaaaa");
}

#[tokio::test]
async fn load_limit_widens_the_cache_window() {
    let store = std::sync::Arc::new(MemoryStore::new());

    let writer = Pipeline::new(FakeMetadata, FakeClassifier, store.clone());
    for id in ["aaaaaaaaaaa", "bbbbbbbbbbb", "ccccccccccc"] {
        writer
            .ingest(&format!("https://youtu.be/{id}"))
            .await
            .unwrap();
    }

    let reader = Pipeline::new(FakeMetadata, FakeClassifier, store);
    reader.load_limit(2).await.unwrap();
    assert_eq!(reader.collection().len().await, 2);

    // A wider reload picks up records beyond the earlier window
    reader.load_limit(10).await.unwrap();
    assert_eq!(reader.collection().len().await, 3);
}

#[tokio::test]
async fn delete_removes_from_store_and_cache() {
    let pipeline = pipeline(FakeMetadata, FakeClassifier);
    let record = pipeline
        .ingest("https://youtu.be/dQw4w9WgXcQ")
        .await
        .unwrap();

    pipeline.delete(&record.id).await.unwrap();
    assert!(pipeline.collection().is_empty().await);

    // The video can be added again once deleted
    pipeline
        .ingest("https://youtu.be/dQw4w9WgXcQ")
        .await
        .unwrap();
}

#[tokio::test]
async fn stats_and_export_reflect_the_cache() {
    let pipeline = pipeline(FakeMetadata, FakeClassifier);
    assert!(pipeline.stats().await.is_none());

    pipeline
        .ingest("https://youtu.be/aaaaaaaaaaa")
        .await
        .unwrap();
    pipeline
        .ingest("https://youtu.be/bbbbbbbbbbb")
        .await
        .unwrap();

    let stats = pipeline.stats().await.unwrap();
    assert_eq!(stats.total_videos, 2);
    assert_eq!(stats.average_confidence, 90.0);
    assert_eq!(stats.recent_additions, 2);
    assert_eq!(stats.top_categories[0].category, "Music");

    let export = pipeline.export().await;
    assert_eq!(export.total_videos, 2);
    assert_eq!(export.videos[0].channel, "a channel");
}
