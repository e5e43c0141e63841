// src/store/appwrite.rs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use crate::error::{PipelineError, Result};
use crate::model::{NewVideoRecord, VideoRecord};
use crate::store::Store;

/// Store backed by an Appwrite database collection over its REST API.
pub struct AppwriteStore {
    client: Client,
    endpoint: String,
    project_id: String,
    api_key: String,
    database_id: String,
    collection_id: String,
}

impl AppwriteStore {
    /// Build from `APPWRITE_ENDPOINT`, `APPWRITE_PROJECT_ID`,
    /// `APPWRITE_API_KEY`, `APPWRITE_DATABASE_ID` and
    /// `APPWRITE_COLLECTION_ID`.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            client: Client::builder()
                .user_agent(crate::providers::USER_AGENT)
                .build()
                .map_err(store_err)?,
            endpoint: require_env("APPWRITE_ENDPOINT")?,
            project_id: require_env("APPWRITE_PROJECT_ID")?,
            api_key: require_env("APPWRITE_API_KEY")?,
            database_id: require_env("APPWRITE_DATABASE_ID")?,
            collection_id: require_env("APPWRITE_COLLECTION_ID")?,
        })
    }

    fn documents_url(&self) -> String {
        format!(
            "{}/databases/{}/collections/{}/documents",
            self.endpoint.trim_end_matches('/'),
            self.database_id,
            self.collection_id
        )
    }

    fn request(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder
            .header("X-Appwrite-Project", &self.project_id)
            .header("X-Appwrite-Key", &self.api_key)
    }

    async fn list_documents(&self, queries: Vec<String>) -> Result<Vec<Document>> {
        let query: Vec<(&str, String)> =
            queries.into_iter().map(|q| ("queries[]", q)).collect();
        let response = self
            .request(self.client.get(self.documents_url()))
            .query(&query)
            .send()
            .await
            .map_err(store_err)?;
        let response = check_status(response).await?;

        let payload: DocumentList = response.json().await.map_err(store_err)?;
        Ok(payload.documents)
    }
}

fn require_env(name: &str) -> Result<String> {
    std::env::var(name).map_err(|_| PipelineError::Config(format!("{name} not set")))
}

/// Transport and decode failures against the store surface as store errors,
/// not generic HTTP errors.
fn store_err(e: reqwest::Error) -> PipelineError {
    PipelineError::Store(e.to_string())
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    Err(PipelineError::Store(format!(
        "Appwrite returned {status}: {body}"
    )))
}

fn order_desc(attribute: &str) -> String {
    json!({"method": "orderDesc", "attribute": attribute}).to_string()
}

fn limit(count: usize) -> String {
    json!({"method": "limit", "values": [count]}).to_string()
}

fn equal(attribute: &str, value: &str) -> String {
    json!({"method": "equal", "attribute": attribute, "values": [value]}).to_string()
}

#[derive(Debug, Deserialize)]
struct DocumentList {
    #[serde(default)]
    documents: Vec<Document>,
}

#[derive(Debug, Deserialize)]
struct Document {
    #[serde(rename = "$id")]
    id: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    video_id: String,
    timestamp: DateTime<Utc>,
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    thumbnail: String,
    #[serde(default)]
    channel_title: String,
    #[serde(default)]
    published_at: String,
    #[serde(default)]
    main_category: String,
    #[serde(default)]
    sub_categories: Vec<String>,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    confidence: f64,
    #[serde(default)]
    view_count: u64,
}

impl From<Document> for VideoRecord {
    fn from(doc: Document) -> Self {
        VideoRecord {
            id: doc.id,
            url: doc.url,
            video_id: doc.video_id,
            timestamp: doc.timestamp,
            title: doc.title,
            description: doc.description,
            thumbnail: doc.thumbnail,
            channel_title: doc.channel_title,
            published_at: doc.published_at,
            main_category: doc.main_category,
            sub_categories: doc.sub_categories,
            tags: doc.tags,
            confidence: doc.confidence,
            view_count: doc.view_count,
        }
    }
}

#[async_trait]
impl Store for AppwriteStore {
    async fn list(&self, limit_count: usize) -> Result<Vec<VideoRecord>> {
        let documents = self
            .list_documents(vec![order_desc("timestamp"), limit(limit_count)])
            .await?;
        Ok(documents.into_iter().map(VideoRecord::from).collect())
    }

    async fn create(&self, record: NewVideoRecord) -> Result<VideoRecord> {
        let body = json!({
            "documentId": "unique()",
            "data": record,
        });
        let response = self
            .request(self.client.post(self.documents_url()))
            .json(&body)
            .send()
            .await
            .map_err(store_err)?;
        let response = check_status(response).await?;

        let document: Document = response.json().await.map_err(store_err)?;
        Ok(document.into())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let url = format!("{}/{}", self.documents_url(), id);
        let response = self
            .request(self.client.delete(url))
            .send()
            .await
            .map_err(store_err)?;
        check_status(response).await?;
        Ok(())
    }

    async fn find_by_video_id(&self, video_id: &str) -> Result<Option<VideoRecord>> {
        let documents = self
            .list_documents(vec![equal("video_id", video_id), limit(1)])
            .await?;
        Ok(documents.into_iter().next().map(VideoRecord::from))
    }
}
