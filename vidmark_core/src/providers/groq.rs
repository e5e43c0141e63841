// src/providers/groq.rs

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::{PipelineError, Result};
use crate::model::{Classification, VideoMetadata, CATEGORIES};
use crate::Classifier;

const CHAT_COMPLETIONS_ENDPOINT: &str = "https://api.groq.com/openai/v1/chat/completions";
const DEFAULT_MODEL: &str = "openai/gpt-oss-20b";
const TEMPERATURE: f64 = 0.3;

/// Only the leading slice of the description goes into the prompt.
const DESCRIPTION_PROMPT_LIMIT: usize = 500;

const SYSTEM_PROMPT: &str = "You are an AI assistant that analyzes YouTube videos and provides \
    accurate categorization with relevant tags. Always respond with valid JSON. Be precise and \
    consistent with categories.";

/// Classifier backed by the Groq chat-completions API in JSON mode.
pub struct GroqClassifier {
    client: Client,
    api_key: String,
    model: String,
}

impl GroqClassifier {
    /// Build from explicit values, falling back to `GROQ_API_KEY` and
    /// `GROQ_MODEL`.
    pub fn new(api_key: Option<String>, model: Option<String>) -> Result<Self> {
        let api_key = api_key
            .or_else(|| std::env::var("GROQ_API_KEY").ok())
            .ok_or_else(|| PipelineError::Config("GROQ_API_KEY not set".to_string()))?;
        let model = model
            .or_else(|| std::env::var("GROQ_MODEL").ok())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        Ok(Self {
            client: Client::builder()
                .user_agent(crate::providers::USER_AGENT)
                .build()?,
            api_key,
            model,
        })
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Debug, Deserialize)]
struct Message {
    #[serde(default)]
    content: String,
}

/// Truncate on a char boundary; byte indexing would panic mid-codepoint.
fn truncate_chars(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

fn build_prompt(metadata: &VideoMetadata) -> String {
    let description = if metadata.description.is_empty() {
        "No description"
    } else {
        truncate_chars(&metadata.description, DESCRIPTION_PROMPT_LIMIT)
    };

    format!(
        "Analyze this YouTube video content and categorize it:\n\n\
         Title: {title}\n\
         Description: {description}\n\
         Channel: {channel}\n\
         View Count: {views}\n\n\
         Provide a JSON response with the following structure:\n\
         {{\n\
           \"mainCategory\": \"single most relevant category from: {categories}\",\n\
           \"subCategories\": [\"up to 3 related subcategories\"],\n\
           \"tags\": [\"up to 6 relevant keywords/tags\"],\n\
           \"confidence\": 0.95\n\
         }}",
        title = metadata.title,
        description = description,
        channel = metadata.channel_title,
        views = metadata.view_count,
        categories = CATEGORIES.join(", "),
    )
}

/// Parse the model's JSON-mode reply into a classification, rejecting
/// structurally invalid replies so the pipeline can fall back.
fn parse_classification(content: &str) -> Result<Classification> {
    let value: Value = serde_json::from_str(content)
        .map_err(|e| PipelineError::Classification(format!("model reply is not JSON: {e}")))?;

    let main_category = value
        .get("mainCategory")
        .and_then(Value::as_str)
        .ok_or_else(|| {
            PipelineError::Classification("model reply is missing mainCategory".to_string())
        })?
        .to_string();

    let tags = value
        .get("tags")
        .and_then(Value::as_array)
        .ok_or_else(|| {
            PipelineError::Classification("model reply is missing a tags array".to_string())
        })?
        .iter()
        .filter_map(Value::as_str)
        .map(str::to_string)
        .collect();

    let sub_categories = value
        .get("subCategories")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    let confidence = value
        .get("confidence")
        .and_then(Value::as_f64)
        .unwrap_or(0.5);

    Ok(Classification {
        main_category,
        sub_categories,
        tags,
        confidence,
    })
}

#[async_trait]
impl Classifier for GroqClassifier {
    async fn classify(&self, metadata: &VideoMetadata) -> Result<Classification> {
        let body = json!({
            "messages": [
                {"role": "system", "content": SYSTEM_PROMPT},
                {"role": "user", "content": build_prompt(metadata)},
            ],
            "model": self.model,
            "temperature": TEMPERATURE,
            "response_format": {"type": "json_object"},
        });

        let response = self
            .client
            .post(CHAT_COMPLETIONS_ENDPOINT)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(PipelineError::Classification(format!(
                "chat completions returned {status}"
            )));
        }

        let payload: ChatResponse = response.json().await?;
        let content = payload
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| {
                PipelineError::Classification("chat completions returned no choices".to_string())
            })?;

        parse_classification(&content)
    }
}
