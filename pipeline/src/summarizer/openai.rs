//! OpenAI-compatible chat completions backend.
//!
//! Works against OpenAI itself and the many servers that speak the same API
//! (vLLM, llama.cpp server, Azure OpenAI behind a compatible base URL).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{compose, Summarizer, SummarizerError};

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com";
pub const ENV_OPENAI_API_KEY: &str = "OPENAI_API_KEY";
pub const ENV_OPENAI_BASE_URL: &str = "OPENAI_BASE_URL";

const TEMPERATURE: f32 = 0.3;

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<Message>,
    temperature: f32,
}

#[derive(Debug, Serialize, Deserialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct ModelList {
    #[serde(default)]
    data: Vec<ModelEntry>,
}

#[derive(Debug, Deserialize)]
struct ModelEntry {
    id: String,
}

pub struct OpenAiSummarizer {
    api_key: String,
    base_url: String,
    model: String,
    client: reqwest::Client,
}

impl OpenAiSummarizer {
    /// An empty `api_key` is treated as missing.
    pub fn new(
        api_key: &str,
        base_url: Option<&str>,
        model: impl Into<String>,
    ) -> Result<Self, SummarizerError> {
        if api_key.trim().is_empty() {
            return Err(SummarizerError::MissingApiKey(ENV_OPENAI_API_KEY.to_string()));
        }
        let base_url = base_url
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .unwrap_or(DEFAULT_OPENAI_BASE_URL)
            .trim_end_matches('/')
            .to_string();
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| SummarizerError::RequestFailed(format!("failed to create HTTP client: {e}")))?;
        Ok(Self {
            api_key: api_key.to_string(),
            base_url,
            model: model.into(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl Summarizer for OpenAiSummarizer {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn summarize(&self, content: &str, prompt: &str) -> Result<String, SummarizerError> {
        let request = CompletionRequest {
            model: &self.model,
            messages: vec![Message {
                role: "user".to_string(),
                content: compose(prompt, content),
            }],
            temperature: TEMPERATURE,
        };

        let url = format!("{}/v1/chat/completions", self.base_url);
        debug!(%url, model = %self.model, "chat completion request");
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SummarizerError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let completion: CompletionResponse = response.json().await?;
        if let Some(error) = completion.error {
            return Err(SummarizerError::Rejected(error.message));
        }
        completion
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| SummarizerError::Rejected("API returned no choices".to_string()))
    }

    async fn is_available(&self, model: &str) -> Result<bool, SummarizerError> {
        let url = format!("{}/v1/models", self.base_url);
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.api_key)
            .send()
            .await?;

        if !response.status().is_success() {
            return Ok(false);
        }

        let models: ModelList = response.json().await?;
        Ok(models.data.iter().any(|m| m.id == model))
    }
}
