//! Ollama backend (`/api/chat`, `/api/tags`).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{compose, Summarizer, SummarizerError};

/// Default Ollama address when `OLLAMA_HOST` is unset.
pub const DEFAULT_OLLAMA_HOST: &str = "http://127.0.0.1:11434";

/// Fixed sampling seed so repeated runs produce comparable text.
const SEED: u64 = 42;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    stream: bool,
    options: ChatOptions,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct ChatOptions {
    seed: u64,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: Option<ChatMessage>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TagList {
    #[serde(default)]
    models: Vec<TagEntry>,
}

#[derive(Debug, Deserialize)]
struct TagEntry {
    name: String,
}

/// Summarizer backed by a local Ollama server.
pub struct OllamaSummarizer {
    host: String,
    model: String,
    client: reqwest::Client,
}

impl OllamaSummarizer {
    /// `host` may be a full URL or a bare `host:port` as `OLLAMA_HOST` allows.
    pub fn new(host: &str, model: impl Into<String>) -> Result<Self, SummarizerError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| SummarizerError::RequestFailed(format!("failed to create HTTP client: {e}")))?;
        Ok(Self {
            host: normalize_host(host),
            model: model.into(),
            client,
        })
    }
}

fn normalize_host(host: &str) -> String {
    let host = host.trim().trim_end_matches('/');
    if host.is_empty() {
        return DEFAULT_OLLAMA_HOST.to_string();
    }
    if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("http://{host}")
    }
}

#[async_trait]
impl Summarizer for OllamaSummarizer {
    fn name(&self) -> &'static str {
        "ollama"
    }

    async fn summarize(&self, content: &str, prompt: &str) -> Result<String, SummarizerError> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: compose(prompt, content),
            }],
            stream: false,
            options: ChatOptions { seed: SEED },
        };

        let url = format!("{}/api/chat", self.host);
        debug!(%url, model = %self.model, "ollama chat request");
        let response = self.client.post(&url).json(&request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SummarizerError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let chat: ChatResponse = response.json().await?;
        if let Some(error) = chat.error {
            return Err(SummarizerError::Rejected(error));
        }
        chat.message
            .map(|m| m.content)
            .ok_or_else(|| SummarizerError::ParseError("response has no message".to_string()))
    }

    async fn is_available(&self, model: &str) -> Result<bool, SummarizerError> {
        let url = format!("{}/api/tags", self.host);
        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SummarizerError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let tags: TagList = response.json().await?;
        Ok(tags.models.iter().any(|m| m.name == model))
    }
}
