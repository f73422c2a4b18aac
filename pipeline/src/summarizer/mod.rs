//! Summarizer capability: the language-model backend behind the pipeline.
//!
//! The pipeline only ever talks to [`Summarizer`]; concrete backends are
//! chosen at startup by the caller:
//!
//! - [`OllamaSummarizer`]: local Ollama server (`/api/chat`, `/api/tags`)
//! - [`OpenAiSummarizer`]: any OpenAI-compatible chat completions endpoint
//! - [`StubSummarizer`]: canned responses for tests and offline runs

use async_trait::async_trait;
use thiserror::Error;

pub mod ollama;
pub mod openai;
pub mod stub;

pub use ollama::OllamaSummarizer;
pub use openai::OpenAiSummarizer;
pub use stub::StubSummarizer;

/// Instruction prepended to the raw file content for every request.
pub const SUMMARIZE_PROMPT: &str = "Summarize the purpose of this YAML file in no more than two short, high-level sentences. Do not include any lists, breakdowns, explanations, advice, notes, or formatting. Do not use markdown. No newlines. No code sections. Only output a single, concise summary of the file's purpose, and nothing else. Stop after two sentences. If you cannot summarize in two sentences, summarize in one: \n";

/// Errors from a summarizer backend.
#[derive(Debug, Error)]
pub enum SummarizerError {
    #[error("request failed: {0}")]
    RequestFailed(String),

    #[error("backend returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("response parse error: {0}")]
    ParseError(String),

    #[error("{0} environment variable is required for this provider")]
    MissingApiKey(String),

    #[error("model rejected the request: {0}")]
    Rejected(String),

    #[error("backend unavailable: {0}")]
    Unavailable(String),
}

impl From<reqwest::Error> for SummarizerError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::ParseError(err.to_string())
        } else {
            Self::RequestFailed(err.to_string())
        }
    }
}

/// A backend that turns file content plus a prompt into prose.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Short provider name for logs and error messages.
    fn name(&self) -> &'static str;

    /// Send `prompt + content` to the model and return its raw reply.
    async fn summarize(&self, content: &str, prompt: &str) -> Result<String, SummarizerError>;

    /// Whether `model` is served by this backend.
    async fn is_available(&self, model: &str) -> Result<bool, SummarizerError>;
}

/// Prefix `prompt` onto `content` the way every backend sends it.
pub(crate) fn compose(prompt: &str, content: &str) -> String {
    let mut message = String::with_capacity(prompt.len() + content.len());
    message.push_str(prompt);
    message.push_str(content);
    message
}
