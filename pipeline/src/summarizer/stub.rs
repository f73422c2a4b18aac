//! Canned-response summarizer for tests and offline smoke runs.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use super::{Summarizer, SummarizerError};

pub const DEFAULT_STUB_RESPONSE: &str = "This is a mock summary for testing purposes.";

/// Returns the first configured response whose key occurs in the content,
/// falling back to `default_response`. Keys are checked in insertion order.
#[derive(Debug)]
pub struct StubSummarizer {
    responses: Vec<(String, String)>,
    failures: Vec<String>,
    default_response: String,
    available: bool,
    calls: AtomicUsize,
}

impl Default for StubSummarizer {
    fn default() -> Self {
        Self::new()
    }
}

impl StubSummarizer {
    pub fn new() -> Self {
        Self {
            responses: Vec::new(),
            failures: Vec::new(),
            default_response: DEFAULT_STUB_RESPONSE.to_string(),
            available: true,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_response(mut self, needle: impl Into<String>, response: impl Into<String>) -> Self {
        self.responses.push((needle.into(), response.into()));
        self
    }

    pub fn with_default_response(mut self, response: impl Into<String>) -> Self {
        self.default_response = response.into();
        self
    }

    /// Content containing `needle` fails with [`SummarizerError::Unavailable`].
    pub fn with_failure(mut self, needle: impl Into<String>) -> Self {
        self.failures.push(needle.into());
        self
    }

    pub fn with_availability(mut self, available: bool) -> Self {
        self.available = available;
        self
    }

    /// Number of `summarize` calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Summarizer for StubSummarizer {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn summarize(&self, content: &str, _prompt: &str) -> Result<String, SummarizerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failures.iter().any(|f| content.contains(f.as_str())) {
            return Err(SummarizerError::Unavailable("stub failure".to_string()));
        }
        let reply = self
            .responses
            .iter()
            .find(|(needle, _)| content.contains(needle.as_str()))
            .map(|(_, response)| response.clone())
            .unwrap_or_else(|| self.default_response.clone());
        Ok(reply)
    }

    async fn is_available(&self, _model: &str) -> Result<bool, SummarizerError> {
        Ok(self.available)
    }
}
