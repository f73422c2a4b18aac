//! Backend selection and environment-driven provider settings.
//!
//! ## Precedence (highest to lowest)
//!
//! 1. Command-line flags
//! 2. Environment variables (`OLLAMA_HOST`, `OPENAI_API_KEY`, `OPENAI_BASE_URL`,
//!    `SUMMARIZE_YAML_MODEL`)
//! 3. Built-in defaults
//!
//! | Provider | Endpoint default             | Needs                 |
//! |----------|------------------------------|-----------------------|
//! | ollama   | `http://127.0.0.1:11434`     | nothing               |
//! | openai   | `https://api.openai.com`     | `OPENAI_API_KEY`      |
//! | mock     | none                         | nothing               |

use std::env;
use std::fmt;
use std::sync::Arc;

use clap::ValueEnum;

use pipeline::config::DEFAULT_MODEL;
use pipeline::summarizer::openai::{ENV_OPENAI_API_KEY, ENV_OPENAI_BASE_URL};
use pipeline::summarizer::{OllamaSummarizer, OpenAiSummarizer, StubSummarizer};
use pipeline::{Summarizer, SummarizerError};

pub const ENV_OLLAMA_HOST: &str = "OLLAMA_HOST";
pub const ENV_MODEL: &str = "SUMMARIZE_YAML_MODEL";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ProviderKind {
    #[default]
    Ollama,
    #[value(name = "openai")]
    OpenAi,
    Mock,
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ollama => write!(f, "ollama"),
            Self::OpenAi => write!(f, "openai"),
            Self::Mock => write!(f, "mock"),
        }
    }
}

/// Provider settings read from the process environment. Empty values count
/// as unset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderEnv {
    pub ollama_host: Option<String>,
    pub openai_api_key: Option<String>,
    pub openai_base_url: Option<String>,
    pub model: Option<String>,
}

impl ProviderEnv {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup so callers never have to mutate
    /// the real environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Self {
            ollama_host: get(ENV_OLLAMA_HOST),
            openai_api_key: get(ENV_OPENAI_API_KEY),
            openai_base_url: get(ENV_OPENAI_BASE_URL),
            model: get(ENV_MODEL),
        }
    }

    /// `cli` wins, then `SUMMARIZE_YAML_MODEL`, then the built-in default.
    pub fn resolve_model(&self, cli: Option<&str>) -> String {
        cli.filter(|m| !m.trim().is_empty())
            .map(str::to_string)
            .or_else(|| self.model.clone())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string())
    }
}

/// Construct the backend for `kind`. Fails only when a required setting is
/// missing or the HTTP client cannot be built.
pub fn build_summarizer(
    kind: ProviderKind,
    model: &str,
    env: &ProviderEnv,
) -> Result<Arc<dyn Summarizer>, SummarizerError> {
    let summarizer: Arc<dyn Summarizer> = match kind {
        ProviderKind::Ollama => Arc::new(OllamaSummarizer::new(
            env.ollama_host.as_deref().unwrap_or_default(),
            model,
        )?),
        ProviderKind::OpenAi => Arc::new(OpenAiSummarizer::new(
            env.openai_api_key.as_deref().unwrap_or_default(),
            env.openai_base_url.as_deref(),
            model,
        )?),
        ProviderKind::Mock => Arc::new(StubSummarizer::new()),
    };
    Ok(summarizer)
}
