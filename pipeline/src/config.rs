//! Explicit run configuration.
//!
//! Everything that shapes a run lives in [`PipelineConfig`] and is passed to
//! [`crate::run`] by reference, so independent runs (and tests) never
//! share process-wide switches.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::PipelineError;

/// Model requested when nothing else is configured.
pub const DEFAULT_MODEL: &str = "llama3.2:latest";
/// Report file name, resolved relative to the scan root.
pub const DEFAULT_REPORT_FILE: &str = "yaml_details.md";
/// Side-cache directory name, resolved relative to the working directory.
pub const DEFAULT_CACHE_DIR: &str = ".yaml_summary_cache";
/// Sentence budget applied to every summary.
pub const DEFAULT_MAX_SENTENCES: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Directory to scan.
    pub root: PathBuf,
    /// Report file name or path, joined onto `root`.
    pub output_file: PathBuf,
    /// Ignore the existing report and summarize every file again.
    pub regenerate: bool,
    /// Descend into directories whose name starts with `.`.
    pub include_hidden: bool,
    /// Number of concurrent summarizer workers (>= 1).
    pub concurrency: usize,
    /// Where to write one plain-text file per new summary, if anywhere.
    pub side_cache: Option<PathBuf>,
    /// Model name checked for availability before the batch starts.
    pub model: String,
    /// Summaries are cut to at most this many sentences.
    pub max_sentences: usize,
}

impl PipelineConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            output_file: PathBuf::from(DEFAULT_REPORT_FILE),
            regenerate: false,
            include_hidden: false,
            concurrency: 1,
            side_cache: None,
            model: DEFAULT_MODEL.to_string(),
            max_sentences: DEFAULT_MAX_SENTENCES,
        }
    }

    pub fn with_output_file(mut self, output_file: impl Into<PathBuf>) -> Self {
        self.output_file = output_file.into();
        self
    }

    pub fn with_regenerate(mut self, regenerate: bool) -> Self {
        self.regenerate = regenerate;
        self
    }

    pub fn with_include_hidden(mut self, include_hidden: bool) -> Self {
        self.include_hidden = include_hidden;
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    pub fn with_side_cache(mut self, dir: Option<PathBuf>) -> Self {
        self.side_cache = dir;
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_max_sentences(mut self, max_sentences: usize) -> Self {
        self.max_sentences = max_sentences;
        self
    }

    /// Full path of the report this run reads from and writes to.
    pub fn report_path(&self) -> PathBuf {
        self.root.join(&self.output_file)
    }

    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.concurrency == 0 {
            return Err(PipelineError::InvalidConfig(
                "concurrency must be at least 1".to_string(),
            ));
        }
        if self.max_sentences == 0 {
            return Err(PipelineError::InvalidConfig(
                "sentence budget must be at least 1".to_string(),
            ));
        }
        if self.model.trim().is_empty() {
            return Err(PipelineError::InvalidConfig("model name is empty".to_string()));
        }
        if self.output_file.as_os_str().is_empty() {
            return Err(PipelineError::InvalidConfig("output file name is empty".to_string()));
        }
        Ok(())
    }
}
