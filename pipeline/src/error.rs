//! Pipeline error taxonomy.
//!
//! | Kind            | Fatal | Effect                                        |
//! |-----------------|-------|-----------------------------------------------|
//! | Discovery       | yes   | run aborts before any report is written       |
//! | ModelUnavailable| yes   | run aborts before any file is summarized      |
//! | Backend         | yes   | availability check itself failed              |
//! | WriteReport     | yes   | report could not be created or written        |
//! | InvalidConfig   | yes   | configuration rejected up front               |
//! | FileError       | no    | logged by the executor; file omitted          |
//!
//! A malformed or missing prior report never produces an error at all; the
//! index degrades to empty.

use std::path::PathBuf;

use thiserror::Error;

use crate::summarizer::SummarizerError;

/// Run-level errors returned from [`crate::run`] and [`crate::plan`].
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Walking the scan root failed.
    #[error("failed to enumerate files under {root}: {source}")]
    Discovery {
        root: PathBuf,
        #[source]
        source: ignore::Error,
    },

    /// The configured model is not served by the backend.
    #[error("model {model} is not available from the {provider} provider; make sure it is downloaded and served")]
    ModelUnavailable { model: String, provider: String },

    /// The availability check could not reach the backend.
    #[error("failed to list models: {0}")]
    Backend(#[from] SummarizerError),

    /// The report file could not be created or written.
    #[error("failed to write report {path}: {source}")]
    WriteReport {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration rejected before any work started.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl PipelineError {
    /// Whether the previous report is guaranteed to be intact. False once
    /// writing may have started.
    pub fn report_untouched(&self) -> bool {
        !matches!(self, Self::WriteReport { .. })
    }
}

/// Per-file failure. The executor logs these and leaves the file out of the
/// report; they never abort the batch.
#[derive(Debug, Error)]
pub enum FileError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("summarizer error for {path}: {source}")]
    Summarize {
        path: String,
        #[source]
        source: SummarizerError,
    },
}

impl FileError {
    /// Root-relative path of the file that failed.
    pub fn path(&self) -> &str {
        match self {
            Self::Read { path, .. } | Self::Summarize { path, .. } => path,
        }
    }
}
