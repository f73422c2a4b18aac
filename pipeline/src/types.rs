//! Records and counters shared between pipeline stages.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::discovery::FileRef;

/// Where a record's summary came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordOrigin {
    /// Copied forward from the existing report.
    Reused,
    /// Produced by the summarizer during this run.
    Generated,
}

/// Outcome of summarizing (or reusing) one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryRecord {
    /// Root-relative path, `/`-separated.
    pub relative: String,
    /// Direct parent directory relative to the root (`.` at top level).
    pub dir: String,
    /// Leaf file name.
    pub name: String,
    /// Normalized summary text; empty when `success` is false.
    pub summary: String,
    pub success: bool,
    pub origin: RecordOrigin,
}

impl SummaryRecord {
    pub fn reused(file: &FileRef, summary: impl Into<String>) -> Self {
        Self::build(file, summary.into(), true, RecordOrigin::Reused)
    }

    pub fn generated(file: &FileRef, summary: impl Into<String>) -> Self {
        Self::build(file, summary.into(), true, RecordOrigin::Generated)
    }

    pub fn failed(file: &FileRef) -> Self {
        Self::build(file, String::new(), false, RecordOrigin::Generated)
    }

    fn build(file: &FileRef, summary: String, success: bool, origin: RecordOrigin) -> Self {
        Self {
            relative: file.relative().to_string(),
            dir: file.dir().to_string(),
            name: file.name().to_string(),
            summary,
            success,
            origin,
        }
    }
}

/// Per-run counters. Derived from the run, never persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStats {
    /// Newly generated summaries.
    pub processed: usize,
    /// Summaries reused from the existing report.
    pub skipped: usize,
    /// Files whose read or summarizer call failed.
    pub failed: usize,
    /// Files discovered.
    pub total: usize,
}

/// What [`crate::run`] hands back after the report is written.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub report_path: PathBuf,
    pub stats: RunStats,
    pub elapsed: Duration,
}

/// What a dry run would do, without contacting any backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DryRunPlan {
    pub total: usize,
    pub reusable: usize,
    /// Relative paths that would be summarized, sorted.
    pub to_process: Vec<String>,
}
