//! Incremental YAML summarization pipeline.
//!
//! ```text
//! discovery ──► partition ──► executor ──► report
//!                  ▲             │
//!            SummaryIndex    normalize
//!         (previous report)
//! ```
//!
//! A run walks the scan root for YAML files, reuses every summary the
//! previous report already holds, sends the rest to a [`Summarizer`] with
//! bounded concurrency, and rewrites the report from scratch. Because the
//! next run parses that same report, the report file is the only state kept
//! between runs.
//!
//! # Usage
//!
//! ```no_run
//! # async fn demo() -> Result<(), pipeline::PipelineError> {
//! use std::sync::Arc;
//! use pipeline::{progress::NoProgress, summarizer::OllamaSummarizer, PipelineConfig};
//!
//! let config = PipelineConfig::new("./deploy").with_concurrency(4);
//! let summarizer = Arc::new(OllamaSummarizer::new("localhost:11434", &config.model)?);
//! let outcome = pipeline::run(&config, summarizer, Arc::new(NoProgress)).await?;
//! println!("{} new, {} reused", outcome.stats.processed, outcome.stats.skipped);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod discovery;
pub mod error;
pub mod executor;
pub mod index;
pub mod normalize;
pub mod partition;
pub mod progress;
pub mod report;
pub mod side_cache;
pub mod summarizer;
pub mod types;

use std::sync::Arc;
use std::time::Instant;

use tracing::info;

pub use config::PipelineConfig;
pub use discovery::FileRef;
pub use error::{FileError, PipelineError};
pub use index::SummaryIndex;
pub use summarizer::{Summarizer, SummarizerError};
pub use types::{DryRunPlan, RunOutcome, RunStats, SummaryRecord};

use executor::{Executor, ExecutorSettings};
use progress::ProgressSink;
use report::ReportGroups;

/// Run the whole pipeline once and overwrite the report.
///
/// Fails before touching the report when files cannot be enumerated or the
/// configured model is unavailable. Per-file failures only shrink the report.
pub async fn run(
    config: &PipelineConfig,
    summarizer: Arc<dyn Summarizer>,
    progress: Arc<dyn ProgressSink>,
) -> Result<RunOutcome, PipelineError> {
    config.validate()?;

    let files = discovery::discover(&config.root, config.include_hidden)?;
    let report_path = config.report_path();
    let index = SummaryIndex::load(&report_path);

    if !summarizer.is_available(&config.model).await? {
        return Err(PipelineError::ModelUnavailable {
            model: config.model.clone(),
            provider: summarizer.name().to_string(),
        });
    }

    let start = Instant::now();
    let total = files.len();
    let parts = partition::partition(files.clone(), &index, config.regenerate);
    let skipped = parts.skipped();
    info!(total, skipped, pending = parts.to_process.len(), "partitioned files");

    let executor = Executor::new(
        summarizer,
        progress,
        ExecutorSettings {
            concurrency: config.concurrency,
            max_sentences: config.max_sentences,
            side_cache: config.side_cache.clone(),
            ..ExecutorSettings::default()
        },
    );
    let mut execution = executor.execute(parts.to_process, skipped, total).await;

    for record in parts.reused {
        execution.records.insert(record.relative.clone(), record);
    }

    let groups = ReportGroups::build(&files, &execution.records);
    report::write_report(&report_path, &groups.render()).await?;

    let stats = RunStats {
        processed: execution.processed,
        skipped,
        failed: execution.failed,
        total,
    };
    info!(
        report = %report_path.display(),
        processed = stats.processed,
        skipped = stats.skipped,
        failed = stats.failed,
        listed = groups.file_count(),
        "report written"
    );

    Ok(RunOutcome {
        report_path,
        stats,
        elapsed: start.elapsed(),
    })
}

/// Report what [`run`] would do without contacting a summarizer or writing
/// anything. `regenerate` is not consulted.
pub fn plan(config: &PipelineConfig) -> Result<DryRunPlan, PipelineError> {
    let files = discovery::discover(&config.root, config.include_hidden)?;
    let index = SummaryIndex::load(&config.report_path());
    let total = files.len();
    let parts = partition::partition(files, &index, false);

    let mut to_process: Vec<String> = parts
        .to_process
        .iter()
        .map(|f| f.relative().to_string())
        .collect();
    to_process.sort();

    Ok(DryRunPlan {
        total,
        reusable: parts.skipped(),
        to_process,
    })
}
