//! Command-line arguments and their translation into a [`PipelineConfig`].

use std::path::{Path, PathBuf};

use clap::Parser;

use pipeline::config::{DEFAULT_CACHE_DIR, DEFAULT_REPORT_FILE};
use pipeline::{DryRunPlan, PipelineConfig, RunOutcome};

use crate::provider::{ProviderEnv, ProviderKind};

/// Summarize every YAML file under a directory into one markdown report.
///
/// Summaries already present in the report are reused; only new files are
/// sent to the model.
#[derive(Parser, Debug, Clone)]
#[command(name = "summarize-yaml", author, version, about, long_about = None)]
pub struct Args {
    /// Directory to scan for .yaml / .yml files
    pub directory: PathBuf,

    /// Summarize every file again, ignoring the existing report
    #[arg(long, default_value_t = false)]
    pub regenerate: bool,

    /// Also write each new summary to its own file in the cache directory
    #[arg(long, default_value_t = false)]
    pub localcache: bool,

    /// Cache directory name, relative to the working directory
    #[arg(long, default_value = DEFAULT_CACHE_DIR)]
    pub cache_dir: PathBuf,

    /// Descend into directories whose name starts with '.'
    #[arg(long, default_value_t = false)]
    pub include_hidden_directories: bool,

    /// Model to use (overrides SUMMARIZE_YAML_MODEL)
    #[arg(long)]
    pub model: Option<String>,

    /// Report file name, written inside DIRECTORY
    #[arg(short, long, default_value = DEFAULT_REPORT_FILE)]
    pub output: PathBuf,

    /// Show what would be processed without calling the model
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,

    /// Number of files summarized in parallel
    #[arg(short = 'j', long, default_value_t = 1, value_parser = clap::value_parser!(u16).range(1..))]
    pub concurrency: u16,

    /// Summarization backend
    #[arg(long, value_enum, default_value_t = ProviderKind::Ollama)]
    pub provider: ProviderKind,

    /// Enable debug logging
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

impl Args {
    /// Build the run configuration. `cwd` anchors the side-cache directory.
    pub fn to_config(&self, env: &ProviderEnv, cwd: &Path) -> PipelineConfig {
        let side_cache = self.localcache.then(|| cwd.join(&self.cache_dir));
        PipelineConfig::new(&self.directory)
            .with_output_file(&self.output)
            .with_regenerate(self.regenerate)
            .with_include_hidden(self.include_hidden_directories)
            .with_concurrency(usize::from(self.concurrency))
            .with_side_cache(side_cache)
            .with_model(env.resolve_model(self.model.as_deref()))
    }
}

/// Stdout text for `--dry-run`.
pub fn format_plan(directory: &Path, plan: &DryRunPlan) -> String {
    let mut out = format!(
        "Dry run: {} YAML files found in {}\n  New (would summarize): {}\n  Existing (would skip): {}\n",
        plan.total,
        directory.display(),
        plan.to_process.len(),
        plan.reusable,
    );
    if !plan.to_process.is_empty() {
        out.push_str("\nFiles to summarize:\n");
        for rel in &plan.to_process {
            out.push_str(&format!("  - {rel}\n"));
        }
    }
    out
}

/// Stdout text after a completed run.
pub fn format_outcome(outcome: &RunOutcome) -> String {
    let stats = &outcome.stats;
    let mut out = format!(
        "Report written to {}\n  Processed: {}\n  Skipped: {}\n",
        outcome.report_path.display(),
        stats.processed,
        stats.skipped,
    );
    if stats.failed > 0 {
        out.push_str(&format!("  Failed: {}\n", stats.failed));
    }
    out.push_str(&format!("  Elapsed: {:.2?}\n", outcome.elapsed));
    out
}
