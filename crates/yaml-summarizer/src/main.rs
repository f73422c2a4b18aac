//! `summarize-yaml`: write a directory-grouped markdown report describing
//! every YAML file under a tree, reusing summaries from the previous report.
//!
//! # Usage
//!
//! ```bash
//! # Local Ollama, four files at a time
//! summarize-yaml ./k8s -j 4
//!
//! # See what would be sent to the model
//! summarize-yaml ./k8s --dry-run
//!
//! # OpenAI-compatible endpoint
//! OPENAI_API_KEY=sk-... summarize-yaml ./k8s --provider openai --model gpt-4o-mini
//! ```

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info, warn};

use yaml_summarizer::cli::{self, Args};
use yaml_summarizer::progress::BarProgress;
use yaml_summarizer::provider::{self, ProviderEnv};
use yaml_summarizer::telemetry;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let progress = BarProgress::new();
    telemetry::init(args.verbose, &progress);

    let env = ProviderEnv::from_env();
    let cwd = std::env::current_dir().context("failed to resolve working directory")?;
    let config = args.to_config(&env, &cwd);
    debug!(?config, "resolved configuration");

    if args.dry_run {
        let plan = pipeline::plan(&config)
            .with_context(|| format!("failed to scan {}", args.directory.display()))?;
        print!("{}", cli::format_plan(&args.directory, &plan));
        return Ok(());
    }

    let summarizer = provider::build_summarizer(args.provider, &config.model, &env)
        .with_context(|| format!("failed to set up {} provider", args.provider))?;
    info!(
        provider = %args.provider,
        model = %config.model,
        root = %config.root.display(),
        concurrency = config.concurrency,
        "Starting YAML summarization"
    );

    let outcome = match pipeline::run(&config, summarizer, Arc::new(progress)).await {
        Ok(outcome) => outcome,
        Err(e) => {
            if !e.report_untouched() {
                warn!(report = %config.report_path().display(), "report may be incomplete");
            }
            return Err(anyhow::Error::new(e)
                .context(format!("summarization of {} failed", args.directory.display())));
        }
    };
    print!("{}", cli::format_outcome(&outcome));

    Ok(())
}
