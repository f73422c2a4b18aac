//! Logging setup. Logs go to stderr so stdout carries only the run summary
//! and dry-run listing. While a progress bar is drawing on stderr, each log
//! line is written with the bar cleared.

use tracing_subscriber::EnvFilter;

use crate::progress::BarProgress;

/// Filter used when `RUST_LOG` is unset.
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "debug"
    } else {
        "info"
    }
}

/// `RUST_LOG` wins over `--verbose`.
pub fn init(verbose: bool, progress: &BarProgress) {
    let progress = progress.clone();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| default_directive(verbose).into()),
        )
        .with_writer(move || progress.writer(std::io::stderr()))
        .init();
}
