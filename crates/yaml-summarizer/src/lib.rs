//! `summarize-yaml` front end: argument parsing, backend selection, logging
//! and progress display around the [`pipeline`] crate.

pub mod cli;
pub mod progress;
pub mod provider;
pub mod telemetry;
