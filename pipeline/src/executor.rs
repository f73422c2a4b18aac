//! Summarization executor: bounded worker pool over the files that need a
//! fresh summary.
//!
//! ```text
//!   queue (Mutex<IntoIter<FileRef>>)
//!      │  next()
//!      ├──► worker 0 ─┐
//!      ├──► worker 1 ─┼─► read ─► Summarizer ─► normalize ─► results (Mutex<HashMap>)
//!      └──► worker k ─┘                                       completed / processed (atomics)
//! ```
//!
//! `k = min(concurrency, work)`. Workers pull until the queue is empty and
//! the caller waits for all of them. There is no timeout: a summarizer call
//! that never returns holds its worker.
//!
//! ## Partial failure policy
//!
//! A read or summarizer error is logged with `warn!`, recorded as a failed
//! [`SummaryRecord`], and the worker moves on. Nothing here aborts the batch.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;

use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::discovery::FileRef;
use crate::error::FileError;
use crate::normalize::normalize;
use crate::progress::ProgressSink;
use crate::side_cache;
use crate::summarizer::{Summarizer, SUMMARIZE_PROMPT};
use crate::types::SummaryRecord;

/// Knobs for one batch.
#[derive(Debug, Clone)]
pub struct ExecutorSettings {
    pub concurrency: usize,
    pub max_sentences: usize,
    pub prompt: String,
    pub side_cache: Option<PathBuf>,
}

impl Default for ExecutorSettings {
    fn default() -> Self {
        Self {
            concurrency: 1,
            max_sentences: crate::config::DEFAULT_MAX_SENTENCES,
            prompt: SUMMARIZE_PROMPT.to_string(),
            side_cache: None,
        }
    }
}

/// Everything the batch produced. `records` holds exactly one entry per
/// submitted file, keyed by relative path; failed files have
/// `success == false`.
#[derive(Debug, Default)]
pub struct ExecutionReport {
    pub records: HashMap<String, SummaryRecord>,
    pub processed: usize,
    pub failed: usize,
}

/// Shared mutable state. The map is only touched under its lock; the
/// counters are plain atomics.
struct Shared {
    results: Mutex<HashMap<String, SummaryRecord>>,
    completed: AtomicUsize,
    processed: AtomicUsize,
    failed: AtomicUsize,
}

struct WorkerContext {
    summarizer: Arc<dyn Summarizer>,
    progress: Arc<dyn ProgressSink>,
    settings: ExecutorSettings,
    queue: Mutex<std::vec::IntoIter<FileRef>>,
    shared: Shared,
    total: usize,
}

pub struct Executor {
    summarizer: Arc<dyn Summarizer>,
    progress: Arc<dyn ProgressSink>,
    settings: ExecutorSettings,
}

/// Worker count for `work` items: at least one, never more than the work.
pub fn effective_workers(concurrency: usize, work: usize) -> usize {
    concurrency.max(1).min(work)
}

impl Executor {
    pub fn new(
        summarizer: Arc<dyn Summarizer>,
        progress: Arc<dyn ProgressSink>,
        settings: ExecutorSettings,
    ) -> Self {
        Self {
            summarizer,
            progress,
            settings,
        }
    }

    /// Summarize `work` and block until every worker has finished.
    ///
    /// `already_completed` files (reused from the index) count toward
    /// progress from the start; `total` is the full discovered file count.
    pub async fn execute(
        &self,
        work: Vec<FileRef>,
        already_completed: usize,
        total: usize,
    ) -> ExecutionReport {
        let workers = effective_workers(self.settings.concurrency, work.len());
        info!(files = work.len(), workers, "summarizing");
        self.progress.start(already_completed, total);

        let ctx = Arc::new(WorkerContext {
            summarizer: Arc::clone(&self.summarizer),
            progress: Arc::clone(&self.progress),
            settings: self.settings.clone(),
            queue: Mutex::new(work.into_iter()),
            shared: Shared {
                results: Mutex::new(HashMap::new()),
                completed: AtomicUsize::new(already_completed),
                processed: AtomicUsize::new(0),
                failed: AtomicUsize::new(0),
            },
            total,
        });

        let mut join_set: JoinSet<()> = JoinSet::new();
        for worker_id in 0..workers {
            let ctx = Arc::clone(&ctx);
            join_set.spawn(async move { run_worker(worker_id, &ctx).await });
        }

        while let Some(res) = join_set.join_next().await {
            if let Err(e) = res {
                // Remaining workers keep draining the queue.
                warn!(error = %e, "summarization worker panicked");
            }
        }

        self.progress.finish();

        let records = std::mem::take(
            &mut *ctx
                .shared
                .results
                .lock()
                .unwrap_or_else(PoisonError::into_inner),
        );
        ExecutionReport {
            records,
            processed: ctx.shared.processed.load(Ordering::SeqCst),
            failed: ctx.shared.failed.load(Ordering::SeqCst),
        }
    }
}

async fn run_worker(worker_id: usize, ctx: &WorkerContext) {
    loop {
        let next = ctx
            .queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .next();
        let Some(file) = next else {
            debug!(worker_id, "queue drained");
            return;
        };

        let start = Instant::now();
        let record = match summarize_file(ctx, &file).await {
            Ok(summary) => {
                if let Some(dir) = &ctx.settings.side_cache {
                    if let Err(e) = side_cache::write_summary(dir, file.relative(), &summary).await {
                        warn!(file = %file.relative(), error = %e, "failed to write side cache entry");
                    }
                }
                ctx.shared.processed.fetch_add(1, Ordering::SeqCst);
                debug!(worker_id, file = %file.relative(), elapsed_ms = start.elapsed().as_millis() as u64, "summarized");
                SummaryRecord::generated(&file, summary)
            }
            Err(e) => {
                ctx.shared.failed.fetch_add(1, Ordering::SeqCst);
                warn!(worker_id, file = %e.path(), error = %e, "skipping file");
                SummaryRecord::failed(&file)
            }
        };

        // Tick under the results lock so sinks see `completed` in order.
        {
            let mut results = ctx
                .shared
                .results
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            results.insert(record.relative.clone(), record);
            let completed = ctx.shared.completed.fetch_add(1, Ordering::SeqCst) + 1;
            ctx.progress.advance(completed, ctx.total);
        }
    }
}

async fn summarize_file(ctx: &WorkerContext, file: &FileRef) -> Result<String, FileError> {
    let bytes = tokio::fs::read(file.path())
        .await
        .map_err(|source| FileError::Read {
            path: file.relative().to_string(),
            source,
        })?;
    let content = String::from_utf8_lossy(&bytes);

    let raw = ctx
        .summarizer
        .summarize(&content, &ctx.settings.prompt)
        .await
        .map_err(|source| FileError::Summarize {
            path: file.relative().to_string(),
            source,
        })?;

    Ok(normalize(&raw, ctx.settings.max_sentences))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::NoProgress;
    use crate::summarizer::{MockSummarizer, StubSummarizer, SummarizerError};
    use crate::types::RecordOrigin;
    use std::collections::HashSet;
    use std::fs;

    /// Records every progress tick.
    #[derive(Default)]
    struct Ticks(Mutex<Vec<(usize, usize)>>);

    impl ProgressSink for Ticks {
        fn advance(&self, completed: usize, total: usize) {
            self.0.lock().unwrap().push((completed, total));
        }
    }

    fn write_files(root: &std::path::Path, n: usize) -> Vec<FileRef> {
        (0..n)
            .map(|i| {
                let rel = format!("dir{}/file{i}.yaml", i % 3);
                let path = root.join(&rel);
                fs::create_dir_all(path.parent().unwrap()).unwrap();
                fs::write(&path, format!("id: {i}")).unwrap();
                FileRef::new(path, rel)
            })
            .collect()
    }

    fn executor(summarizer: Arc<dyn Summarizer>, concurrency: usize) -> Executor {
        Executor::new(
            summarizer,
            Arc::new(NoProgress),
            ExecutorSettings {
                concurrency,
                ..ExecutorSettings::default()
            },
        )
    }

    #[test]
    fn worker_count_is_clamped() {
        assert_eq!(effective_workers(8, 3), 3);
        assert_eq!(effective_workers(2, 10), 2);
        assert_eq!(effective_workers(0, 10), 1);
        assert_eq!(effective_workers(4, 0), 0);
    }

    #[tokio::test]
    async fn every_file_gets_exactly_one_record_for_any_concurrency() {
        let dir = tempfile::tempdir().unwrap();
        let files = write_files(dir.path(), 17);
        let expected: HashSet<String> = files.iter().map(|f| f.relative().to_string()).collect();

        for k in [1, 2, 5, 16, 40] {
            let exec = executor(Arc::new(StubSummarizer::new()), k);
            let report = exec.execute(files.clone(), 0, files.len()).await;
            let got: HashSet<String> = report.records.keys().cloned().collect();
            assert_eq!(got, expected, "concurrency {k}");
            assert_eq!(report.records.len(), 17);
            assert_eq!(report.processed, 17);
            assert_eq!(report.failed, 0);
        }
    }

    #[tokio::test]
    async fn failures_are_recorded_and_batch_continues() {
        let dir = tempfile::tempdir().unwrap();
        let mut files = write_files(dir.path(), 4);
        files.push(FileRef::new(dir.path().join("gone.yaml"), "gone.yaml"));

        let stub = StubSummarizer::new().with_failure("id: 2");
        let report = executor(Arc::new(stub), 3)
            .execute(files, 0, 5)
            .await;

        assert_eq!(report.records.len(), 5);
        assert_eq!(report.processed, 3);
        assert_eq!(report.failed, 2);
        assert!(!report.records["gone.yaml"].success);
        assert!(!report.records["dir2/file2.yaml"].success);
        assert!(report.records["dir0/file0.yaml"].success);
        assert_eq!(report.records["dir0/file0.yaml"].origin, RecordOrigin::Generated);
    }

    #[tokio::test]
    async fn output_is_normalized() {
        let dir = tempfile::tempdir().unwrap();
        let files = write_files(dir.path(), 1);
        let stub = StubSummarizer::new()
            .with_default_response("# Heading\n- bullet\nFirst. Second. Third.");
        let report = executor(Arc::new(stub), 1).execute(files, 0, 1).await;
        assert_eq!(report.records["dir0/file0.yaml"].summary, "First. Second.");
    }

    #[tokio::test]
    async fn progress_counts_from_reused_files_to_total() {
        let dir = tempfile::tempdir().unwrap();
        let files = write_files(dir.path(), 3);
        let ticks = Arc::new(Ticks::default());
        let exec = Executor::new(
            Arc::new(StubSummarizer::new().with_failure("id: 1")),
            ticks.clone(),
            ExecutorSettings {
                concurrency: 2,
                ..ExecutorSettings::default()
            },
        );
        exec.execute(files, 2, 5).await;

        let seen: Vec<usize> = ticks.0.lock().unwrap().iter().map(|(c, _)| *c).collect();
        assert_eq!(seen, vec![3, 4, 5]);
        assert!(ticks.0.lock().unwrap().iter().all(|(_, t)| *t == 5));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn progress_ticks_arrive_in_order_under_contention() {
        let dir = tempfile::tempdir().unwrap();
        let files = write_files(dir.path(), 60);
        let ticks = Arc::new(Ticks::default());
        let exec = Executor::new(
            Arc::new(StubSummarizer::new()),
            ticks.clone(),
            ExecutorSettings {
                concurrency: 8,
                ..ExecutorSettings::default()
            },
        );
        exec.execute(files, 0, 60).await;

        let seen: Vec<usize> = ticks.0.lock().unwrap().iter().map(|(c, _)| *c).collect();
        assert_eq!(seen, (1..=60).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn prompt_is_sent_with_raw_content() {
        let dir = tempfile::tempdir().unwrap();
        let files = write_files(dir.path(), 1);

        let mut mock = MockSummarizer::new();
        mock.expect_summarize()
            .withf(|content, prompt| content == "id: 0" && prompt == SUMMARIZE_PROMPT)
            .times(1)
            .returning(|_, _| Ok("Identifies item zero.".to_string()));

        let report = executor(Arc::new(mock), 1).execute(files, 0, 1).await;
        assert_eq!(report.records["dir0/file0.yaml"].summary, "Identifies item zero.");
    }

    #[tokio::test]
    async fn empty_work_never_calls_the_summarizer() {
        let mut mock = MockSummarizer::new();
        mock.expect_summarize().times(0);
        let report = executor(Arc::new(mock), 4).execute(Vec::new(), 3, 3).await;
        assert!(report.records.is_empty());
        assert_eq!(report.processed, 0);
    }

    #[tokio::test]
    async fn side_cache_receives_new_summaries_only_on_success() {
        let dir = tempfile::tempdir().unwrap();
        let cache = dir.path().join("cache");
        let files = write_files(dir.path(), 2);

        let mut mock = MockSummarizer::new();
        mock.expect_summarize().returning(|content, _| {
            if content.contains("id: 1") {
                Err(SummarizerError::Unavailable("down".into()))
            } else {
                Ok("Cached text.".to_string())
            }
        });

        let exec = Executor::new(
            Arc::new(mock),
            Arc::new(NoProgress),
            ExecutorSettings {
                concurrency: 2,
                side_cache: Some(cache.clone()),
                ..ExecutorSettings::default()
            },
        );
        exec.execute(files, 0, 2).await;

        assert_eq!(
            fs::read_to_string(cache.join("dir0_file0.yaml.md")).unwrap(),
            "Cached text."
        );
        assert!(!cache.join("dir1_file1.yaml.md").exists());
    }
}
