//! Progress reporting seam between the executor and whatever displays it.

/// Receives a tick after every finished file, success or failure.
///
/// The executor never calls `advance` concurrently, and `completed` goes up
/// by exactly one per call within a run. Reused files count as already done.
pub trait ProgressSink: Send + Sync {
    fn start(&self, _completed: usize, _total: usize) {}

    fn advance(&self, completed: usize, total: usize);

    fn finish(&self) {}
}

/// Discards all progress.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn advance(&self, _completed: usize, _total: usize) {}
}
