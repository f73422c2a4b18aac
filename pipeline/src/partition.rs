//! Split discovered files into reusable entries and work for the executor.

use crate::discovery::FileRef;
use crate::index::SummaryIndex;
use crate::types::SummaryRecord;

#[derive(Debug, Default)]
pub struct Partition {
    /// Records copied forward from the index.
    pub reused: Vec<SummaryRecord>,
    /// Files that need a fresh summary.
    pub to_process: Vec<FileRef>,
}

impl Partition {
    pub fn skipped(&self) -> usize {
        self.reused.len()
    }
}

/// A file is reused only when `regenerate` is off and the index holds a
/// non-empty summary under exactly its relative path.
pub fn partition(files: Vec<FileRef>, index: &SummaryIndex, regenerate: bool) -> Partition {
    let mut out = Partition::default();
    for file in files {
        let existing = if regenerate {
            None
        } else {
            index.reusable(file.relative())
        };
        match existing {
            Some(summary) => out.reused.push(SummaryRecord::reused(&file, summary)),
            None => out.to_process.push(file),
        }
    }
    out
}
