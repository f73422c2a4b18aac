//! Existing-summary index: recover `relative path -> summary` from a report
//! written by a previous run.
//!
//! The grammar is deliberately permissive and matches what earlier versions
//! of the tool wrote and read:
//!
//! ```text
//! ## [<dir>/](../<dir>/)                 section header
//! - [<name>](../<dir>/<name>): <summary>  entry
//! ```
//!
//! The directory and file name are taken between the *first* `[` and the
//! *first* `]` on the line, and the summary is everything after the first
//! `": "` that follows the link target. A `]` inside a file name therefore truncates the name. That is
//! kept as-is so older reports keep parsing the same way.

use std::collections::HashMap;
use std::path::Path;

use tracing::debug;

use crate::discovery::ROOT_DIR;

const SECTION_PREFIX: &str = "## [";
const ENTRY_PREFIX: &str = "- [";
const LINK_MARKER: &str = "](";
const LINK_CLOSE: &str = "): ";
const SUMMARY_SEPARATOR: &str = ": ";

/// Read-only mapping from `/`-separated relative path to summary text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SummaryIndex {
    entries: HashMap<String, String>,
}

impl SummaryIndex {
    /// Load the report at `path`. A missing or unreadable report is an empty
    /// index, never an error.
    pub fn load(path: &Path) -> Self {
        match std::fs::read(path) {
            Ok(bytes) => {
                let index = Self::parse(&String::from_utf8_lossy(&bytes));
                debug!(path = %path.display(), entries = index.len(), "loaded existing summaries");
                index
            }
            Err(e) => {
                debug!(path = %path.display(), error = %e, "no existing report; starting empty");
                Self::default()
            }
        }
    }

    /// Parse report text. Entries before the first section header are
    /// dropped since they cannot be tied to a directory.
    pub fn parse(text: &str) -> Self {
        let mut entries = HashMap::new();
        let mut current_dir = String::new();

        for line in text.lines() {
            if line.starts_with(SECTION_PREFIX) && line.contains(LINK_MARKER) {
                if let Some(dir) = first_bracketed(line) {
                    current_dir = dir.strip_suffix('/').unwrap_or(dir).to_string();
                }
            } else if line.starts_with(ENTRY_PREFIX) && line.contains(LINK_MARKER) {
                let Some(name) = first_bracketed(line) else {
                    continue;
                };
                if current_dir.is_empty() {
                    continue;
                }
                if let Some(summary) = entry_summary(line) {
                    entries.insert(join_relative(&current_dir, name), summary.to_string());
                }
            }
        }

        Self { entries }
    }

    pub fn get(&self, relative: &str) -> Option<&str> {
        self.entries.get(relative).map(String::as_str)
    }

    /// Non-empty summary for `relative`, if any.
    pub fn reusable(&self, relative: &str) -> Option<&str> {
        self.get(relative).filter(|s| !s.is_empty())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, String)> for SummaryIndex {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Everything after the `": "` that follows the link target. The search
/// starts past `](` so a `": "` inside the file name or link is skipped.
fn entry_summary(line: &str) -> Option<&str> {
    let target = line.find(LINK_MARKER)? + LINK_MARKER.len();
    let rest = &line[target..];
    let sep = rest
        .find(LINK_CLOSE)
        .map(|p| p + 1)
        .or_else(|| rest.find(SUMMARY_SEPARATOR))?;
    Some(rest[sep + SUMMARY_SEPARATOR.len()..].trim())
}

/// Text between the first `[` and the first `]`, when the `]` comes later.
fn first_bracketed(line: &str) -> Option<&str> {
    let start = line.find('[')? + 1;
    let end = line.find(']')?;
    (end > start).then(|| &line[start..end])
}

/// Join a report directory with a file name using `/`, with `.` meaning the
/// scan root.
pub fn join_relative(dir: &str, name: &str) -> String {
    let dir = dir.trim_end_matches('/');
    if dir.is_empty() || dir == ROOT_DIR {
        name.to_string()
    } else {
        format!("{dir}/{name}")
    }
}
