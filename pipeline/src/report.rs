//! Report aggregation and rendering.
//!
//! The rendered markdown is both the human-facing output and the input that
//! [`crate::index::SummaryIndex`] parses on the next run, so the line shapes
//! here must stay in lockstep with that parser.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use tokio::io::AsyncWriteExt;

use crate::discovery::FileRef;
use crate::error::PipelineError;
use crate::types::SummaryRecord;

pub const REPORT_HEADER: &str = "# YAML File Details

This document provides an overview of all YAML files in the repository, organized by directory, with a brief description of what each file does or configures. Use this as a reference for understanding the purpose of each manifest or configuration file.

---

## How to Use
- Click the file links to jump to the file in the repository.
- Each entry includes a short summary of the file's intent or function.

---

<!--
  To keep this file up to date, add new YAMLs as they are introduced and provide a short description for each.
-->

";

/// Records bucketed by root-relative directory. Iteration order is the
/// rendering order: directories ascending, file names ascending.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportGroups {
    groups: BTreeMap<String, Vec<(String, String)>>,
}

impl ReportGroups {
    /// Bucket every successfully summarized file under its direct parent
    /// directory. Files without a successful record are left out.
    pub fn build(files: &[FileRef], records: &HashMap<String, SummaryRecord>) -> Self {
        let mut groups: BTreeMap<String, Vec<(String, String)>> = BTreeMap::new();
        for file in files {
            let Some(record) = records.get(file.relative()).filter(|r| r.success) else {
                continue;
            };
            groups
                .entry(file.dir().to_string())
                .or_default()
                .push((file.name().to_string(), record.summary.clone()));
        }
        for entries in groups.values_mut() {
            entries.sort_by(|a, b| a.0.cmp(&b.0));
        }
        Self { groups }
    }

    pub fn dirs(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    pub fn entries(&self, dir: &str) -> Option<&[(String, String)]> {
        self.groups.get(dir).map(Vec::as_slice)
    }

    pub fn file_count(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    /// Full report text: header, then one section per directory.
    pub fn render(&self) -> String {
        let mut out = String::from(REPORT_HEADER);
        for (dir, entries) in &self.groups {
            out.push_str(&format!("\n## [{dir}/](../{dir}/)\n"));
            for (name, summary) in entries {
                out.push_str(&format!("- [{name}](../{dir}/{name}): {summary}\n"));
            }
        }
        out
    }
}

/// Replace the report at `path` with `contents`: create (truncating) and
/// write in one pass. A failure here is fatal for the run.
pub async fn write_report(path: &Path, contents: &str) -> Result<(), PipelineError> {
    let write_err = |source| PipelineError::WriteReport {
        path: path.to_path_buf(),
        source,
    };
    let mut file = tokio::fs::File::create(path).await.map_err(write_err)?;
    file.write_all(contents.as_bytes()).await.map_err(write_err)?;
    file.flush().await.map_err(write_err)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::SummaryIndex;

    fn fixture(entries: &[(&str, &str)]) -> (Vec<FileRef>, HashMap<String, SummaryRecord>) {
        let files: Vec<FileRef> = entries
            .iter()
            .map(|(rel, _)| FileRef::new(format!("/root/{rel}"), *rel))
            .collect();
        let records = files
            .iter()
            .zip(entries)
            .map(|(f, (_, s))| (f.relative().to_string(), SummaryRecord::generated(f, *s)))
            .collect();
        (files, records)
    }

    #[test]
    fn directories_and_files_are_sorted() {
        let (files, records) = fixture(&[
            ("beta/c.yaml", "C."),
            ("alpha/b.yaml", "B."),
            ("alpha/a.yaml", "A."),
        ]);
        let text = ReportGroups::build(&files, &records).render();

        let alpha = text.find("## [alpha/](../alpha/)").unwrap();
        let beta = text.find("## [beta/](../beta/)").unwrap();
        let a = text.find("- [a.yaml](../alpha/a.yaml): A.").unwrap();
        let b = text.find("- [b.yaml](../alpha/b.yaml): B.").unwrap();
        assert!(alpha < a && a < b && b < beta);
        assert!(text.starts_with("# YAML File Details"));
    }

    #[test]
    fn top_level_files_use_dot_section() {
        let (files, records) = fixture(&[("config.yaml", "Config.")]);
        let text = ReportGroups::build(&files, &records).render();
        assert!(text.contains("\n## [./](.././)\n- [config.yaml](.././config.yaml): Config.\n"));
    }

    #[test]
    fn groups_by_direct_parent_only() {
        let (files, records) = fixture(&[("a/b/c.yaml", "Deep."), ("a/d.yaml", "Shallow.")]);
        let groups = ReportGroups::build(&files, &records);
        assert_eq!(groups.dirs().collect::<Vec<_>>(), vec!["a", "a/b"]);
        assert_eq!(groups.file_count(), 2);
    }

    #[test]
    fn failed_records_are_omitted() {
        let (files, mut records) = fixture(&[("x/ok.yaml", "Fine."), ("x/bad.yaml", "")]);
        records.insert("x/bad.yaml".into(), SummaryRecord::failed(&files[1]));
        let groups = ReportGroups::build(&files, &records);
        assert_eq!(groups.entries("x").unwrap().len(), 1);
        assert!(!groups.render().contains("bad.yaml"));
    }

    #[test]
    fn rendered_report_parses_back_to_the_same_pairs() {
        let pairs = [
            ("config.yaml", "ConfigMap summary."),
            ("app/deployment.yaml", "Deployment summary: replicas 3."),
            ("app/web/ingress.yml", "Routes traffic!"),
            ("db/postgres.yaml", "StatefulSet for Postgres."),
        ];
        let (files, records) = fixture(&pairs);
        let index = SummaryIndex::parse(&ReportGroups::build(&files, &records).render());

        assert_eq!(index.len(), pairs.len());
        for (rel, summary) in pairs {
            assert_eq!(index.get(rel), Some(summary), "{rel}");
        }
    }

    #[tokio::test]
    async fn write_report_overwrites_previous_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("yaml_details.md");
        std::fs::write(&path, "old contents that are much longer than the new ones").unwrap();
        write_report(&path, "new").await.unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "new");
    }

    #[tokio::test]
    async fn write_report_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = write_report(&dir.path().join("nope/out.md"), "x").await.unwrap_err();
        assert!(matches!(err, PipelineError::WriteReport { .. }));
    }
}
