//! File discovery: find every YAML file under a scan root.

use std::path::{Path, PathBuf};

use ignore::WalkBuilder;
use tracing::debug;

use crate::error::PipelineError;

/// Suffixes recognized as YAML.
pub const YAML_EXTENSIONS: [&str; 2] = [".yaml", ".yml"];

/// Directory name used in relative paths for files directly under the root.
pub const ROOT_DIR: &str = ".";

/// A discovered file: where it lives on disk and its `/`-separated path
/// relative to the scan root.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FileRef {
    path: PathBuf,
    relative: String,
}

impl FileRef {
    pub fn new(path: impl Into<PathBuf>, relative: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            relative: relative.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Root-relative path with forward slashes, e.g. `app/deployment.yaml`.
    pub fn relative(&self) -> &str {
        &self.relative
    }

    /// Direct parent directory relative to the root, `.` for top-level files.
    pub fn dir(&self) -> &str {
        match self.relative.rsplit_once('/') {
            Some((dir, _)) => dir,
            None => ROOT_DIR,
        }
    }

    /// Leaf file name.
    pub fn name(&self) -> &str {
        match self.relative.rsplit_once('/') {
            Some((_, name)) => name,
            None => &self.relative,
        }
    }
}

pub fn is_yaml_name(name: &str) -> bool {
    YAML_EXTENSIONS.iter().any(|ext| name.ends_with(ext))
}

fn is_hidden_name(name: &str) -> bool {
    name.starts_with('.')
}

/// Walk `root` and return every YAML file beneath it.
///
/// With `include_hidden` false, directories whose name starts with `.` are
/// pruned without being descended into. Hidden *files* are still matched.
/// The root itself is never pruned. Any I/O error aborts the walk.
pub fn discover(root: &Path, include_hidden: bool) -> Result<Vec<FileRef>, PipelineError> {
    let walk_err = |source| PipelineError::Discovery {
        root: root.to_path_buf(),
        source,
    };

    let abs_root = std::path::absolute(root).map_err(|e| walk_err(ignore::Error::from(e)))?;
    let walker = WalkBuilder::new(&abs_root)
        .standard_filters(false)
        .follow_links(false)
        .filter_entry(move |entry| {
            if include_hidden || entry.depth() == 0 {
                return true;
            }
            let is_dir = entry.file_type().is_some_and(|t| t.is_dir());
            !(is_dir && is_hidden_name(&entry.file_name().to_string_lossy()))
        })
        .build();

    let mut files = Vec::new();
    for entry in walker {
        let entry = entry.map_err(walk_err)?;
        if entry.file_type().is_some_and(|t| t.is_dir()) {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if !is_yaml_name(&name) {
            continue;
        }
        let relative = relative_path(&abs_root, entry.path());
        files.push(FileRef::new(entry.path(), relative));
    }

    debug!(root = %root.display(), count = files.len(), "discovered YAML files");
    Ok(files)
}

/// `/`-joined path of `path` below `root`. Falls back to the file name when
/// `path` is not under `root`.
pub fn relative_path(root: &Path, path: &Path) -> String {
    match path.strip_prefix(root) {
        Ok(rel) => rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/"),
        Err(_) => path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
    }
}
