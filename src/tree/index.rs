//! Flat repository file list and per-level partitioning

use super::path::TreePath;
use super::sample::SampleTree;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use walkdir::WalkDir;

/// Directories never worth showing when indexing a local checkout
const IGNORED_DIRS: &[&str] = &[
    ".git",
    "node_modules",
    "target",
    "dist",
    "build",
    "__pycache__",
    ".venv",
    "venv",
];

fn is_ignored_dir(entry: &walkdir::DirEntry) -> bool {
    entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| IGNORED_DIRS.contains(&name))
}

/// Canonical form of one file-list entry: no leading `./` or `/`, no empty
/// or `.` segments. Blank entries and entries that climb with `..` give
/// `None`.
pub fn normalize_entry(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let mut segments = Vec::new();
    for segment in trimmed.split('/') {
        match segment {
            "" | "." => continue,
            ".." => {
                tracing::debug!(entry = %trimmed, "skipping file list entry with '..'");
                return None;
            }
            _ => segments.push(segment),
        }
    }
    if segments.is_empty() {
        tracing::debug!(entry = %trimmed, "skipping file list entry with no name");
        return None;
    }
    Some(segments.join("/"))
}

/// Immediate children of one directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Level {
    #[serde(default)]
    pub directories: Vec<String>,
    #[serde(default)]
    pub files: Vec<String>,
}

impl Level {
    pub fn is_empty(&self) -> bool {
        self.directories.is_empty() && self.files.is_empty()
    }
}

/// Repository-relative file paths with `/` separators, in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileIndex {
    entries: Vec<String>,
}

impl FileIndex {
    /// Parse the newline-delimited `file_structure` blob. Blank lines are
    /// dropped and every entry goes through [`normalize_entry`].
    pub fn parse(text: &str) -> Self {
        Self::from_entries(text.lines())
    }

    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entries = entries
            .into_iter()
            .filter_map(|entry| normalize_entry(&entry.into()))
            .collect();
        Self { entries }
    }

    /// Index the files of a local checkout, sorted for stable output.
    pub fn from_directory(root: &Path) -> Result<Self> {
        let mut entries = Vec::new();
        let walker = WalkDir::new(root)
            .follow_links(false)
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !is_ignored_dir(entry));

        for entry in walker {
            let entry = entry.with_context(|| format!("Failed to walk {}", root.display()))?;
            if !entry.file_type().is_file() {
                continue;
            }
            let relative = entry
                .path()
                .strip_prefix(root)
                .with_context(|| format!("{} escaped {}", entry.path().display(), root.display()))?;
            let joined = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            entries.push(joined);
        }

        entries.sort();
        tracing::debug!(root = %root.display(), files = entries.len(), "indexed local checkout");
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Newline-joined form, the same shape the analysis backend sends.
    pub fn to_text(&self) -> String {
        self.entries.join("\n")
    }

    /// Partition the index into the direct directories and files under `path`.
    ///
    /// Directories keep the order of their first appearance. Entries outside
    /// `path` are skipped. A file whose name matches a directory at the same
    /// level is dropped so node ids stay unique.
    pub fn level(&self, path: &TreePath) -> Level {
        let prefix = path.joined();
        let mut seen_dirs: HashSet<&str> = HashSet::new();
        let mut seen_files: HashSet<&str> = HashSet::new();
        let mut level = Level::default();

        for entry in &self.entries {
            let remainder = if prefix.is_empty() {
                entry.as_str()
            } else {
                match entry
                    .strip_prefix(prefix.as_str())
                    .and_then(|rest| rest.strip_prefix('/'))
                {
                    Some(rest) => rest,
                    None => continue,
                }
            };

            match remainder.split_once('/') {
                Some((dir, _)) => {
                    if !dir.is_empty() && seen_dirs.insert(dir) {
                        level.directories.push(dir.to_string());
                    }
                }
                None => {
                    if !remainder.is_empty() && seen_files.insert(remainder) {
                        level.files.push(remainder.to_string());
                    }
                }
            }
        }

        level.files.retain(|file| {
            let clash = seen_dirs.contains(file.as_str());
            if clash {
                tracing::debug!(name = %file, "file shadowed by directory of the same name");
            }
            !clash
        });
        level
    }
}

/// Where the graph gets its per-level contents from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum NodeSource {
    Index(FileIndex),
    /// No usable file list; show the placeholder structure
    #[default]
    Sample,
}

impl NodeSource {
    /// Source for an analysis `file_structure` field. Missing or blank falls back to the sample.
    pub fn from_file_structure(file_structure: Option<&str>) -> Self {
        match file_structure.map(FileIndex::parse) {
            Some(index) if !index.is_empty() => NodeSource::Index(index),
            _ => NodeSource::Sample,
        }
    }

    pub fn from_index(index: FileIndex) -> Self {
        if index.is_empty() {
            NodeSource::Sample
        } else {
            NodeSource::Index(index)
        }
    }

    pub fn is_sample(&self) -> bool {
        matches!(self, NodeSource::Sample)
    }

    pub fn file_count(&self) -> usize {
        match self {
            NodeSource::Index(index) => index.len(),
            NodeSource::Sample => 0,
        }
    }

    pub fn level(&self, path: &TreePath) -> Level {
        match self {
            NodeSource::Index(index) => index.level(path),
            NodeSource::Sample => SampleTree::builtin().level(path),
        }
    }
}
