//! Task/Container classification over the review directory tree.
//!
//! Classification is a pure function of on-disk state at query time: a
//! directory is a Task when it owns a diff file (directly or inside an
//! `output` subdirectory), a Container when at least one child classifies
//! as Task or Container, and Neither otherwise. Container progress is
//! always derived, never stored.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::ledger::{self, LedgerStats};
use crate::{DIFF_FILENAME, LEDGER_FILENAME};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirKind {
    Task,
    Container,
    Neither,
}

#[derive(Debug, Clone)]
pub struct Classification {
    pub kind: DirKind,
    /// The physical directory holding the diff file and ledger. Only set
    /// for Tasks; this may be the `output` subdirectory of the query path.
    pub resolved_dir: Option<PathBuf>,
    /// Ledger-derived stats for Tasks, roll-up stats for Containers.
    pub stats: Option<LedgerStats>,
    /// The directory itself could not be read. Distinguishes "denied" from
    /// a genuinely empty directory, which otherwise classify identically.
    pub unreadable: bool,
}

impl Classification {
    fn neither(unreadable: bool) -> Self {
        Self {
            kind: DirKind::Neither,
            resolved_dir: None,
            stats: None,
            unreadable,
        }
    }

    pub fn is_task(&self) -> bool {
        self.kind == DirKind::Task
    }

    pub fn is_container(&self) -> bool {
        self.kind == DirKind::Container
    }

    /// Whether this directory counts as one completed unit toward a parent
    /// Container roll-up.
    fn is_complete(&self) -> bool {
        self.stats.map(|s| s.is_complete()).unwrap_or(false)
    }

    /// Path to this Task's ledger file. None for non-Tasks.
    pub fn ledger_path(&self) -> Option<PathBuf> {
        self.resolved_dir.as_ref().map(|dir| dir.join(LEDGER_FILENAME))
    }

    /// Path to this Task's diff file. None for non-Tasks.
    pub fn diff_path(&self) -> Option<PathBuf> {
        self.resolved_dir.as_ref().map(|dir| dir.join(DIFF_FILENAME))
    }
}

/// One child directory in a listing.
#[derive(Debug, Clone, Serialize)]
pub struct DirEntry {
    pub name: String,
    pub path: String,
    #[serde(rename = "isTask")]
    pub is_task: bool,
    #[serde(rename = "isContainer")]
    pub is_container: bool,
    pub progress: LedgerStats,
    pub unreadable: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct DirListing {
    pub items: Vec<DirEntry>,
    pub parent: Option<String>,
}

/// Classify a directory as Task, Container, or Neither.
pub fn classify(dir: &Path) -> Classification {
    if let Some(resolved) = resolve_task_dir(dir) {
        let stats = ledger::stats_for(&resolved.join(LEDGER_FILENAME));
        return Classification {
            kind: DirKind::Task,
            resolved_dir: Some(resolved),
            stats: Some(stats),
            unreadable: false,
        };
    }

    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) => {
            tracing::warn!(path = %dir.display(), %err, "directory unreadable, excluded from counts");
            return Classification::neither(true);
        }
    };

    let mut total = 0usize;
    let mut completed = 0usize;
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                tracing::warn!(path = %dir.display(), %err, "skipping unreadable entry");
                continue;
            }
        };
        let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
        if !is_dir {
            continue;
        }
        let child = classify(&entry.path());
        if child.kind == DirKind::Neither {
            continue;
        }
        total += 1;
        if child.is_complete() {
            completed += 1;
        }
    }

    if total == 0 {
        return Classification::neither(false);
    }
    Classification {
        kind: DirKind::Container,
        resolved_dir: None,
        stats: Some(LedgerStats::new(total, completed)),
        unreadable: false,
    }
}

/// Resolve the physical task directory: the query path itself when it holds
/// the diff file, else its `output` subdirectory.
pub fn resolve_task_dir(dir: &Path) -> Option<PathBuf> {
    if dir.join(DIFF_FILENAME).is_file() {
        return Some(dir.to_path_buf());
    }
    let output = dir.join("output");
    if output.join(DIFF_FILENAME).is_file() {
        return Some(output);
    }
    None
}

/// List the immediate subdirectories of `path` with their classifications.
/// A missing or unreadable path yields an empty listing rather than an
/// error; review dashboards prefer partial results to hard failures.
pub fn list_directory(path: &Path) -> DirListing {
    let parent = path
        .parent()
        .filter(|p| *p != path && !p.as_os_str().is_empty())
        .map(|p| p.to_string_lossy().to_string());

    let entries = match fs::read_dir(path) {
        Ok(entries) => entries,
        Err(err) => {
            tracing::warn!(path = %path.display(), %err, "listing failed");
            return DirListing {
                items: Vec::new(),
                parent: None,
            };
        }
    };

    let mut items = Vec::new();
    for entry in entries.flatten() {
        let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
        if !is_dir {
            continue;
        }
        let full_path = entry.path();
        let info = classify(&full_path);
        items.push(DirEntry {
            name: entry.file_name().to_string_lossy().to_string(),
            path: full_path.to_string_lossy().to_string(),
            is_task: info.is_task(),
            is_container: info.is_container(),
            progress: info.stats.unwrap_or_default(),
            unreadable: info.unreadable,
        });
    }
    items.sort_by(|a, b| a.name.cmp(&b.name));

    DirListing { items, parent }
}
