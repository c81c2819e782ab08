//! Ledger mutations: set a record's reviewed state, remove a record's row,
//! write record content.
//!
//! Every mutation is a whole-file read-modify-write of the ledger. Two
//! concurrent mutations against the same ledger would lose the first write,
//! so mutations serialize on a per-ledger lock keyed by the canonicalized
//! path, held from read through write. Reads never take the lock; stats are
//! advisory and may be one mutation stale.
//!
//! Untouched lines are carried verbatim: only the row actually edited goes
//! back through the quoting rule, so unrelated columns and quoting survive
//! byte-for-byte.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use once_cell::sync::Lazy;
use thiserror::Error;

use crate::classify;
use crate::ledger::{self, CHECKED_YES};

#[derive(Debug, Error)]
pub enum MutateError {
    #[error("Not a task directory: {0}")]
    NotATask(String),
    #[error("No ledger file to edit")]
    LedgerNotFound,
    #[error("Ledger has no recognizable header row")]
    LedgerFormat,
    #[error("Invalid record filename: {0}")]
    InvalidFilename(String),
    #[error("Ledger IO error: {0}")]
    Io(#[from] std::io::Error),
}

static LEDGER_LOCKS: Lazy<Mutex<HashMap<PathBuf, Arc<Mutex<()>>>>> =
    Lazy::new(Mutex::default);

/// The serialization lock for a ledger path. Keyed by the canonicalized
/// path so the same file reached through different spellings shares one
/// lock; a path that cannot be canonicalized (not created yet) keys as-is.
pub fn ledger_lock(path: &Path) -> Arc<Mutex<()>> {
    let key = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
    let mut locks = LEDGER_LOCKS
        .lock()
        .unwrap_or_else(PoisonError::into_inner);
    locks.entry(key).or_default().clone()
}

/// Set the `Checked` column of the first row matching `filename`.
///
/// Returns the normalized status (trimmed; empty or absent means `Yes`).
/// Missing ledger, unrecognized header, and unmatched filename are all
/// silent successes: the ledger simply has nothing to update yet.
pub fn set_checked(
    dir: &Path,
    filename: &str,
    status: Option<&str>,
) -> Result<String, MutateError> {
    validate_filename(filename)?;
    let ledger_path = resolve_ledger_path(dir)?;
    let status = normalize_status(status);

    let lock = ledger_lock(&ledger_path);
    let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

    if !ledger_path.exists() {
        return Ok(status);
    }
    let text = fs::read_to_string(&ledger_path)?;
    let lines = split_lines(&text);
    let Some(pos) = ledger::find_header(&lines) else {
        return Ok(status);
    };

    let mut out: Vec<String> = lines.iter().map(|line| line.to_string()).collect();
    for (idx, line) in lines.iter().enumerate().skip(pos.line + 1) {
        if line.trim().is_empty() {
            continue;
        }
        let mut cols = ledger::split_line(line);
        if cols.get(pos.filename_col).map(String::as_str) != Some(filename) {
            continue;
        }
        // First match wins; duplicate filenames keep their later rows as-is.
        while cols.len() <= pos.checked_col {
            cols.push(String::new());
        }
        cols[pos.checked_col] = status.clone();
        out[idx] = ledger::join_line(&cols);
        fs::write(&ledger_path, out.join("\n"))?;
        break;
    }
    Ok(status)
}

/// Remove the first row matching `filename`. The header and every line
/// above it are always retained; blank data lines are dropped.
pub fn remove_row(dir: &Path, filename: &str) -> Result<(), MutateError> {
    validate_filename(filename)?;
    let ledger_path = resolve_ledger_path(dir)?;

    let lock = ledger_lock(&ledger_path);
    let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

    if !ledger_path.exists() {
        return Err(MutateError::LedgerNotFound);
    }
    let text = fs::read_to_string(&ledger_path)?;
    let lines = split_lines(&text);
    let pos = ledger::find_header(&lines).ok_or(MutateError::LedgerFormat)?;

    let mut removed = false;
    let mut out: Vec<&str> = Vec::with_capacity(lines.len());
    for (idx, line) in lines.iter().enumerate() {
        if idx <= pos.line {
            out.push(line);
            continue;
        }
        if line.trim().is_empty() {
            continue;
        }
        if !removed {
            let cols = ledger::split_line(line);
            if cols.get(pos.filename_col).map(String::as_str) == Some(filename) {
                removed = true;
                continue;
            }
        }
        out.push(line);
    }
    fs::write(&ledger_path, out.join("\n"))?;
    Ok(())
}

/// Write record content verbatim into the resolved task directory. The
/// content format is an external contract; nothing is validated beyond the
/// filename staying inside the task directory.
pub fn write_record_content(
    dir: &Path,
    filename: &str,
    content: &str,
) -> Result<PathBuf, MutateError> {
    validate_filename(filename)?;
    let info = classify::classify(dir);
    let resolved = info
        .resolved_dir
        .ok_or_else(|| MutateError::NotATask(dir.display().to_string()))?;
    let target = resolved.join(filename);
    fs::write(&target, content)?;
    Ok(target)
}

fn resolve_ledger_path(dir: &Path) -> Result<PathBuf, MutateError> {
    let info = classify::classify(dir);
    info.ledger_path()
        .ok_or_else(|| MutateError::NotATask(dir.display().to_string()))
}

fn normalize_status(status: Option<&str>) -> String {
    match status.map(str::trim).filter(|s| !s.is_empty()) {
        Some(status) => status.to_string(),
        None => CHECKED_YES.to_string(),
    }
}

fn validate_filename(filename: &str) -> Result<(), MutateError> {
    let suspicious = filename.is_empty()
        || filename.contains('/')
        || filename.contains('\\')
        || filename == "."
        || filename == "..";
    if suspicious {
        return Err(MutateError::InvalidFilename(filename.to_string()));
    }
    Ok(())
}

/// Split on `\r?\n`, tolerating a leading BOM. The rewrite joins with `\n`
/// and never restores either.
fn split_lines(text: &str) -> Vec<&str> {
    ledger::strip_bom(text)
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect()
}
