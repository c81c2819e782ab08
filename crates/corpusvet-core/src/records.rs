//! Record store: joins a task's diff file against its ledger.
//!
//! The diff file is produced by the external classification pipeline and
//! is never invented or rewritten here; the store only augments each
//! record with its reviewed state from the ledger.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::classify::{self, DirKind};
use crate::ledger;

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("Not a task directory: {0}")]
    NotATask(String),
    #[error("Diff file is not a record array: {0}")]
    DiffFormat(String),
    #[error("Failed to read diff file: {0}")]
    Io(#[from] std::io::Error),
}

/// Reviewed state of one record, mirroring the ledger's `Yes`/`No` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CheckState {
    Yes,
    #[default]
    No,
}

impl CheckState {
    pub fn from_checked(checked: bool) -> Self {
        if checked {
            CheckState::Yes
        } else {
            CheckState::No
        }
    }
}

/// One entry of `frontend_diff.json` as the pipeline writes it. Only
/// `filename` is required; the annotation payloads stay opaque.
#[derive(Debug, Deserialize)]
struct DiffRecord {
    filename: String,
    #[serde(default)]
    original_text: String,
    #[serde(default)]
    cleaned_body: String,
    #[serde(default)]
    highlights: Value,
    #[serde(default)]
    metadata: Value,
}

/// Per-record view model served to the review UI.
#[derive(Debug, Clone, Serialize)]
pub struct Record {
    pub id: String,
    pub original: String,
    pub cleaned: String,
    pub highlights: Value,
    pub metadata: Value,
    pub folder: String,
    pub checked: CheckState,
}

/// Load the records of a task in diff-file order (the human review order),
/// each joined with its ledger state. Records without a ledger row, or
/// with no ledger at all, default to unchecked.
pub fn load_records(dir: &Path) -> Result<Vec<Record>, RecordError> {
    let info = classify::classify(dir);
    if info.kind != DirKind::Task {
        return Err(RecordError::NotATask(dir.display().to_string()));
    }
    let diff_path = info.diff_path().ok_or_else(|| {
        RecordError::NotATask(dir.display().to_string())
    })?;

    let text = fs::read_to_string(&diff_path)?;
    let diff: Vec<DiffRecord> = serde_json::from_str(&text)
        .map_err(|err| RecordError::DiffFormat(err.to_string()))?;

    let checked = match info.ledger_path() {
        Some(path) => ledger::checked_map(&path),
        None => Default::default(),
    };

    let folder = dir
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_default();

    Ok(diff
        .into_iter()
        .map(|item| {
            let is_checked = checked.get(&item.filename).copied().unwrap_or(false);
            Record {
                id: item.filename,
                original: item.original_text,
                cleaned: item.cleaned_body,
                highlights: item.highlights,
                metadata: item.metadata,
                folder: folder.clone(),
                checked: CheckState::from_checked(is_checked),
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    use crate::{DIFF_FILENAME, LEDGER_FILENAME};

    fn write_diff(dir: &Path, records: Value) {
        fs::write(dir.join(DIFF_FILENAME), records.to_string()).expect("write diff");
    }

    #[test]
    fn records_come_back_in_diff_order() {
        let temp = TempDir::new().expect("tempdir");
        write_diff(
            temp.path(),
            json!([
                {"filename": "b.txt", "original_text": "raw b", "cleaned_body": "clean b"},
                {"filename": "a.txt", "original_text": "raw a", "cleaned_body": "clean a"},
            ]),
        );
        fs::write(
            temp.path().join(LEDGER_FILENAME),
            "Filename,Checked\na.txt,Yes",
        )
        .expect("write ledger");

        let records = load_records(temp.path()).expect("load");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, "b.txt");
        assert_eq!(records[0].checked, CheckState::No);
        assert_eq!(records[1].id, "a.txt");
        assert_eq!(records[1].checked, CheckState::Yes);
    }

    #[test]
    fn records_default_unchecked_without_ledger() {
        let temp = TempDir::new().expect("tempdir");
        write_diff(temp.path(), json!([{"filename": "a.txt"}]));

        let records = load_records(temp.path()).expect("load");
        assert_eq!(records[0].checked, CheckState::No);
        assert_eq!(records[0].original, "");
    }

    #[test]
    fn records_resolve_through_output_subdir() {
        let temp = TempDir::new().expect("tempdir");
        let output = temp.path().join("output");
        fs::create_dir_all(&output).expect("mkdir");
        write_diff(&output, json!([{"filename": "a.txt"}]));
        fs::write(output.join(LEDGER_FILENAME), "Filename,Checked\na.txt,Yes")
            .expect("write ledger");

        let records = load_records(temp.path()).expect("load");
        assert_eq!(records[0].checked, CheckState::Yes);
        // `folder` names the query directory, not the resolved one.
        assert_eq!(
            records[0].folder,
            temp.path().file_name().unwrap().to_string_lossy()
        );
    }

    #[test]
    fn non_task_directory_is_an_error() {
        let temp = TempDir::new().expect("tempdir");
        assert!(matches!(
            load_records(temp.path()),
            Err(RecordError::NotATask(_))
        ));
    }

    #[test]
    fn malformed_diff_is_a_format_error() {
        let temp = TempDir::new().expect("tempdir");
        fs::write(temp.path().join(DIFF_FILENAME), "{\"not\": \"an array\"}")
            .expect("write diff");
        assert!(matches!(
            load_records(temp.path()),
            Err(RecordError::DiffFormat(_))
        ));
    }

    #[test]
    fn record_missing_filename_is_a_format_error() {
        let temp = TempDir::new().expect("tempdir");
        write_diff(temp.path(), json!([{"original_text": "raw"}]));
        assert!(matches!(
            load_records(temp.path()),
            Err(RecordError::DiffFormat(_))
        ));
    }
}
