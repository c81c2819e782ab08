//! CSV progress-ledger codec.
//!
//! The ledger is a small CSV file (`progress_log.csv`) with at least a
//! `Filename` and a `Checked` column. The header is not assumed to sit on
//! the first line: pipeline runs have been seen to prepend run metadata, so
//! the header is located by scanning the first few non-empty lines. All
//! other columns are opaque and preserved across rewrites.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Serialize;
use thiserror::Error;

/// How many non-empty lines are scanned when locating the header row.
pub const HEADER_SCAN_WINDOW: usize = 5;

/// The value in the `Checked` column that marks a record reviewed.
/// Comparison is exact and case-sensitive.
pub const CHECKED_YES: &str = "Yes";

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Ledger has no recognizable header row")]
    Format,
    #[error("Ledger file not found")]
    NotFound,
    #[error("Failed to read ledger: {0}")]
    Io(#[from] std::io::Error),
}

/// A parsed ledger: the header row plus every non-empty data row below it.
/// Lines above the header are dropped by the structured parse; the mutator
/// works line-wise instead so it can keep them verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ledger {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Ledger {
    /// Column index of an exact header name.
    pub fn column(&self, name: &str) -> Option<usize> {
        self.header.iter().position(|h| h == name)
    }
}

/// Position of the header row within the raw line list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderPosition {
    pub line: usize,
    pub filename_col: usize,
    pub checked_col: usize,
}

/// Per-ledger completion stats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LedgerStats {
    pub total: usize,
    pub checked: usize,
    pub percent: u32,
}

impl LedgerStats {
    pub fn new(total: usize, checked: usize) -> Self {
        let percent = if total > 0 {
            ((checked as f64 / total as f64) * 100.0).round() as u32
        } else {
            0
        };
        Self {
            total,
            checked,
            percent,
        }
    }

    /// A task counts as complete only when it has records and all of them
    /// are checked; 0/0 is "no progress recorded", never "done".
    pub fn is_complete(&self) -> bool {
        self.total > 0 && self.checked == self.total
    }
}

/// Strip a leading UTF-8 byte-order-mark.
pub fn strip_bom(text: &str) -> &str {
    text.strip_prefix('\u{feff}').unwrap_or(text)
}

/// Split one CSV line into fields. Commas inside double-quoted segments are
/// literal; a doubled quote inside a quoted segment unescapes to one quote;
/// whitespace outside quotes is trimmed from both ends of each field.
pub fn split_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut buf: Vec<(char, bool)> = Vec::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' => {
                if in_quotes && chars.peek() == Some(&'"') {
                    chars.next();
                    buf.push(('"', true));
                } else {
                    in_quotes = !in_quotes;
                }
            }
            ',' if !in_quotes => {
                fields.push(take_field(&buf));
                buf.clear();
            }
            _ => buf.push((ch, in_quotes)),
        }
    }
    fields.push(take_field(&buf));
    fields
}

fn take_field(buf: &[(char, bool)]) -> String {
    // Trim only characters that sat outside quotes.
    let start = buf
        .iter()
        .position(|&(c, quoted)| quoted || !c.is_whitespace())
        .unwrap_or(buf.len());
    let end = buf
        .iter()
        .rposition(|&(c, quoted)| quoted || !c.is_whitespace())
        .map(|i| i + 1)
        .unwrap_or(start);
    buf[start..end].iter().map(|&(c, _)| c).collect()
}

/// Re-quote a field for output: fields containing a comma or a quote are
/// wrapped in double quotes with internal quotes doubled, everything else
/// is written bare.
pub fn quote_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Join fields back into one CSV line through the quoting rule.
pub fn join_line(fields: &[String]) -> String {
    fields
        .iter()
        .map(|field| quote_field(field))
        .collect::<Vec<_>>()
        .join(",")
}

/// Locate the header row: the first of the first `HEADER_SCAN_WINDOW`
/// non-empty lines containing both a `Filename` and a `Checked` column.
pub fn find_header(lines: &[&str]) -> Option<HeaderPosition> {
    let mut scanned = 0;
    for (idx, line) in lines.iter().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        if scanned >= HEADER_SCAN_WINDOW {
            break;
        }
        scanned += 1;
        let cols = split_line(line);
        let filename_col = cols.iter().position(|c| c == "Filename");
        let checked_col = cols.iter().position(|c| c == "Checked");
        if let (Some(filename_col), Some(checked_col)) = (filename_col, checked_col) {
            return Some(HeaderPosition {
                line: idx,
                filename_col,
                checked_col,
            });
        }
    }
    None
}

/// Parse ledger text into header and data rows.
pub fn parse(text: &str) -> Result<Ledger, LedgerError> {
    let text = strip_bom(text);
    let lines: Vec<&str> = text.lines().collect();
    let pos = find_header(&lines).ok_or(LedgerError::Format)?;
    let header = split_line(lines[pos.line]);
    let rows = lines[pos.line + 1..]
        .iter()
        .filter(|line| !line.trim().is_empty())
        .map(|line| split_line(line))
        .collect();
    Ok(Ledger { header, rows })
}

/// Serialize a ledger back to text: header then rows, `\n`-joined, no
/// trailing newline, no BOM.
pub fn serialize(ledger: &Ledger) -> String {
    let mut lines = Vec::with_capacity(ledger.rows.len() + 1);
    lines.push(join_line(&ledger.header));
    for row in &ledger.rows {
        lines.push(join_line(row));
    }
    lines.join("\n")
}

/// Load and parse a ledger file.
pub fn load(path: &Path) -> Result<Ledger, LedgerError> {
    if !path.exists() {
        return Err(LedgerError::NotFound);
    }
    let text = fs::read_to_string(path)?;
    parse(&text)
}

/// Completion stats for a ledger file. A missing or malformed ledger
/// degrades to zero stats rather than failing the surrounding listing.
pub fn stats_for(path: &Path) -> LedgerStats {
    let ledger = match load(path) {
        Ok(ledger) => ledger,
        Err(LedgerError::NotFound) => return LedgerStats::default(),
        Err(err) => {
            tracing::debug!(path = %path.display(), %err, "ledger degraded to zero stats");
            return LedgerStats::default();
        }
    };
    let checked_col = match ledger.column("Checked") {
        Some(col) => col,
        None => return LedgerStats::default(),
    };
    let checked = ledger
        .rows
        .iter()
        .filter(|row| row.get(checked_col).map(String::as_str) == Some(CHECKED_YES))
        .count();
    LedgerStats::new(ledger.rows.len(), checked)
}

/// Filename -> reviewed? map for joining records against the ledger.
/// First occurrence of a duplicate filename wins. A missing or malformed
/// ledger yields an empty map.
pub fn checked_map(path: &Path) -> HashMap<String, bool> {
    let ledger = match load(path) {
        Ok(ledger) => ledger,
        Err(_) => return HashMap::new(),
    };
    let (filename_col, checked_col) = match (ledger.column("Filename"), ledger.column("Checked")) {
        (Some(f), Some(c)) => (f, c),
        _ => return HashMap::new(),
    };
    let mut map = HashMap::new();
    for row in &ledger.rows {
        let Some(filename) = row.get(filename_col).filter(|f| !f.is_empty()) else {
            continue;
        };
        let is_checked = row.get(checked_col).map(String::as_str) == Some(CHECKED_YES);
        map.entry(filename.clone()).or_insert(is_checked);
    }
    map
}
