//! CSV-backed grade store.
//!
//! Every save is a full read-modify-write: load the table, replace the row for
//! the trace, and atomically swap in a freshly written file. Table size is
//! bounded by the corpus. No locking: one reviewer process per file.

use std::collections::HashSet;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::{debug, info, warn};

use super::record::{Grade, GradeRecord};
use super::table::GradeTable;
use crate::error::{GraderError, GraderResult};

#[derive(Debug, Clone)]
pub struct GradeStore {
    path: PathBuf,
}

impl GradeStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the table. A missing or zero-length file is an empty table; the
    /// file is never created here.
    pub fn load(&self) -> GraderResult<GradeTable> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "grade store absent, starting empty");
                return Ok(GradeTable::new());
            }
            Err(e) => return Err(GraderError::store_io(&self.path, e)),
        };
        if bytes.is_empty() {
            return Ok(GradeTable::new());
        }

        let table = decode(&bytes).map_err(|reason| GraderError::corrupt_store(&self.path, reason))?;
        debug!(path = %self.path.display(), rows = table.len(), "loaded grade store");
        Ok(table)
    }

    /// Upsert the verdict for `trace_id` and return the updated table.
    ///
    /// On any failure the file on disk keeps its previous contents.
    pub fn save(&self, trace_id: &str, grade: Grade, comment: &str) -> GraderResult<GradeTable> {
        if trace_id.trim().is_empty() {
            return Err(GraderError::validation("trace_id must not be empty"));
        }
        let now = Utc::now();

        let mut table = self.load()?;
        table.upsert(GradeRecord::new(trace_id, grade, comment, now));

        let bytes = encode(&table).map_err(|e| GraderError::store_io(&self.path, e))?;
        write_file_atomic(&self.path, &bytes).map_err(|e| GraderError::store_io(&self.path, e))?;

        info!(
            path = %self.path.display(),
            trace_id,
            grade = %grade,
            rows = table.len(),
            "saved grade"
        );
        Ok(table)
    }
}

fn decode(bytes: &[u8]) -> Result<GradeTable, String> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(bytes);

    let headers = reader
        .headers()
        .map_err(|e| format!("unreadable header: {e}"))?
        .clone();
    let columns = column_positions(&headers)?;

    let mut seen = HashSet::new();
    let mut rows = Vec::new();
    for (n, result) in reader.records().enumerate() {
        let line = n + 2;
        let record = result.map_err(|e| format!("row at line {line}: {e}"))?;
        let field = |col: usize| record.get(columns[col]).unwrap_or_default().to_string();

        let row = GradeRecord {
            trace_id: field(0),
            grade: field(1),
            comment: field(2),
            graded_at: field(3),
        };
        if row.trace_id.is_empty() {
            return Err(format!("row at line {line} has an empty trace_id"));
        }
        if !seen.insert(row.trace_id.clone()) {
            return Err(format!(
                "duplicate rows for trace_id '{}' (line {line})",
                row.trace_id
            ));
        }
        if row.is_graded() && row.verdict().is_none() {
            warn!(trace_id = %row.trace_id, grade = %row.grade, "grade outside pass/fail");
        }
        rows.push(row);
    }

    Ok(GradeTable::from_rows(rows))
}

/// Index of each schema column in the file header, in schema order.
fn column_positions(headers: &csv::StringRecord) -> Result<[usize; 4], String> {
    let mut positions = [usize::MAX; 4];
    for (idx, name) in headers.iter().enumerate() {
        let Some(col) = GradeTable::COLUMNS.iter().position(|c| *c == name) else {
            return Err(format!("unexpected column '{name}'"));
        };
        if positions[col] != usize::MAX {
            return Err(format!("column '{name}' appears more than once"));
        }
        positions[col] = idx;
    }
    for (col, pos) in positions.iter().enumerate() {
        if *pos == usize::MAX {
            return Err(format!("missing column '{}'", GradeTable::COLUMNS[col]));
        }
    }
    Ok(positions)
}

fn encode(table: &GradeTable) -> io::Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(GradeTable::COLUMNS)?;
    for row in table {
        writer.write_record([&row.trace_id, &row.grade, &row.comment, &row.graded_at])?;
    }
    writer
        .into_inner()
        .map_err(|e| io::Error::other(e.to_string()))
}

/// Write to a sibling temp file, sync it, then rename over `path`.
fn write_file_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let parent = path.parent().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("path has no parent: {}", path.display()),
        )
    })?;
    let base = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("path has no filename: {}", path.display()),
            )
        })?;

    let stamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    let tmp_path = parent.join(format!(".{}.tmp-{}-{}", base, std::process::id(), stamp));

    let written = std::fs::File::create(&tmp_path).and_then(|mut file| {
        file.write_all(bytes)?;
        file.sync_all()
    });
    if let Err(err) = written {
        let _ = std::fs::remove_file(&tmp_path);
        return Err(err);
    }
    if let Err(err) = std::fs::rename(&tmp_path, path) {
        let _ = std::fs::remove_file(&tmp_path);
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_may_list_columns_in_any_order() {
        let csv = "grade,trace_id,graded_at,comment\npass,t1,2026-01-01T00:00:00+00:00,ok\n";
        let table = decode(csv.as_bytes()).unwrap();
        let row = table.get("t1").unwrap();
        assert_eq!(row.grade, "pass");
        assert_eq!(row.comment, "ok");
    }

    #[test]
    fn header_only_file_is_an_empty_table() {
        let table = decode(b"trace_id,grade,comment,graded_at\n").unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn rejects_extra_and_duplicate_columns() {
        let extra = decode(b"trace_id,grade,comment,graded_at,score\n").unwrap_err();
        assert!(extra.contains("unexpected column 'score'"), "{extra}");

        let dup = decode(b"trace_id,grade,grade,graded_at\n").unwrap_err();
        assert!(dup.contains("more than once"), "{dup}");
    }

    #[test]
    fn rejects_short_rows() {
        let err = decode(b"trace_id,grade,comment,graded_at\nt1,pass\n").unwrap_err();
        assert!(err.contains("line 2"), "{err}");
    }

    #[test]
    fn encode_quotes_commas_and_newlines() {
        let mut table = GradeTable::new();
        table.upsert(GradeRecord::new(
            "t1",
            Grade::Fail,
            "too pushy, and\nignored the question",
            Utc::now(),
        ));
        let bytes = encode(&table).unwrap();
        let text = String::from_utf8(bytes.clone()).unwrap();
        assert!(text.starts_with("trace_id,grade,comment,graded_at\n"));
        assert!(text.contains("\"too pushy, and\nignored the question\""));

        assert_eq!(decode(&bytes).unwrap(), table);
    }

    #[test]
    fn atomic_write_replaces_contents_without_leftovers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grades.csv");
        std::fs::write(&path, b"old").unwrap();

        write_file_atomic(&path, b"new").unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"new");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn empty_table_still_writes_header() {
        let bytes = encode(&GradeTable::new()).unwrap();
        assert_eq!(bytes, b"trace_id,grade,comment,graded_at\n");
    }
}
