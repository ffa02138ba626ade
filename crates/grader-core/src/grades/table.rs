use super::progress::Progress;
use super::record::{GradeRecord, GradeView};

/// In-memory grade table. Holds at most one row per `trace_id`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GradeTable {
    rows: Vec<GradeRecord>,
}

impl GradeTable {
    /// Column order of the backing file.
    pub const COLUMNS: [&'static str; 4] = ["trace_id", "grade", "comment", "graded_at"];

    pub fn new() -> Self {
        Self::default()
    }

    /// Caller guarantees `rows` has unique `trace_id`s.
    pub(crate) fn from_rows(rows: Vec<GradeRecord>) -> Self {
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, GradeRecord> {
        self.rows.iter()
    }

    pub fn records(&self) -> &[GradeRecord] {
        &self.rows
    }

    pub fn get(&self, trace_id: &str) -> Option<&GradeRecord> {
        self.rows.iter().find(|r| r.trace_id == trace_id)
    }

    /// Current grade and comment for `trace_id`, empty strings when absent.
    pub fn lookup(&self, trace_id: &str) -> GradeView {
        self.get(trace_id)
            .map(|r| GradeView {
                grade: r.grade.clone(),
                comment: r.comment.clone(),
            })
            .unwrap_or_default()
    }

    /// Drop any row for the record's `trace_id`, then append the record.
    pub fn upsert(&mut self, record: GradeRecord) {
        self.rows.retain(|r| r.trace_id != record.trace_id);
        self.rows.push(record);
    }

    pub fn progress(&self) -> Progress {
        Progress::of(self)
    }
}

impl<'a> IntoIterator for &'a GradeTable {
    type Item = &'a GradeRecord;
    type IntoIter = std::slice::Iter<'a, GradeRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grades::Grade;
    use chrono::Utc;

    #[test]
    fn upsert_replaces_and_moves_row_to_end() {
        let mut table = GradeTable::new();
        table.upsert(GradeRecord::new("a", Grade::Pass, "first", Utc::now()));
        table.upsert(GradeRecord::new("b", Grade::Pass, "", Utc::now()));
        table.upsert(GradeRecord::new("a", Grade::Fail, "second", Utc::now()));

        assert_eq!(table.len(), 2);
        let ids: Vec<_> = table.iter().map(|r| r.trace_id.as_str()).collect();
        assert_eq!(ids, ["b", "a"]);
        assert_eq!(table.get("a").unwrap().comment, "second");
    }

    #[test]
    fn lookup_of_missing_trace_is_empty() {
        let table = GradeTable::new();
        assert_eq!(table.lookup("nope"), GradeView::default());
    }
}
