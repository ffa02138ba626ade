//! Reviewer session context.
//!
//! A session is created when a reviewer starts working and dropped when they
//! stop. It owns the navigation cursor and a cached copy of the grade table;
//! the cache is replaced by the store's return value after every save.

use crate::error::{GraderError, GraderResult};
use crate::grades::{Grade, GradeStore, GradeTable, GradeView, Progress};
use crate::transcript::Transcript;

#[derive(Debug)]
pub struct ReviewSession<'a> {
    transcripts: &'a [Transcript],
    store: &'a GradeStore,
    current: usize,
    grades: GradeTable,
}

impl<'a> ReviewSession<'a> {
    pub fn open(transcripts: &'a [Transcript], store: &'a GradeStore) -> GraderResult<Self> {
        let grades = store.load()?;
        Ok(Self {
            transcripts,
            store,
            current: 0,
            grades,
        })
    }

    pub fn transcripts(&self) -> &'a [Transcript] {
        self.transcripts
    }

    pub fn len(&self) -> usize {
        self.transcripts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transcripts.is_empty()
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current(&self) -> Option<&'a Transcript> {
        self.transcripts.get(self.current)
    }

    /// Move to the next transcript. Returns false at the end of the corpus.
    pub fn next(&mut self) -> bool {
        if self.current + 1 >= self.len() {
            return false;
        }
        self.current += 1;
        true
    }

    /// Move to the previous transcript. Returns false at the start.
    pub fn prev(&mut self) -> bool {
        if self.current == 0 {
            return false;
        }
        self.current -= 1;
        true
    }

    /// Jump to `index`. Out-of-range indices leave the cursor unchanged.
    pub fn jump(&mut self, index: usize) -> bool {
        if index >= self.len() {
            return false;
        }
        self.current = index;
        true
    }

    pub fn jump_to(&mut self, trace_id: &str) -> GraderResult<()> {
        let index = self
            .transcripts
            .iter()
            .position(|t| t.id == trace_id)
            .ok_or_else(|| GraderError::UnknownTrace {
                trace_id: trace_id.to_string(),
            })?;
        self.current = index;
        Ok(())
    }

    pub fn grade_of(&self, trace_id: &str) -> GradeView {
        self.grades.lookup(trace_id)
    }

    pub fn current_grade(&self) -> GradeView {
        self.current()
            .map(|t| self.grades.lookup(&t.id))
            .unwrap_or_default()
    }

    /// Save the reviewer's verdict for the current transcript.
    ///
    /// No selection is a `Validation` error and the store is not touched. If
    /// the store fails, the cached table is left as it was.
    pub fn save_current(&mut self, selection: Option<Grade>, comment: &str) -> GraderResult<&GradeTable> {
        let grade = selection
            .ok_or_else(|| GraderError::validation("select pass or fail before saving"))?;
        let trace_id = match self.current() {
            Some(t) => t.id.as_str(),
            None => return Err(GraderError::validation("no transcript selected")),
        };

        self.grades = self.store.save(trace_id, grade, comment)?;
        Ok(&self.grades)
    }

    /// Reload the cached table from the store.
    pub fn refresh(&mut self) -> GraderResult<()> {
        self.grades = self.store.load()?;
        Ok(())
    }

    pub fn table(&self) -> &GradeTable {
        &self.grades
    }

    /// Progress over the rows of the grade store.
    pub fn table_progress(&self) -> Progress {
        self.grades.progress()
    }

    /// Progress over the corpus: every transcript counts, graded or not.
    ///
    /// Only a stored `pass` or `fail` marks a transcript as graded here; any
    /// other value leaves it to do.
    pub fn corpus_progress(&self) -> Progress {
        Progress::from_grades(self.transcripts.iter().map(|t| {
            self.grades
                .get(&t.id)
                .map(|r| r.grade.as_str())
                .filter(|g| *g == Grade::Pass.as_str() || *g == Grade::Fail.as_str())
                .unwrap_or("")
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcript::TranscriptSource;

    fn corpus() -> TranscriptSource {
        let json = r#"[
            {"trace_id": "t1", "scenario": "a", "turns": [{"role": "user", "content": "hi"}]},
            {"trace_id": "t2", "scenario": "b", "turns": [{"role": "user", "content": "hi"}]},
            {"trace_id": "t3", "scenario": "c", "turns": [{"role": "user", "content": "hi"}]}
        ]"#;
        TranscriptSource::from_json_str(json, "inline").unwrap()
    }

    #[test]
    fn navigation_clamps_at_both_ends() {
        let dir = tempfile::tempdir().unwrap();
        let src = corpus();
        let store = GradeStore::new(dir.path().join("grades.csv"));
        let mut session = ReviewSession::open(src.transcripts(), &store).unwrap();

        assert!(!session.prev());
        assert!(session.next());
        assert!(session.next());
        assert!(!session.next());
        assert_eq!(session.current().unwrap().id, "t3");

        assert!(!session.jump(3));
        assert!(session.jump(0));
        session.jump_to("t2").unwrap();
        assert_eq!(session.current_index(), 1);
        assert!(matches!(
            session.jump_to("t9"),
            Err(GraderError::UnknownTrace { .. })
        ));
    }

    #[test]
    fn save_without_selection_leaves_store_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grades.csv");
        let src = corpus();
        let store = GradeStore::new(&path);
        let mut session = ReviewSession::open(src.transcripts(), &store).unwrap();

        let err = session.save_current(None, "comment").unwrap_err();
        assert!(matches!(err, GraderError::Validation { .. }));
        assert!(!path.exists());
        assert!(session.table().is_empty());
    }

    #[test]
    fn corpus_progress_counts_unsaved_transcripts() {
        let dir = tempfile::tempdir().unwrap();
        let src = corpus();
        let store = GradeStore::new(dir.path().join("grades.csv"));
        let mut session = ReviewSession::open(src.transcripts(), &store).unwrap();

        session.save_current(Some(Grade::Pass), "").unwrap();
        session.next();
        session.save_current(Some(Grade::Fail), "rude").unwrap();

        let table = session.table_progress();
        assert_eq!((table.total, table.graded), (2, 2));

        let corpus = session.corpus_progress();
        assert_eq!(corpus.total, 3);
        assert_eq!(corpus.graded, 2);
        assert_eq!(corpus.ungraded, 1);
        assert_eq!(session.current_grade().comment, "rude");
    }

    #[test]
    fn corpus_progress_leaves_foreign_grades_to_do() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grades.csv");
        std::fs::write(
            &path,
            "trace_id,grade,comment,graded_at\nt1,skip,,x\nt2,PASS,,x\n",
        )
        .unwrap();
        let src = corpus();
        let store = GradeStore::new(&path);
        let session = ReviewSession::open(src.transcripts(), &store).unwrap();

        let corpus = session.corpus_progress();
        assert_eq!((corpus.total, corpus.graded, corpus.ungraded), (3, 0, 3));
        assert_eq!((corpus.passed, corpus.failed), (0, 0));

        // The store view still counts any non-empty grade.
        assert_eq!(session.table_progress().graded, 2);
    }
}
