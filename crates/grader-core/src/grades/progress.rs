use serde::Serialize;

use super::record::Grade;
use super::table::GradeTable;

/// Grading progress counts.
///
/// `passed + failed <= graded <= total` and `ungraded == total - graded`
/// hold for every value built here.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub total: usize,
    pub graded: usize,
    pub passed: usize,
    pub failed: usize,
    pub ungraded: usize,
}

impl Progress {
    /// Progress over the rows of a grade table.
    pub fn of(table: &GradeTable) -> Self {
        Self::from_grades(table.iter().map(|r| r.grade.as_str()))
    }

    /// Progress over any sequence of stored grade strings. Empty means ungraded.
    pub fn from_grades<'a, I>(grades: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut p = Self::default();
        for grade in grades {
            p.total += 1;
            if grade.is_empty() {
                continue;
            }
            p.graded += 1;
            if grade == Grade::Pass.as_str() {
                p.passed += 1;
            } else if grade == Grade::Fail.as_str() {
                p.failed += 1;
            }
        }
        p.ungraded = p.total - p.graded;
        p
    }

    /// Share of graded items in `[0, 1]`; 0 for an empty set.
    pub fn completion_ratio(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.graded as f64 / self.total as f64
        }
    }
}
