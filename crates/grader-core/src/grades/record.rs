use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::GraderError;

/// Reviewer verdict on a transcript's final assistant response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Grade {
    Pass,
    Fail,
}

impl Grade {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pass => "pass",
            Self::Fail => "fail",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Grade {
    type Err = GraderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pass" => Ok(Self::Pass),
            "fail" => Ok(Self::Fail),
            "" => Err(GraderError::validation("select pass or fail before saving")),
            other => Err(GraderError::validation(format!(
                "grade must be 'pass' or 'fail', got '{other}'"
            ))),
        }
    }
}

/// One row of the grade table, kept as stored.
///
/// `grade` stays a raw string so rows written by other tools with a wider
/// vocabulary still load and count as graded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradeRecord {
    pub trace_id: String,
    pub grade: String,
    pub comment: String,
    pub graded_at: String,
}

impl GradeRecord {
    pub fn new(
        trace_id: impl Into<String>,
        grade: Grade,
        comment: impl Into<String>,
        graded_at: DateTime<Utc>,
    ) -> Self {
        Self {
            trace_id: trace_id.into(),
            grade: grade.as_str().to_string(),
            comment: comment.into(),
            graded_at: format_timestamp(graded_at),
        }
    }

    pub fn verdict(&self) -> Option<Grade> {
        self.grade.parse().ok()
    }

    pub fn is_graded(&self) -> bool {
        !self.grade.is_empty()
    }

    pub fn graded_at_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.graded_at)
            .ok()
            .map(|t| t.with_timezone(&Utc))
    }
}

/// Grade and comment for one trace as shown to a reviewer; empty when ungraded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GradeView {
    pub grade: String,
    pub comment: String,
}

impl GradeView {
    pub fn verdict(&self) -> Option<Grade> {
        self.grade.parse().ok()
    }
}

pub(crate) fn format_timestamp(t: DateTime<Utc>) -> String {
    // +00:00 offset, not Z
    t.to_rfc3339_opts(chrono::SecondsFormat::Micros, false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grade_parsing_is_lenient_on_case_and_whitespace() {
        assert_eq!(" PASS ".parse::<Grade>().unwrap(), Grade::Pass);
        assert_eq!("fail".parse::<Grade>().unwrap(), Grade::Fail);
    }

    #[test]
    fn empty_or_unknown_grade_is_a_validation_error() {
        for input in ["", "  ", "maybe"] {
            let err = input.parse::<Grade>().unwrap_err();
            assert!(matches!(err, GraderError::Validation { .. }), "{input:?}");
        }
    }

    #[test]
    fn timestamp_is_utc_and_parses_back() {
        let now = Utc::now();
        let rec = GradeRecord::new("trace_001", Grade::Pass, "", now);
        assert!(rec.graded_at.ends_with("+00:00"), "{}", rec.graded_at);
        let parsed = rec.graded_at_utc().unwrap();
        assert_eq!(parsed.timestamp_micros(), now.timestamp_micros());
    }

    #[test]
    fn unknown_vocabulary_is_graded_but_has_no_verdict() {
        let rec = GradeRecord {
            trace_id: "t".into(),
            grade: "skip".into(),
            comment: String::new(),
            graded_at: String::new(),
        };
        assert!(rec.is_graded());
        assert_eq!(rec.verdict(), None);
    }
}
