//! Error types for the grader core.

use std::path::PathBuf;

/// Grader errors.
#[derive(Debug, thiserror::Error)]
pub enum GraderError {
    /// Transcript corpus missing, unreadable or malformed.
    #[error("transcript source unavailable: {}: {reason}", .path.display())]
    SourceUnavailable { path: PathBuf, reason: String },

    /// Grade file exists but does not match the grade schema.
    #[error("corrupt grade store: {}: {reason}", .path.display())]
    CorruptStore { path: PathBuf, reason: String },

    /// Caller tried to save without a valid grade.
    #[error("invalid grade: {message}")]
    Validation { message: String },

    /// Reading or replacing the grade file failed.
    #[error("grade store I/O failed: {}: {source}", .path.display())]
    StoreIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The referenced trace is not part of the corpus.
    #[error("unknown trace_id: {trace_id}")]
    UnknownTrace { trace_id: String },

    /// Configuration file unreadable or invalid.
    #[error("configuration error: {}: {reason}", .path.display())]
    Config { path: PathBuf, reason: String },
}

impl GraderError {
    pub(crate) fn source_unavailable(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::SourceUnavailable {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn corrupt_store(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::CorruptStore {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn store_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::StoreIo {
            path: path.into(),
            source,
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Exit code for CLI.
    pub fn exit_code(&self) -> i32 {
        match self {
            // Caller mistakes
            Self::Validation { .. } => 1,
            Self::UnknownTrace { .. } => 1,

            Self::Config { .. } => 2,

            // Startup fixtures
            Self::SourceUnavailable { .. } => 3,
            Self::CorruptStore { .. } => 4,

            Self::StoreIo { .. } => 5,
        }
    }
}

/// Result type for grader operations.
pub type GraderResult<T> = Result<T, GraderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_are_distinct_per_failure_class() {
        let source = GraderError::source_unavailable("t.json", "missing");
        let corrupt = GraderError::corrupt_store("g.csv", "bad header");
        let io = GraderError::store_io("g.csv", std::io::Error::other("disk full"));
        let validation = GraderError::validation("no grade selected");

        assert_eq!(validation.exit_code(), 1);
        assert_eq!(source.exit_code(), 3);
        assert_eq!(corrupt.exit_code(), 4);
        assert_eq!(io.exit_code(), 5);
    }

    #[test]
    fn messages_name_the_offending_path() {
        let err = GraderError::corrupt_store("data/grades.csv", "missing column 'grade'");
        let msg = err.to_string();
        assert!(msg.contains("data/grades.csv"), "{msg}");
        assert!(msg.contains("missing column 'grade'"), "{msg}");
    }
}
