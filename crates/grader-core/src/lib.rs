//! Core of the trace grader: a read-only transcript corpus, a CSV-backed
//! grade store with upsert-by-`trace_id` semantics, progress aggregation,
//! and the per-reviewer session context that ties them together.
//!
//! ```no_run
//! use grader_core::{Grade, GradeStore, TranscriptSource};
//!
//! # fn example() -> grader_core::GraderResult<()> {
//! let source = TranscriptSource::load("data/traces.json")?;
//! let store = GradeStore::new("data/grades.csv");
//!
//! let first = &source.transcripts()[0];
//! let table = store.save(&first.id, Grade::Pass, "polite and correct")?;
//! println!("{} of {} graded", table.progress().graded, source.len());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod grades;
pub mod session;
pub mod transcript;

pub use config::GraderConfig;
pub use error::{GraderError, GraderResult};
pub use grades::{Grade, GradeRecord, GradeStore, GradeTable, GradeView, Progress};
pub use session::ReviewSession;
pub use transcript::{Metadata, MetadataValue, Role, Transcript, TranscriptSource, Turn};
