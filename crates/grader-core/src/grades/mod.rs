//! Grade persistence: one verdict row per `trace_id`, stored as CSV.

mod progress;
mod record;
mod store;
mod table;

pub use progress::Progress;
pub use record::{Grade, GradeRecord, GradeView};
pub use store::GradeStore;
pub use table::GradeTable;
