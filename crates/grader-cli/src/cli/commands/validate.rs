use grader_core::GraderConfig;
use tracing::warn;

use crate::exit_codes::SUCCESS;

pub fn run(cfg: &GraderConfig) -> anyhow::Result<i32> {
    let source = super::load_corpus(cfg)?;
    let table = super::open_store(cfg).load()?;

    let orphans = super::orphan_rows(&source, &table);
    if !orphans.is_empty() {
        warn!(count = orphans.len(), "grade rows reference traces outside the corpus");
    }

    println!(
        "ok: {} transcripts in {}, {} grade rows in {}",
        source.len(),
        cfg.traces.display(),
        table.len(),
        cfg.grades.display()
    );
    Ok(SUCCESS)
}
