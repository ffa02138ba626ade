use grader_core::{Grade, GraderConfig, ReviewSession};

use super::super::args::GradeArgs;
use crate::exit_codes::SUCCESS;

pub fn run(args: GradeArgs, cfg: &GraderConfig) -> anyhow::Result<i32> {
    let grade: Grade = args.grade.parse()?;
    let source = super::load_corpus(cfg)?;
    let store = super::open_store(cfg);

    let mut session = ReviewSession::open(source.transcripts(), &store)?;
    session.jump_to(&args.trace_id)?;

    super::ensure_parent_dir(store.path())?;
    session.save_current(Some(grade), &args.comment)?;

    let p = session.corpus_progress();
    println!(
        "saved {} for {}",
        grade.as_str().to_uppercase(),
        args.trace_id
    );
    println!(
        "progress: {}/{} graded (pass {}, fail {}, todo {})",
        p.graded, p.total, p.passed, p.failed, p.ungraded
    );
    Ok(SUCCESS)
}
