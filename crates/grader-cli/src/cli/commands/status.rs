use grader_core::{GraderConfig, Progress, ReviewSession};
use serde::Serialize;

use super::super::args::{OutputFormat, StatusArgs};
use crate::exit_codes::SUCCESS;

#[derive(Debug, Serialize)]
struct StatusReport {
    corpus: Progress,
    store: Progress,
    orphans: Vec<String>,
}

pub fn run(args: StatusArgs, cfg: &GraderConfig) -> anyhow::Result<i32> {
    let source = super::load_corpus(cfg)?;
    let store = super::open_store(cfg);
    let session = ReviewSession::open(source.transcripts(), &store)?;

    let report = StatusReport {
        corpus: session.corpus_progress(),
        store: session.table_progress(),
        orphans: super::orphan_rows(&source, session.table()),
    };

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => {
            let c = &report.corpus;
            let s = &report.store;
            println!("transcripts: {}", cfg.traces.display());
            println!("grades:      {}", cfg.grades.display());
            println!(
                "corpus: {}/{} graded ({:.0}%)  pass {}  fail {}  todo {}",
                c.graded,
                c.total,
                c.completion_ratio() * 100.0,
                c.passed,
                c.failed,
                c.ungraded
            );
            println!(
                "store:  {} rows  graded {}  pass {}  fail {}  ungraded {}",
                s.total, s.graded, s.passed, s.failed, s.ungraded
            );
            if !report.orphans.is_empty() {
                println!(
                    "warning: {} grade row(s) for traces not in the corpus: {}",
                    report.orphans.len(),
                    report.orphans.join(", ")
                );
            }
        }
    }
    Ok(SUCCESS)
}
