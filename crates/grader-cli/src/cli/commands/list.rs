use grader_core::GraderConfig;
use serde::Serialize;

use super::super::args::{ListArgs, OutputFormat};
use crate::exit_codes::SUCCESS;

#[derive(Debug, Serialize)]
struct ListEntry<'a> {
    trace_id: &'a str,
    scenario: &'a str,
    grade: String,
    comment: String,
}

pub fn run(args: ListArgs, cfg: &GraderConfig) -> anyhow::Result<i32> {
    let source = super::load_corpus(cfg)?;
    let table = super::open_store(cfg).load()?;

    let entries: Vec<ListEntry<'_>> = source
        .iter()
        .map(|t| {
            let view = table.lookup(&t.id);
            ListEntry {
                trace_id: &t.id,
                scenario: &t.scenario,
                grade: view.grade,
                comment: view.comment,
            }
        })
        .collect();

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&entries)?),
        OutputFormat::Text => {
            let width = entries.iter().map(|e| e.trace_id.len()).max().unwrap_or(0);
            for e in &entries {
                println!(
                    "{} {:<width$}  {}",
                    super::grade_marker(&e.grade),
                    e.trace_id,
                    e.scenario
                );
            }
        }
    }
    Ok(SUCCESS)
}
