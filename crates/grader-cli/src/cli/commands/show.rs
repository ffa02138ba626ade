use grader_core::{GraderConfig, GraderError};

use super::super::args::ShowArgs;
use crate::exit_codes::SUCCESS;

pub fn run(args: ShowArgs, cfg: &GraderConfig) -> anyhow::Result<i32> {
    let source = super::load_corpus(cfg)?;
    let transcript = source
        .get(&args.trace_id)
        .ok_or_else(|| GraderError::UnknownTrace {
            trace_id: args.trace_id.clone(),
        })?;
    let current = super::open_store(cfg).load()?.lookup(&transcript.id);

    println!("{}", transcript.id);
    println!("scenario: {}", transcript.scenario);
    for (key, value) in &transcript.metadata {
        println!("  {key}: {value}");
    }
    println!();

    for turn in &transcript.turns {
        println!("[{}]", turn.role);
        for line in turn.content.lines() {
            println!("  {line}");
        }
        println!();
    }

    if current.grade.is_empty() {
        println!("current grade: ungraded");
    } else if current.comment.is_empty() {
        println!("current grade: {}", current.grade.to_uppercase());
    } else {
        println!(
            "current grade: {} (\"{}\")",
            current.grade.to_uppercase(),
            current.comment
        );
    }
    Ok(SUCCESS)
}
