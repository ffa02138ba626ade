use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod common;
pub use common::*;


#[derive(Parser)]
#[command(
    name = "grader",
    version,
    about = "Human-in-the-loop pass/fail grading for recorded LLM conversations"
)]
pub struct Cli {
    #[command(flatten)]
    pub paths: PathArgs,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// List transcripts in corpus order with their current grade
    List(ListArgs),
    /// Print one transcript and its current grade
    Show(ShowArgs),
    /// Record a pass/fail verdict (re-grading replaces the previous one)
    Grade(GradeArgs),
    /// Grading progress for the corpus and the grade store
    Status(StatusArgs),
    /// Check that the transcript corpus and grade store load cleanly
    Validate,
    /// Interactive review screen
    #[cfg(feature = "tui")]
    Review(ReviewArgs),
}

#[derive(clap::Args, Clone, Debug, Default)]
pub struct PathArgs {
    /// YAML config with `traces` and `grades` paths (default: ./grader.yaml if present)
    #[arg(long, global = true, env = "GRADER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Transcript corpus (JSON array); overrides the config file
    #[arg(long, global = true, env = "GRADER_TRACES")]
    pub traces: Option<PathBuf>,

    /// Grade store (CSV); overrides the config file
    #[arg(long, global = true, env = "GRADER_GRADES")]
    pub grades: Option<PathBuf>,
}

#[derive(clap::Args, Clone, Debug)]
pub struct ListArgs {
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(clap::Args, Clone, Debug)]
pub struct ShowArgs {
    /// Transcript to print
    #[arg(value_name = "TRACE_ID")]
    pub trace_id: String,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GradeArgs {
    /// Transcript to grade
    #[arg(value_name = "TRACE_ID")]
    pub trace_id: String,

    /// Verdict: pass | fail
    #[arg(value_name = "GRADE")]
    pub grade: String,

    /// Optional reviewer note
    #[arg(long, short = 'm', default_value = "")]
    pub comment: String,
}

#[derive(clap::Args, Clone, Debug)]
pub struct StatusArgs {
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[cfg(feature = "tui")]
#[derive(clap::Args, Clone, Debug)]
pub struct ReviewArgs {
    /// Open the session at this transcript instead of the first one
    #[arg(long, value_name = "TRACE_ID")]
    pub start: Option<String>,
}
