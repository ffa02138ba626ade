use std::path::Path;

use anyhow::Context;
use grader_core::{GradeStore, GraderConfig, TranscriptSource};

use super::args::*;

pub mod grade;
pub mod list;
#[cfg(feature = "tui")]
pub mod review;
pub mod show;
pub mod status;
pub mod validate;

const DEFAULT_CONFIG_FILE: &str = "grader.yaml";

pub fn dispatch(cli: Cli) -> anyhow::Result<i32> {
    let cfg = resolve_config(&cli.paths)?;
    match cli.cmd {
        Command::List(args) => list::run(args, &cfg),
        Command::Show(args) => show::run(args, &cfg),
        Command::Grade(args) => grade::run(args, &cfg),
        Command::Status(args) => status::run(args, &cfg),
        Command::Validate => validate::run(&cfg),
        #[cfg(feature = "tui")]
        Command::Review(args) => review::run(args, &cfg),
    }
}

/// Defaults, then the config file, then explicit `--traces`/`--grades`.
pub(crate) fn resolve_config(paths: &PathArgs) -> anyhow::Result<GraderConfig> {
    let mut cfg = match &paths.config {
        Some(path) => GraderConfig::load(path)?,
        None if Path::new(DEFAULT_CONFIG_FILE).is_file() => GraderConfig::load(DEFAULT_CONFIG_FILE)?,
        None => GraderConfig::default(),
    };
    if let Some(traces) = &paths.traces {
        cfg.traces = traces.clone();
    }
    if let Some(grades) = &paths.grades {
        cfg.grades = grades.clone();
    }
    Ok(cfg)
}

pub(crate) fn load_corpus(cfg: &GraderConfig) -> anyhow::Result<TranscriptSource> {
    TranscriptSource::load(&cfg.traces)
        .with_context(|| format!("failed to load transcripts from {}", cfg.traces.display()))
}

pub(crate) fn ensure_parent_dir(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
    }
    Ok(())
}

pub(crate) fn open_store(cfg: &GraderConfig) -> GradeStore {
    GradeStore::new(&cfg.grades)
}

/// Fixed-width marker for a stored grade string.
pub(crate) fn grade_marker(grade: &str) -> &'static str {
    match grade {
        "pass" => "[pass]",
        "fail" => "[fail]",
        "" => "[ -- ]",
        _ => "[ ?? ]",
    }
}

/// Grade rows whose trace_id is not in the corpus.
pub(crate) fn orphan_rows(source: &TranscriptSource, table: &grader_core::GradeTable) -> Vec<String> {
    table
        .iter()
        .filter(|r| source.get(&r.trace_id).is_none())
        .map(|r| r.trace_id.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn explicit_paths_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let cfg_path = dir.path().join("grader.yaml");
        std::fs::write(&cfg_path, "traces: corpus.json\ngrades: grades.csv\n").unwrap();

        let cfg = resolve_config(&PathArgs {
            config: Some(cfg_path),
            traces: None,
            grades: Some(PathBuf::from("elsewhere.csv")),
        })
        .unwrap();
        assert_eq!(cfg.traces, dir.path().join("corpus.json"));
        assert_eq!(cfg.grades, PathBuf::from("elsewhere.csv"));
    }

    #[test]
    fn markers_share_one_width() {
        let markers = ["pass", "fail", "", "skip"].map(grade_marker);
        assert!(markers.iter().all(|m| m.len() == 6));
    }
}
