//! Grader configuration (`grader.yaml`).
//!
//! ```yaml
//! traces: data/traces.json
//! grades: data/grades.csv
//! ```
//!
//! Relative paths are resolved against the directory holding the file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{GraderError, GraderResult};

pub const DEFAULT_TRACES_PATH: &str = "data/traces.json";
pub const DEFAULT_GRADES_PATH: &str = "data/grades.csv";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GraderConfig {
    /// Transcript corpus (JSON array).
    pub traces: PathBuf,
    /// Grade store (CSV).
    pub grades: PathBuf,
}

impl Default for GraderConfig {
    fn default() -> Self {
        Self {
            traces: PathBuf::from(DEFAULT_TRACES_PATH),
            grades: PathBuf::from(DEFAULT_GRADES_PATH),
        }
    }
}

impl GraderConfig {
    pub fn load(path: impl AsRef<Path>) -> GraderResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| GraderError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let base = path.parent().unwrap_or_else(|| Path::new(""));
        let cfg = Self::parse(&content, path)?.resolve_relative(base);
        debug!(
            path = %path.display(),
            traces = %cfg.traces.display(),
            grades = %cfg.grades.display(),
            "loaded grader config"
        );
        Ok(cfg)
    }

    pub fn parse(content: &str, origin: impl AsRef<Path>) -> GraderResult<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|e| GraderError::Config {
            path: origin.as_ref().to_path_buf(),
            reason: e.to_string(),
        })
    }

    fn resolve_relative(mut self, base: &Path) -> Self {
        if self.traces.is_relative() {
            self.traces = base.join(&self.traces);
        }
        if self.grades.is_relative() {
            self.grades = base.join(&self.grades);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let cfg = GraderConfig::parse("grades: out/grades.csv\n", "grader.yaml").unwrap();
        assert_eq!(cfg.traces, PathBuf::from(DEFAULT_TRACES_PATH));
        assert_eq!(cfg.grades, PathBuf::from("out/grades.csv"));
        assert_eq!(GraderConfig::parse("", "grader.yaml").unwrap(), GraderConfig::default());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = GraderConfig::parse("tracez: x.json\n", "grader.yaml").unwrap_err();
        assert!(matches!(err, GraderError::Config { .. }));
    }

    #[test]
    fn load_resolves_paths_next_to_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let cfg_path = dir.path().join("grader.yaml");
        std::fs::write(&cfg_path, "traces: corpus.json\ngrades: /abs/grades.csv\n").unwrap();

        let cfg = GraderConfig::load(&cfg_path).unwrap();
        assert_eq!(cfg.traces, dir.path().join("corpus.json"));
        assert_eq!(cfg.grades, PathBuf::from("/abs/grades.csv"));
    }
}
