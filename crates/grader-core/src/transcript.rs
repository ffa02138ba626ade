//! Transcript corpus: the fixed, ordered set of conversations under review.
//!
//! The corpus is loaded once from a JSON array and never mutated afterwards.

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{GraderError, GraderResult};

/// Speaker of a single turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

/// Scalar metadata value. Nested objects, arrays and null are rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl MetadataValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for MetadataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

pub type Metadata = BTreeMap<String, MetadataValue>;

/// One recorded conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Transcript {
    #[serde(rename = "trace_id")]
    pub id: String,
    pub scenario: String,
    #[serde(default)]
    pub metadata: Metadata,
    pub turns: Vec<Turn>,
}

impl Transcript {
    /// The assistant response a grade is given for.
    pub fn final_assistant_turn(&self) -> Option<&Turn> {
        self.turns.iter().rev().find(|t| t.role == Role::Assistant)
    }
}

/// Immutable, ordered transcript corpus.
#[derive(Debug, Clone)]
pub struct TranscriptSource {
    transcripts: Vec<Transcript>,
}

impl TranscriptSource {
    pub fn load(path: impl AsRef<Path>) -> GraderResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| GraderError::source_unavailable(path, e.to_string()))?;
        let source = Self::from_json_str(&content, path)?;
        debug!(path = %path.display(), transcripts = source.len(), "loaded transcript corpus");
        Ok(source)
    }

    /// Parse a corpus from JSON text. `origin` is only used in error messages.
    pub fn from_json_str(content: &str, origin: impl AsRef<Path>) -> GraderResult<Self> {
        let origin = origin.as_ref();
        let transcripts: Vec<Transcript> = serde_json::from_str(content)
            .map_err(|e| GraderError::source_unavailable(origin, e.to_string()))?;
        validate(&transcripts).map_err(|reason| GraderError::source_unavailable(origin, reason))?;
        Ok(Self { transcripts })
    }

    pub fn transcripts(&self) -> &[Transcript] {
        &self.transcripts
    }

    pub fn len(&self) -> usize {
        self.transcripts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transcripts.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Transcript> {
        self.transcripts.iter()
    }

    pub fn get(&self, trace_id: &str) -> Option<&Transcript> {
        self.transcripts.iter().find(|t| t.id == trace_id)
    }

    pub fn position(&self, trace_id: &str) -> Option<usize> {
        self.transcripts.iter().position(|t| t.id == trace_id)
    }
}

impl<'a> IntoIterator for &'a TranscriptSource {
    type Item = &'a Transcript;
    type IntoIter = std::slice::Iter<'a, Transcript>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

fn validate(transcripts: &[Transcript]) -> Result<(), String> {
    if transcripts.is_empty() {
        return Err("corpus contains no transcripts".to_string());
    }

    let mut seen = HashSet::with_capacity(transcripts.len());
    for (idx, t) in transcripts.iter().enumerate() {
        if t.id.trim().is_empty() {
            return Err(format!("transcript #{idx} has an empty trace_id"));
        }
        if t.turns.is_empty() {
            return Err(format!("transcript '{}' has no turns", t.id));
        }
        if !seen.insert(t.id.as_str()) {
            return Err(format!("duplicate trace_id '{}'", t.id));
        }
    }
    Ok(())
}
