//! FILENAME: model/src/recon.rs
//! PURPOSE: Reconciliation links attached to cells.
//! CONTEXT: A `Recon` records how a cell was matched against an external
//! entity service. Many cells may share one `Recon` (held as `Arc<Recon>`);
//! serialization writes each shared recon once into a `Pool` and cells
//! refer to it by id.

use serde::{Deserialize, Serialize};

/// Outcome of reconciling a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Judgment {
    None,
    Matched,
    New,
}

impl Default for Judgment {
    fn default() -> Self {
        Judgment::None
    }
}

impl Judgment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Judgment::None => "none",
            Judgment::Matched => "matched",
            Judgment::New => "new",
        }
    }
}

/// A candidate entity proposed by the reconciliation service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconCandidate {
    pub id: String,
    pub name: String,
    pub score: f64,
    #[serde(default)]
    pub types: Vec<String>,
}

impl ReconCandidate {
    pub fn new(id: impl Into<String>, name: impl Into<String>, score: f64) -> Self {
        ReconCandidate {
            id: id.into(),
            name: name.into(),
            score,
            types: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recon {
    pub id: i64,
    #[serde(default)]
    pub service: String,
    #[serde(default)]
    pub identifier_space: String,
    #[serde(default)]
    pub schema_space: String,
    #[serde(rename = "j", default)]
    pub judgment: Judgment,
    #[serde(rename = "m", default, skip_serializing_if = "Option::is_none")]
    pub match_candidate: Option<ReconCandidate>,
    #[serde(rename = "c", default, skip_serializing_if = "Vec::is_empty")]
    pub candidates: Vec<ReconCandidate>,
    #[serde(default = "default_judgment_action")]
    pub judgment_action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_rank: Option<u32>,
}

fn default_judgment_action() -> String {
    "unknown".to_string()
}

impl Recon {
    pub fn new(id: i64, service: impl Into<String>) -> Self {
        Recon {
            id,
            service: service.into(),
            identifier_space: String::new(),
            schema_space: String::new(),
            judgment: Judgment::None,
            match_candidate: None,
            candidates: Vec::new(),
            judgment_action: default_judgment_action(),
            match_rank: None,
        }
    }

    /// Marks the recon as matched against `candidate`.
    pub fn with_match(mut self, candidate: ReconCandidate) -> Self {
        self.match_rank = self
            .candidates
            .iter()
            .position(|c| c.id == candidate.id)
            .map(|i| i as u32);
        self.judgment = Judgment::Matched;
        self.match_candidate = Some(candidate);
        self
    }

    pub fn with_candidates(mut self, candidates: Vec<ReconCandidate>) -> Self {
        self.candidates = candidates;
        self
    }

    /// Highest scoring candidate, if any.
    pub fn best_candidate(&self) -> Option<&ReconCandidate> {
        self.candidates
            .iter()
            .max_by(|a, b| a.score.total_cmp(&b.score))
    }

    pub fn is_matched(&self) -> bool {
        self.judgment == Judgment::Matched && self.match_candidate.is_some()
    }
}
