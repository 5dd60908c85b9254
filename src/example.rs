//! STAR work examples — the unit under iterative improvement.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::capability::{CompetencyArea, ScoringCriterion};

/// Lifecycle state of one example.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExampleState {
    /// Drafted, not yet scored.
    Drafted,
    /// Scored at least once; awaiting the convergence verdict.
    Scored,
    /// Below threshold or missing coverage; queued for another pass.
    NeedsRevision,
    /// All thresholds met and all competency items covered.
    Converged,
    /// Revision budget exhausted without convergence; surfaced as a gap.
    Stalled,
    /// Frozen in the final report.
    Finalized,
}

/// Scores for the three criteria, each 1-7 or absent-if-unscored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CriterionScores {
    pub context: Option<u8>,
    pub complexity: Option<u8>,
    pub initiative: Option<u8>,
}

impl CriterionScores {
    pub fn get(&self, criterion: ScoringCriterion) -> Option<u8> {
        match criterion {
            ScoringCriterion::Context => self.context,
            ScoringCriterion::Complexity => self.complexity,
            ScoringCriterion::Initiative => self.initiative,
        }
    }

    pub fn set(&mut self, criterion: ScoringCriterion, score: u8) {
        let slot = match criterion {
            ScoringCriterion::Context => &mut self.context,
            ScoringCriterion::Complexity => &mut self.complexity,
            ScoringCriterion::Initiative => &mut self.initiative,
        };
        *slot = Some(score);
    }

    /// Whether all three criteria have been scored.
    pub fn is_complete(&self) -> bool {
        self.context.is_some() && self.complexity.is_some() && self.initiative.is_some()
    }

    /// Whether every scored criterion meets the threshold, with none absent.
    pub fn all_at_least(&self, threshold: u8) -> bool {
        ScoringCriterion::ALL
            .iter()
            .all(|c| self.get(*c).is_some_and(|s| s >= threshold))
    }

    /// Criteria currently below the threshold (absent counts as below).
    pub fn below(&self, threshold: u8) -> Vec<ScoringCriterion> {
        ScoringCriterion::ALL
            .into_iter()
            .filter(|c| !self.get(*c).is_some_and(|s| s >= threshold))
            .collect()
    }
}

/// One STAR-structured work example tied to a Key Accountability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StarExample {
    pub id: Uuid,
    /// Key Accountability this example demonstrates.
    pub accountability_id: String,
    /// LC4Q area the accountability is grouped under.
    pub area: CompetencyArea,
    pub year_rank_location: String,
    pub situation: String,
    pub task: String,
    pub action: String,
    pub result: String,
    pub word_count: u32,
    pub scores: CriterionScores,
    /// Competency sub-items this example must cover, from the accountability.
    pub required_competencies: Vec<String>,
    /// Sub-items a competency check has marked covered.
    pub covered_competencies: BTreeSet<String>,
    pub revision_count: u32,
    pub state: ExampleState,
}

impl StarExample {
    /// Create a fresh draft for an accountability.
    pub fn new(accountability_id: impl Into<String>, area: CompetencyArea) -> Self {
        Self {
            id: Uuid::new_v4(),
            accountability_id: accountability_id.into(),
            area,
            year_rank_location: String::new(),
            situation: String::new(),
            task: String::new(),
            action: String::new(),
            result: String::new(),
            word_count: 0,
            scores: CriterionScores::default(),
            required_competencies: Vec::new(),
            covered_competencies: BTreeSet::new(),
            revision_count: 0,
            state: ExampleState::Drafted,
        }
    }

    /// Overwrite the STAR fields from a draft object produced by the
    /// star-writing collaborator. Unknown fields are ignored; missing
    /// fields leave the current text in place.
    pub fn apply_draft(&mut self, draft: &Value) {
        let read = |field: &str| draft.get(field).and_then(Value::as_str).map(str::to_owned);
        if let Some(v) = read("year_rank_location") {
            self.year_rank_location = v;
        }
        if let Some(v) = read("situation") {
            self.situation = v;
        }
        if let Some(v) = read("task") {
            self.task = v;
        }
        if let Some(v) = read("action") {
            self.action = v;
        }
        if let Some(v) = read("result") {
            self.result = v;
        }
        if let Some(v) = draft.get("word_count").and_then(Value::as_u64) {
            self.word_count = v as u32;
        }
    }

    /// Required competency sub-items not yet marked covered, in order.
    pub fn competencies_missing(&self) -> Vec<&str> {
        self.required_competencies
            .iter()
            .filter(|item| !self.covered_competencies.contains(*item))
            .map(String::as_str)
            .collect()
    }

    /// The convergence predicate: all criterion scores at or above the
    /// threshold and every required competency sub-item covered.
    pub fn is_converged(&self, threshold: u8) -> bool {
        self.scores.all_at_least(threshold) && self.competencies_missing().is_empty()
    }
}
