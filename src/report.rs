//! Terminal session reports.
//!
//! Whatever the terminal status, the report names what converged and what
//! did not — a failed or timed-out session is never a silent partial
//! success.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::capability::CompetencyArea;
use crate::example::{CriterionScores, ExampleState, StarExample};
use crate::profile::PositionRequirements;
use crate::session::SessionStatus;
use crate::turn::TurnRecord;

/// Final state of one example as reported to the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExampleReport {
    pub id: Uuid,
    pub accountability_id: String,
    pub area: CompetencyArea,
    pub year_rank_location: String,
    pub situation: String,
    pub task: String,
    pub action: String,
    pub result: String,
    pub word_count: u32,
    pub scores: CriterionScores,
    pub covered_competencies: Vec<String>,
    pub missing_competencies: Vec<String>,
    pub revision_count: u32,
    pub state: ExampleState,
}

impl From<&StarExample> for ExampleReport {
    fn from(example: &StarExample) -> Self {
        Self {
            id: example.id,
            accountability_id: example.accountability_id.clone(),
            area: example.area,
            year_rank_location: example.year_rank_location.clone(),
            situation: example.situation.clone(),
            task: example.task.clone(),
            action: example.action.clone(),
            result: example.result.clone(),
            word_count: example.word_count,
            scores: example.scores,
            covered_competencies: example.covered_competencies.iter().cloned().collect(),
            missing_competencies: example
                .competencies_missing()
                .into_iter()
                .map(str::to_owned)
                .collect(),
            revision_count: example.revision_count,
            state: example.state,
        }
    }
}

/// One row of the Key Accountability × LC4Q coverage matrix.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoverageRow {
    pub accountability_id: String,
    pub area: CompetencyArea,
    /// Whether an example exists for this accountability at all.
    pub addressed: bool,
    /// Whether that example reached its thresholds and full coverage.
    pub converged: bool,
    pub items_required: Vec<String>,
    pub items_covered: Vec<String>,
}

/// The terminal report emitted by the session controller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionReport {
    pub session_id: Uuid,
    pub status: SessionStatus,
    pub turns_taken: u32,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Readiness assessment payload, when that stage produced one.
    pub readiness: Option<Value>,
    pub examples: Vec<ExampleReport>,
    pub coverage: Vec<CoverageRow>,
    /// Examples that did not converge (stalled or unfinished), in
    /// creation order.
    pub unresolved: Vec<Uuid>,
    /// Transferable-skills payload, when that stage produced one.
    pub transferable_skills: Option<Value>,
    /// Quality-assurance payload, when that stage produced one.
    pub quality_assurance: Option<Value>,
    /// Diagnostic detail for failed sessions.
    pub failure: Option<String>,
    /// The full append-only turn log, for audit and replay comparison.
    pub records: Vec<TurnRecord>,
}

/// Build the coverage matrix for a position against the final examples.
pub fn coverage_matrix(
    position: &PositionRequirements,
    examples: &[StarExample],
) -> Vec<CoverageRow> {
    position
        .key_accountabilities
        .iter()
        .map(|ka| {
            let example = examples.iter().find(|e| e.accountability_id == ka.id);
            CoverageRow {
                accountability_id: ka.id.clone(),
                area: ka.area,
                addressed: example.is_some(),
                converged: example.is_some_and(|e| {
                    matches!(e.state, ExampleState::Converged | ExampleState::Finalized)
                }),
                items_required: ka.competency_items.clone(),
                items_covered: example
                    .map(|e| e.covered_competencies.iter().cloned().collect())
                    .unwrap_or_default(),
            }
        })
        .collect()
}
