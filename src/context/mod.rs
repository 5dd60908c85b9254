//! Shared context store — the session's working state.

pub mod slot;
pub mod store;

pub use slot::{ContextSlot, SlotMeta};
pub use store::{ContextSnapshot, ContextStore};

/// Well-known context key names.
///
/// Keys are namespaced `producer.payload` strings. Ownership of each key
/// is declared on the producing collaborator's descriptor; these constants
/// only fix the spelling.
pub mod keys {
    use crate::capability::{CompetencyArea, ScoringCriterion};

    /// User profile payload, seeded at session start.
    pub const INTAKE_PROFILE: &str = "intake.profile";
    /// Position requirements payload, seeded at session start.
    pub const INTAKE_POSITION: &str = "intake.position";
    /// Readiness assessment (score, recommendation, feedback).
    pub const READINESS_ASSESSMENT: &str = "readiness.assessment";
    /// Parsed position analysis (accountabilities, priorities).
    pub const POSITION_ANALYSIS: &str = "position.analysis";
    /// Recommended experience-to-accountability mapping.
    pub const EXAMPLE_SELECTION: &str = "examples.selection";
    /// Drafted STAR examples, one per targeted Key Accountability.
    pub const EXAMPLE_DRAFTS: &str = "examples.drafts";
    /// Context scores per example id.
    pub const SCORES_CONTEXT: &str = "scores.context";
    /// Complexity scores per example id.
    pub const SCORES_COMPLEXITY: &str = "scores.complexity";
    /// Initiative scores per example id.
    pub const SCORES_INITIATIVE: &str = "scores.initiative";
    /// Vision competency coverage per example id.
    pub const COMPETENCY_VISION: &str = "competency.vision";
    /// Results competency coverage per example id.
    pub const COMPETENCY_RESULTS: &str = "competency.results";
    /// Accountability competency coverage per example id.
    pub const COMPETENCY_ACCOUNTABILITY: &str = "competency.accountability";
    /// Transferable-skills statements.
    pub const TRANSFERABLE_SKILLS: &str = "skills.transferable";
    /// Final quality-assurance review.
    pub const QA_REVIEW: &str = "qa.review";

    /// The score key for a criterion.
    pub fn score_key(criterion: ScoringCriterion) -> &'static str {
        match criterion {
            ScoringCriterion::Context => SCORES_CONTEXT,
            ScoringCriterion::Complexity => SCORES_COMPLEXITY,
            ScoringCriterion::Initiative => SCORES_INITIATIVE,
        }
    }

    /// The coverage key for an LC4Q area.
    pub fn competency_key(area: CompetencyArea) -> &'static str {
        match area {
            CompetencyArea::Vision => COMPETENCY_VISION,
            CompetencyArea::Results => COMPETENCY_RESULTS,
            CompetencyArea::Accountability => COMPETENCY_ACCOUNTABILITY,
        }
    }
}
