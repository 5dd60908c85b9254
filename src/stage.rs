//! Workflow stages for a resume-writing session.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The ordered stages a session moves through.
///
/// A session's stage only ever advances along this ordering, with one
/// exception: the revision cycle manager may force a backward transition
/// to `StarWriting` or `Scoring` while an example is being reworked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WorkflowStage {
    Intake,
    Readiness,
    PositionAnalysis,
    ExampleSelection,
    StarWriting,
    Scoring,
    CompetencyCheck,
    Revision,
    SkillsArticulation,
    QualityAssurance,
    Finalized,
}

impl WorkflowStage {
    /// All stages in workflow order.
    pub const ORDER: [WorkflowStage; 11] = [
        WorkflowStage::Intake,
        WorkflowStage::Readiness,
        WorkflowStage::PositionAnalysis,
        WorkflowStage::ExampleSelection,
        WorkflowStage::StarWriting,
        WorkflowStage::Scoring,
        WorkflowStage::CompetencyCheck,
        WorkflowStage::Revision,
        WorkflowStage::SkillsArticulation,
        WorkflowStage::QualityAssurance,
        WorkflowStage::Finalized,
    ];

    /// The next stage in the forward ordering, or `None` from `Finalized`.
    pub fn next(self) -> Option<WorkflowStage> {
        let idx = Self::ORDER.iter().position(|s| *s == self)?;
        Self::ORDER.get(idx + 1).copied()
    }

    /// Whether this stage is terminal.
    pub fn is_terminal(self) -> bool {
        self == WorkflowStage::Finalized
    }
}

impl fmt::Display for WorkflowStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            WorkflowStage::Intake => "intake",
            WorkflowStage::PositionAnalysis => "position-analysis",
            WorkflowStage::Readiness => "readiness",
            WorkflowStage::ExampleSelection => "example-selection",
            WorkflowStage::StarWriting => "star-writing",
            WorkflowStage::Scoring => "scoring",
            WorkflowStage::CompetencyCheck => "competency-check",
            WorkflowStage::Revision => "revision",
            WorkflowStage::SkillsArticulation => "skills-articulation",
            WorkflowStage::QualityAssurance => "quality-assurance",
            WorkflowStage::Finalized => "finalized",
        };
        write!(f, "{}", s)
    }
}
