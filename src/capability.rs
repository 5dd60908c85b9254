//! Capability tags for collaborator dispatch.
//!
//! Every collaborator in a run configuration is identified by exactly one
//! [`CapabilityTag`]. The router dispatches on the tag alone, so a run
//! configuration can swap collaborator implementations without touching
//! routing logic. The registry rejects duplicate tags; routing is therefore
//! unambiguous by construction.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The three scoring criteria applied to every work example.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoringCriterion {
    /// Contextual relevance to the target position.
    Context,
    /// Complexity relative to the target rank level.
    Complexity,
    /// Proactive leadership behaviours demonstrated.
    Initiative,
}

impl ScoringCriterion {
    /// All criteria in their fixed evaluation order.
    pub const ALL: [ScoringCriterion; 3] = [
        ScoringCriterion::Context,
        ScoringCriterion::Complexity,
        ScoringCriterion::Initiative,
    ];
}

impl fmt::Display for ScoringCriterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoringCriterion::Context => write!(f, "context"),
            ScoringCriterion::Complexity => write!(f, "complexity"),
            ScoringCriterion::Initiative => write!(f, "initiative"),
        }
    }
}

/// The LC4Q competency areas under which Key Accountabilities are grouped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompetencyArea {
    Vision,
    Results,
    Accountability,
}

impl CompetencyArea {
    /// All areas in their fixed evaluation order.
    pub const ALL: [CompetencyArea; 3] = [
        CompetencyArea::Vision,
        CompetencyArea::Results,
        CompetencyArea::Accountability,
    ];
}

impl fmt::Display for CompetencyArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompetencyArea::Vision => write!(f, "vision"),
            CompetencyArea::Results => write!(f, "results"),
            CompetencyArea::Accountability => write!(f, "accountability"),
        }
    }
}

/// Identity tag for a collaborator's capability.
///
/// One collaborator per tag per run configuration. The `Orchestrator` tag
/// exists so a custom configuration can claim the coordination role; the
/// built-in router never routes to it, but it owns the intake context keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CapabilityTag {
    Readiness,
    PositionAnalysis,
    ExampleSelection,
    StarWriting,
    ContextScoring,
    ComplexityScoring,
    InitiativeScoring,
    VisionCompetency,
    ResultsCompetency,
    AccountabilityCompetency,
    TransferableSkills,
    QualityAssurance,
    Orchestrator,
}

impl CapabilityTag {
    /// The scoring capability for a given criterion.
    pub fn for_criterion(criterion: ScoringCriterion) -> Self {
        match criterion {
            ScoringCriterion::Context => CapabilityTag::ContextScoring,
            ScoringCriterion::Complexity => CapabilityTag::ComplexityScoring,
            ScoringCriterion::Initiative => CapabilityTag::InitiativeScoring,
        }
    }

    /// The competency-check capability for a given LC4Q area.
    pub fn for_area(area: CompetencyArea) -> Self {
        match area {
            CompetencyArea::Vision => CapabilityTag::VisionCompetency,
            CompetencyArea::Results => CapabilityTag::ResultsCompetency,
            CompetencyArea::Accountability => CapabilityTag::AccountabilityCompetency,
        }
    }

    /// The criterion this capability scores, if it is a scoring capability.
    pub fn scoring_criterion(&self) -> Option<ScoringCriterion> {
        match self {
            CapabilityTag::ContextScoring => Some(ScoringCriterion::Context),
            CapabilityTag::ComplexityScoring => Some(ScoringCriterion::Complexity),
            CapabilityTag::InitiativeScoring => Some(ScoringCriterion::Initiative),
            _ => None,
        }
    }

    /// The LC4Q area this capability checks, if it is a competency capability.
    pub fn competency_area(&self) -> Option<CompetencyArea> {
        match self {
            CapabilityTag::VisionCompetency => Some(CompetencyArea::Vision),
            CapabilityTag::ResultsCompetency => Some(CompetencyArea::Results),
            CapabilityTag::AccountabilityCompetency => Some(CompetencyArea::Accountability),
            _ => None,
        }
    }
}

impl fmt::Display for CapabilityTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CapabilityTag::Readiness => "readiness",
            CapabilityTag::PositionAnalysis => "position-analysis",
            CapabilityTag::ExampleSelection => "example-selection",
            CapabilityTag::StarWriting => "star-writing",
            CapabilityTag::ContextScoring => "context-scoring",
            CapabilityTag::ComplexityScoring => "complexity-scoring",
            CapabilityTag::InitiativeScoring => "initiative-scoring",
            CapabilityTag::VisionCompetency => "vision-competency",
            CapabilityTag::ResultsCompetency => "results-competency",
            CapabilityTag::AccountabilityCompetency => "accountability-competency",
            CapabilityTag::TransferableSkills => "transferable-skills",
            CapabilityTag::QualityAssurance => "quality-assurance",
            CapabilityTag::Orchestrator => "orchestrator",
        };
        write!(f, "{}", s)
    }
}
