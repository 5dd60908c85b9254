//! Collaborator registry.
//!
//! Declares each collaborator's identity, capability tag, and the context
//! keys it reads and writes. The system is single-collaborator-per-
//! capability by design: `register` rejects a second claim on the same
//! tag, so routing never has to break ties between collaborators.

pub mod descriptor;

pub use descriptor::{CollaboratorDescriptor, FieldKind, OutputSchema, SchemaField};

use std::collections::HashMap;

use crate::capability::{CapabilityTag, CompetencyArea, ScoringCriterion};
use crate::context::keys;
use crate::error::OrchestratorError;

/// Registry of collaborators for one run configuration.
#[derive(Debug, Default)]
pub struct CollaboratorRegistry {
    by_capability: HashMap<CapabilityTag, CollaboratorDescriptor>,
}

impl CollaboratorRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a collaborator.
    ///
    /// Fails with [`OrchestratorError::DuplicateCapability`] when another
    /// collaborator already claims the same tag.
    pub fn register(
        &mut self,
        descriptor: CollaboratorDescriptor,
    ) -> Result<(), OrchestratorError> {
        if self.by_capability.contains_key(&descriptor.capability) {
            return Err(OrchestratorError::DuplicateCapability(
                descriptor.capability,
            ));
        }
        self.by_capability.insert(descriptor.capability, descriptor);
        Ok(())
    }

    /// Resolve the collaborator for a capability.
    pub fn resolve(
        &self,
        capability: CapabilityTag,
    ) -> Result<&CollaboratorDescriptor, OrchestratorError> {
        self.by_capability
            .get(&capability)
            .ok_or(OrchestratorError::CapabilityNotFound(capability))
    }

    /// Whether a capability has a registered collaborator.
    pub fn contains(&self, capability: CapabilityTag) -> bool {
        self.by_capability.contains_key(&capability)
    }

    /// All registered descriptors (unspecified order).
    pub fn list(&self) -> impl Iterator<Item = &CollaboratorDescriptor> {
        self.by_capability.values()
    }

    /// Declared owners of a context key.
    pub fn owners_of<'a>(&'a self, key: &str) -> Vec<&'a CollaboratorDescriptor> {
        self.by_capability
            .values()
            .filter(|d| d.owns(key))
            .collect()
    }

    /// Number of registered collaborators.
    pub fn len(&self) -> usize {
        self.by_capability.len()
    }

    /// Whether no collaborator is registered.
    pub fn is_empty(&self) -> bool {
        self.by_capability.is_empty()
    }

    /// The standard thirteen-collaborator roster.
    ///
    /// Mirrors the specialist line-up of the resume-writing workflow:
    /// orchestrator (owns the intake keys), readiness, position analysis,
    /// example selection, STAR writing, three scoring specialists, three
    /// LC4Q competency specialists, transferable skills, and QA.
    pub fn default_roster() -> Result<Self, OrchestratorError> {
        let mut registry = Self::new();

        registry.register(CollaboratorDescriptor {
            name: "Orchestrator".into(),
            capability: CapabilityTag::Orchestrator,
            input_keys: vec![],
            output_keys: vec![keys::INTAKE_PROFILE.into(), keys::INTAKE_POSITION.into()],
            schema: OutputSchema::new(),
        })?;

        registry.register(CollaboratorDescriptor {
            name: "ReadinessAssessment".into(),
            capability: CapabilityTag::Readiness,
            input_keys: vec![keys::INTAKE_PROFILE.into()],
            output_keys: vec![keys::READINESS_ASSESSMENT.into()],
            schema: OutputSchema::new().field(keys::READINESS_ASSESSMENT, FieldKind::Object),
        })?;

        registry.register(CollaboratorDescriptor {
            name: "PositionAnalysis".into(),
            capability: CapabilityTag::PositionAnalysis,
            input_keys: vec![keys::INTAKE_POSITION.into()],
            output_keys: vec![keys::POSITION_ANALYSIS.into()],
            schema: OutputSchema::new().field(keys::POSITION_ANALYSIS, FieldKind::Object),
        })?;

        registry.register(CollaboratorDescriptor {
            name: "ExampleSelection".into(),
            capability: CapabilityTag::ExampleSelection,
            input_keys: vec![
                keys::INTAKE_PROFILE.into(),
                keys::POSITION_ANALYSIS.into(),
            ],
            output_keys: vec![keys::EXAMPLE_SELECTION.into()],
            schema: OutputSchema::new().field(keys::EXAMPLE_SELECTION, FieldKind::Object),
        })?;

        registry.register(CollaboratorDescriptor {
            name: "STARWriting".into(),
            capability: CapabilityTag::StarWriting,
            input_keys: vec![
                keys::INTAKE_PROFILE.into(),
                keys::POSITION_ANALYSIS.into(),
                keys::EXAMPLE_SELECTION.into(),
                keys::EXAMPLE_DRAFTS.into(),
                keys::SCORES_CONTEXT.into(),
                keys::SCORES_COMPLEXITY.into(),
                keys::SCORES_INITIATIVE.into(),
            ],
            output_keys: vec![keys::EXAMPLE_DRAFTS.into()],
            schema: OutputSchema::new().field(keys::EXAMPLE_DRAFTS, FieldKind::Array),
        })?;

        for criterion in ScoringCriterion::ALL {
            let name = match criterion {
                ScoringCriterion::Context => "ContextScoring",
                ScoringCriterion::Complexity => "ComplexityScoring",
                ScoringCriterion::Initiative => "InitiativeScoring",
            };
            registry.register(CollaboratorDescriptor {
                name: name.into(),
                capability: CapabilityTag::for_criterion(criterion),
                input_keys: vec![
                    keys::POSITION_ANALYSIS.into(),
                    keys::EXAMPLE_DRAFTS.into(),
                ],
                output_keys: vec![keys::score_key(criterion).into()],
                schema: OutputSchema::new().field(keys::score_key(criterion), FieldKind::Object),
            })?;
        }

        for area in CompetencyArea::ALL {
            let name = match area {
                CompetencyArea::Vision => "VisionCompetency",
                CompetencyArea::Results => "ResultsCompetency",
                CompetencyArea::Accountability => "AccountabilityCompetency",
            };
            registry.register(CollaboratorDescriptor {
                name: name.into(),
                capability: CapabilityTag::for_area(area),
                input_keys: vec![
                    keys::POSITION_ANALYSIS.into(),
                    keys::EXAMPLE_DRAFTS.into(),
                ],
                output_keys: vec![keys::competency_key(area).into()],
                schema: OutputSchema::new()
                    .field(keys::competency_key(area), FieldKind::Object),
            })?;
        }

        registry.register(CollaboratorDescriptor {
            name: "TransferableSkills".into(),
            capability: CapabilityTag::TransferableSkills,
            input_keys: vec![
                keys::INTAKE_PROFILE.into(),
                keys::POSITION_ANALYSIS.into(),
                keys::EXAMPLE_DRAFTS.into(),
            ],
            output_keys: vec![keys::TRANSFERABLE_SKILLS.into()],
            schema: OutputSchema::new().field(keys::TRANSFERABLE_SKILLS, FieldKind::Object),
        })?;

        registry.register(CollaboratorDescriptor {
            name: "QualityAssurance".into(),
            capability: CapabilityTag::QualityAssurance,
            input_keys: vec![
                keys::EXAMPLE_DRAFTS.into(),
                keys::TRANSFERABLE_SKILLS.into(),
                keys::READINESS_ASSESSMENT.into(),
            ],
            output_keys: vec![keys::QA_REVIEW.into()],
            schema: OutputSchema::new().field(keys::QA_REVIEW, FieldKind::Object),
        })?;

        Ok(registry)
    }
}
