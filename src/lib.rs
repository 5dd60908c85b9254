//! # Starcrew
//!
//! Orchestration core for a multi-collaborator promotion-resume writing
//! pipeline. A session controller drives a staged workflow over a shared
//! context store: specialist collaborators draft STAR work examples,
//! score them against a 1-7 adequacy rubric, check LC4Q competency
//! coverage, and loop through bounded revision cycles until every
//! example converges or stalls. Generation is abstracted behind a
//! backend trait, so the whole workflow replays deterministically from
//! scripted responses.

pub mod backend;
pub mod capability;
pub mod config;
pub mod context;
pub mod error;
pub mod example;
pub mod executor;
pub mod profile;
pub mod registry;
pub mod report;
pub mod revision;
pub mod router;
pub mod session;
pub mod stage;
pub mod turn;

pub use backend::{BackendError, GenerationBackend, PromptContext, ScriptedBackend};
pub use capability::{CapabilityTag, CompetencyArea, ScoringCriterion};
pub use config::OrchestratorConfig;
pub use context::{ContextSnapshot, ContextStore};
pub use error::OrchestratorError;
pub use example::{CriterionScores, ExampleState, StarExample};
pub use executor::TurnExecutor;
pub use profile::{PositionRequirements, SessionInput, UserProfile};
pub use registry::{CollaboratorDescriptor, CollaboratorRegistry, OutputSchema};
pub use report::{CoverageRow, ExampleReport, SessionReport};
pub use revision::{RevisionCycleManager, RevisionPlan, RevisionVerdict};
pub use router::{RouteDecision, Router};
pub use session::{CancelToken, SessionController, SessionStatus};
pub use stage::WorkflowStage;
pub use turn::TurnRecord;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
