//! Error taxonomy for the orchestration core.
//!
//! Configuration errors (`DuplicateCapability`, `OwnershipViolation`) are
//! fatal. Transient turn failures (`TurnTimeout`, backend errors,
//! `InvalidOutput`) are retried with bounded attempts by the executor and
//! router; only `StageBlocked` escalates a stuck stage to session failure.

use thiserror::Error;
use uuid::Uuid;

use crate::backend::BackendError;
use crate::capability::CapabilityTag;
use crate::stage::WorkflowStage;

/// Errors raised by the orchestration core.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// A collaborator wrote (or tried to write) a context key it does not own.
    #[error("collaborator `{collaborator}` is not a declared owner of context key `{key}`")]
    OwnershipViolation { collaborator: String, key: String },

    /// Two collaborators claimed the same capability in one run configuration.
    #[error("capability `{0}` is already registered")]
    DuplicateCapability(CapabilityTag),

    /// No collaborator is registered for the requested capability.
    #[error("no collaborator registered for capability `{0}`")]
    CapabilityNotFound(CapabilityTag),

    /// A collaborator turn exceeded the configured per-turn timeout.
    #[error("turn for `{0}` exceeded the per-turn timeout")]
    TurnTimeout(CapabilityTag),

    /// The backend's response failed schema validation, including after the
    /// corrective retry.
    #[error("collaborator `{collaborator}` produced invalid output: {detail}")]
    InvalidOutput { collaborator: String, detail: String },

    /// A stage could not produce its mandatory outputs within the retry budget.
    #[error("stage `{stage}` is blocked after {attempts} attempts; missing keys: {missing_keys:?}")]
    StageBlocked {
        stage: WorkflowStage,
        missing_keys: Vec<String>,
        attempts: u32,
    },

    /// A second `start()` was attempted while a run is already in flight.
    #[error("session `{0}` already has a run in flight")]
    SessionBusy(Uuid),

    /// Invalid orchestrator configuration.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A generation backend failure that exhausted its local retries.
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// Internal serialization failure while seeding intake payloads.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl OrchestratorError {
    /// Whether a failed turn with this error may be re-attempted by the
    /// router's bounded stage retry rule.
    pub fn is_retryable_turn_failure(&self) -> bool {
        matches!(
            self,
            OrchestratorError::TurnTimeout(_)
                | OrchestratorError::InvalidOutput { .. }
                | OrchestratorError::Backend(_)
        )
    }
}
