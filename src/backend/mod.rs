//! Generation backend boundary.
//!
//! The orchestration core never calls a language model directly. Every
//! collaborator turn goes through the [`GenerationBackend`] trait, which
//! takes a scoped prompt context and the collaborator's declared output
//! schema and returns a structured JSON response. Any provider can sit
//! behind this trait; [`ScriptedBackend`] is the built-in deterministic
//! implementation used for replays and tests.

pub mod scripted;

pub use scripted::ScriptedBackend;

use std::collections::BTreeMap;
use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

use crate::capability::CapabilityTag;
use crate::registry::OutputSchema;

/// Failures reported by a generation backend.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BackendError {
    /// The backend could not be reached or refused the request.
    #[error("generation backend unavailable: {0}")]
    Unavailable(String),

    /// The backend did not answer within its own deadline.
    #[error("generation backend timed out")]
    Timeout,

    /// The backend answered with something that is not structured output.
    #[error("malformed backend response: {0}")]
    Malformed(String),
}

impl BackendError {
    /// Transient failures are retried once per turn by the executor.
    pub fn is_transient(&self) -> bool {
        matches!(self, BackendError::Unavailable(_) | BackendError::Timeout)
    }
}

/// The scoped view handed to the backend for one collaborator turn.
///
/// Contains only the collaborator's declared input keys plus fixed
/// configuration (rubric text, thresholds). Nothing else from the context
/// store leaks across this boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptContext {
    /// Collaborator display name.
    pub collaborator: String,
    /// Capability being invoked.
    pub capability: CapabilityTag,
    /// Declared input keys that are present in the store, in key order.
    pub inputs: BTreeMap<String, Value>,
    /// Opaque rubric text configured for this capability, if any.
    pub rubric: Option<String>,
    /// Minimum acceptable score per criterion (1-7 scale).
    pub adequacy_threshold: u8,
    /// Example under revision, when the turn targets a single example.
    pub target_example: Option<Uuid>,
    /// Set on the corrective retry after a schema validation failure,
    /// describing what was wrong with the previous response.
    pub corrective: Option<String>,
}

/// A pluggable text-generation provider.
///
/// Implementations must surface their own transport timeouts as
/// [`BackendError::Timeout`]; the executor additionally enforces the
/// per-turn budget around this call.
#[async_trait]
pub trait GenerationBackend: Send + Sync + fmt::Debug {
    /// Produce a structured response for one collaborator turn.
    ///
    /// The response must be a JSON object whose top-level fields satisfy
    /// `schema`; fields the collaborator did not declare are dropped by
    /// the executor.
    async fn generate(
        &self,
        prompt: &PromptContext,
        schema: &OutputSchema,
    ) -> Result<Value, BackendError>;
}
