//! Append-only turn records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::capability::CapabilityTag;
use crate::context::ContextSnapshot;

/// Immutable log entry for one collaborator turn, success or failure.
///
/// Records are append-only and never mutated after creation. The input
/// snapshot is taken before the turn runs, so a failed turn can be
/// audited (and the store rolled back) against the exact state it saw.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnRecord {
    /// Strictly increasing, gap-free sequence number (starting at 1).
    pub sequence: u64,
    /// Collaborator display name.
    pub collaborator: String,
    /// Capability invoked.
    pub capability: CapabilityTag,
    /// Store contents before the turn ran.
    pub input_snapshot: ContextSnapshot,
    /// Validated structured output, present only on success.
    pub output: Option<Value>,
    /// Whether the turn succeeded.
    pub success: bool,
    /// Failure description for unsuccessful turns.
    pub error: Option<String>,
    /// When the record was appended.
    pub timestamp: DateTime<Utc>,
}

impl TurnRecord {
    /// Record a successful turn.
    pub fn success(
        sequence: u64,
        collaborator: impl Into<String>,
        capability: CapabilityTag,
        input_snapshot: ContextSnapshot,
        output: Value,
    ) -> Self {
        Self {
            sequence,
            collaborator: collaborator.into(),
            capability,
            input_snapshot,
            output: Some(output),
            success: true,
            error: None,
            timestamp: Utc::now(),
        }
    }

    /// Record a failed turn.
    pub fn failure(
        sequence: u64,
        collaborator: impl Into<String>,
        capability: CapabilityTag,
        input_snapshot: ContextSnapshot,
        error: impl Into<String>,
    ) -> Self {
        Self {
            sequence,
            collaborator: collaborator.into(),
            capability,
            input_snapshot,
            output: None,
            success: false,
            error: Some(error.into()),
            timestamp: Utc::now(),
        }
    }
}
