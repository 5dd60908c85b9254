//! Context slots — one value plus write provenance.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Provenance metadata recorded with every write.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotMeta {
    /// Name of the collaborator that wrote the value.
    pub source: String,
    /// Turn sequence number of the write.
    pub turn: u64,
    /// Wall-clock time of the write.
    pub written_at: DateTime<Utc>,
}

/// A single entry in the shared context store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextSlot {
    pub value: Value,
    pub meta: SlotMeta,
}

impl ContextSlot {
    pub fn new(value: Value, source: impl Into<String>, turn: u64) -> Self {
        Self {
            value,
            meta: SlotMeta {
                source: source.into(),
                turn,
                written_at: Utc::now(),
            },
        }
    }
}
