//! The shared context store.
//!
//! A versioned, mutable working set visible to all collaborators for the
//! duration of one session. Keys are namespaced strings; values are JSON.
//! A key may only be written by the collaborator(s) the registry declares
//! as its owner(s). There are no deletions: superseding writes replace the
//! prior value, and the pre-write snapshot kept on each turn record makes
//! rollback possible without store support.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::context::slot::ContextSlot;
use crate::error::OrchestratorError;
use crate::registry::CollaboratorRegistry;

/// Immutable copy of the store contents, taken before every turn.
pub type ContextSnapshot = BTreeMap<String, Value>;

/// Shared working state for one session.
///
/// Deterministic by construction: `BTreeMap` keeps key iteration stable,
/// so scoped views and snapshots are reproducible across replays.
#[derive(Debug, Default)]
pub struct ContextStore {
    slots: BTreeMap<String, ContextSlot>,
    /// Declared owners per key, derived from the registry at session start.
    owners: BTreeMap<String, Vec<String>>,
    /// Keys in write order, superseding writes included.
    trace: Vec<String>,
}

impl ContextStore {
    /// Build a store whose ownership table is derived from a registry.
    pub fn for_registry(registry: &CollaboratorRegistry) -> Self {
        let mut owners: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for descriptor in registry.list() {
            for key in &descriptor.output_keys {
                owners
                    .entry(key.clone())
                    .or_default()
                    .push(descriptor.name.clone());
            }
        }
        Self {
            slots: BTreeMap::new(),
            owners,
            trace: Vec::new(),
        }
    }

    /// Read a value. Absence is a valid, checked state.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.slots.get(key).map(|slot| &slot.value)
    }

    /// Read a slot, including its write provenance.
    pub fn get_slot(&self, key: &str) -> Option<&ContextSlot> {
        self.slots.get(key)
    }

    /// Whether a key has been produced yet.
    pub fn contains(&self, key: &str) -> bool {
        self.slots.contains_key(key)
    }

    /// Write a value on behalf of a collaborator.
    ///
    /// Fails with [`OrchestratorError::OwnershipViolation`] when the
    /// collaborator is not a declared owner of `key`; the store is left
    /// unchanged in that case. Keys with no declared owner at all are
    /// unwritable by anyone.
    pub fn put(
        &mut self,
        collaborator: &str,
        key: &str,
        value: Value,
        turn: u64,
    ) -> Result<(), OrchestratorError> {
        let owned = self
            .owners
            .get(key)
            .is_some_and(|names| names.iter().any(|n| n == collaborator));
        if !owned {
            return Err(OrchestratorError::OwnershipViolation {
                collaborator: collaborator.to_string(),
                key: key.to_string(),
            });
        }
        self.trace.push(key.to_string());
        self.slots
            .insert(key.to_string(), ContextSlot::new(value, collaborator, turn));
        Ok(())
    }

    /// Whether a collaborator is a declared owner of `key`.
    ///
    /// Used to pre-check a whole write set, so a multi-key write-back can
    /// be all-or-nothing.
    pub fn can_write(&self, collaborator: &str, key: &str) -> bool {
        self.owners
            .get(key)
            .is_some_and(|names| names.iter().any(|n| n == collaborator))
    }

    /// Immutable copy of the current contents.
    pub fn snapshot(&self) -> ContextSnapshot {
        self.slots
            .iter()
            .map(|(k, slot)| (k.clone(), slot.value.clone()))
            .collect()
    }

    /// The subset of `keys` that are present, as a scoped view for a prompt.
    pub fn scoped_view(&self, keys: &[String]) -> BTreeMap<String, Value> {
        keys.iter()
            .filter_map(|k| self.get(k).map(|v| (k.clone(), v.clone())))
            .collect()
    }

    /// Keys from `keys` that have not been produced yet.
    pub fn missing_keys(&self, keys: &[String]) -> Vec<String> {
        keys.iter()
            .filter(|k| !self.contains(k))
            .cloned()
            .collect()
    }

    /// Write trace (key per write, in order).
    pub fn trace(&self) -> &[String] {
        &self.trace
    }

    /// Number of distinct keys present.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether no key has been written yet.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
