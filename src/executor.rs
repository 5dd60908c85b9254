//! Turn executor — runs exactly one collaborator turn.
//!
//! A turn sees a scoped view of the store (declared input keys plus fixed
//! configuration), calls the generation backend exactly once per attempt
//! under the per-turn timeout, validates the structured response against
//! the collaborator's declared schema, and writes only declared output
//! keys back. Transient backend failures get one local retry; a schema
//! mismatch gets one corrective re-prompt. The store is mutated only on
//! full success, and a turn record is appended either way.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::backend::{BackendError, GenerationBackend, PromptContext};
use crate::config::OrchestratorConfig;
use crate::context::ContextStore;
use crate::error::OrchestratorError;
use crate::registry::CollaboratorDescriptor;
use crate::turn::TurnRecord;

/// Executes single collaborator turns against the shared store.
#[derive(Debug, Clone)]
pub struct TurnExecutor {
    backend: Arc<dyn GenerationBackend>,
    config: OrchestratorConfig,
}

impl TurnExecutor {
    pub fn new(backend: Arc<dyn GenerationBackend>, config: OrchestratorConfig) -> Self {
        Self { backend, config }
    }

    /// Run one turn for `descriptor`.
    ///
    /// Always appends a [`TurnRecord`] to `records`, success or failure.
    /// On success the validated response is returned and its declared
    /// output keys have been written to the store; on failure the store is
    /// untouched.
    pub async fn run_turn(
        &self,
        descriptor: &CollaboratorDescriptor,
        store: &mut ContextStore,
        records: &mut Vec<TurnRecord>,
        target_example: Option<Uuid>,
    ) -> Result<Value, OrchestratorError> {
        let sequence = records.len() as u64 + 1;
        let snapshot = store.snapshot();

        let mut prompt = PromptContext {
            collaborator: descriptor.name.clone(),
            capability: descriptor.capability,
            inputs: store.scoped_view(&descriptor.input_keys),
            rubric: self
                .config
                .rubric_for(&descriptor.capability.to_string())
                .map(str::to_owned),
            adequacy_threshold: self.config.adequacy_threshold,
            target_example,
            corrective: None,
        };

        match self.call_validated(descriptor, &mut prompt).await {
            Ok(response) => {
                // All-or-nothing write-back of declared keys only.
                for key in &descriptor.output_keys {
                    if response.get(key).is_some() && !store.can_write(&descriptor.name, key) {
                        let err = OrchestratorError::OwnershipViolation {
                            collaborator: descriptor.name.clone(),
                            key: key.clone(),
                        };
                        records.push(TurnRecord::failure(
                            sequence,
                            &descriptor.name,
                            descriptor.capability,
                            snapshot,
                            err.to_string(),
                        ));
                        return Err(err);
                    }
                }
                let undeclared = response
                    .as_object()
                    .map(|obj| {
                        obj.keys()
                            .filter(|k| !descriptor.owns(k))
                            .cloned()
                            .collect::<Vec<_>>()
                    })
                    .unwrap_or_default();
                if !undeclared.is_empty() {
                    debug!(
                        collaborator = %descriptor.name,
                        keys = ?undeclared,
                        "dropping undeclared output keys"
                    );
                }
                for key in &descriptor.output_keys {
                    if let Some(value) = response.get(key) {
                        store.put(&descriptor.name, key, value.clone(), sequence)?;
                    }
                }
                debug!(
                    collaborator = %descriptor.name,
                    capability = %descriptor.capability,
                    sequence,
                    "turn succeeded"
                );
                records.push(TurnRecord::success(
                    sequence,
                    &descriptor.name,
                    descriptor.capability,
                    snapshot,
                    response.clone(),
                ));
                Ok(response)
            }
            Err(err) => {
                warn!(
                    collaborator = %descriptor.name,
                    capability = %descriptor.capability,
                    sequence,
                    error = %err,
                    "turn failed"
                );
                records.push(TurnRecord::failure(
                    sequence,
                    &descriptor.name,
                    descriptor.capability,
                    snapshot,
                    err.to_string(),
                ));
                Err(err)
            }
        }
    }

    /// Call the backend with bounded local retries and schema validation.
    async fn call_validated(
        &self,
        descriptor: &CollaboratorDescriptor,
        prompt: &mut PromptContext,
    ) -> Result<Value, OrchestratorError> {
        let mut response = match self.call_once(descriptor, prompt).await {
            Ok(value) => value,
            Err(err) if err.is_retryable_turn_failure() && !is_malformed(&err) => {
                debug!(
                    capability = %descriptor.capability,
                    error = %err,
                    "transient backend failure, retrying once"
                );
                self.call_once(descriptor, prompt).await?
            }
            Err(OrchestratorError::Backend(BackendError::Malformed(detail))) => {
                // Malformed output gets the corrective retry directly.
                return self.corrective_retry(descriptor, prompt, detail).await;
            }
            Err(err) => return Err(err),
        };

        if let Err(detail) = descriptor.schema.validate(&response) {
            response = self.corrective_retry(descriptor, prompt, detail).await?;
        }
        Ok(response)
    }

    /// One corrective re-prompt after a malformed or schema-invalid
    /// response. The second response must validate or the turn fails.
    async fn corrective_retry(
        &self,
        descriptor: &CollaboratorDescriptor,
        prompt: &mut PromptContext,
        detail: String,
    ) -> Result<Value, OrchestratorError> {
        debug!(
            capability = %descriptor.capability,
            detail = %detail,
            "schema validation failed, issuing corrective re-prompt"
        );
        prompt.corrective = Some(detail);
        let response = self.call_once(descriptor, prompt).await?;
        descriptor.schema.validate(&response).map_err(|detail| {
            OrchestratorError::InvalidOutput {
                collaborator: descriptor.name.clone(),
                detail,
            }
        })?;
        Ok(response)
    }

    /// A single backend call under the per-turn timeout.
    async fn call_once(
        &self,
        descriptor: &CollaboratorDescriptor,
        prompt: &PromptContext,
    ) -> Result<Value, OrchestratorError> {
        match tokio::time::timeout(
            self.config.turn_timeout(),
            self.backend.generate(prompt, &descriptor.schema),
        )
        .await
        {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(err)) => Err(OrchestratorError::Backend(err)),
            Err(_) => Err(OrchestratorError::TurnTimeout(descriptor.capability)),
        }
    }
}

fn is_malformed(err: &OrchestratorError) -> bool {
    matches!(
        err,
        OrchestratorError::Backend(BackendError::Malformed(_))
            | OrchestratorError::InvalidOutput { .. }
    )
}
