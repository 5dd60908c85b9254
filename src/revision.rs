//! Revision cycle manager.
//!
//! Tracks scores per criterion per example, decides when to loop back to
//! the authoring and scoring collaborators, and detects convergence or
//! stagnation. The manager never mutates the context store: it only
//! inspects examples and returns backward-routing plans for the router to
//! honor. Stagnation bounds worst-case turns — an example whose revision
//! passes stop improving is marked stalled and surfaced as an unresolved
//! gap instead of looping forever.

use std::collections::HashMap;

use tracing::{debug, info};
use uuid::Uuid;

use crate::capability::CapabilityTag;
use crate::example::{CriterionScores, ExampleState, StarExample};

/// A backward-routing plan for one example.
///
/// Steps are executed in order by the router: `star-writing` first when
/// the example has content gaps (any criterion below threshold), followed
/// by a narrow re-check of exactly the deficient scoring criteria; a
/// coverage-only gap routes straight to the example's competency
/// capability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevisionPlan {
    pub example_id: Uuid,
    pub steps: Vec<CapabilityTag>,
}

/// Outcome of consulting the manager after scoring / competency checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RevisionVerdict {
    /// Every example is converged or stalled; the workflow may advance.
    AllSettled,
    /// Loop back for the given example.
    Revise(RevisionPlan),
}

#[derive(Debug, Default)]
struct Progress {
    stagnant_passes: u32,
    /// Scores snapshotted when the current plan was issued.
    pending_baseline: Option<CriterionScores>,
}

/// Per-example convergence / stagnation state machine.
#[derive(Debug)]
pub struct RevisionCycleManager {
    adequacy_threshold: u8,
    max_stagnant_passes: u32,
    progress: HashMap<Uuid, Progress>,
    /// Example ids in creation order — the router's deterministic tie-break.
    order: Vec<Uuid>,
}

impl RevisionCycleManager {
    pub fn new(adequacy_threshold: u8, max_stagnant_passes: u32) -> Self {
        Self {
            adequacy_threshold,
            max_stagnant_passes,
            progress: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Register an example when it is first drafted. Idempotent.
    pub fn observe(&mut self, example: &StarExample) {
        if !self.progress.contains_key(&example.id) {
            self.progress.insert(example.id, Progress::default());
            self.order.push(example.id);
        }
    }

    /// Whether a plan has been issued for this example and not yet closed
    /// by [`finish_pass`](Self::finish_pass).
    pub fn has_pending(&self, example_id: Uuid) -> bool {
        self.progress
            .get(&example_id)
            .is_some_and(|p| p.pending_baseline.is_some())
    }

    /// Update example states and return the next backward-routing plan,
    /// if any. Examples are considered in creation order, so identical
    /// collaborator outputs always produce identical routing.
    pub fn evaluate(&mut self, examples: &mut [StarExample]) -> RevisionVerdict {
        for id in &self.order {
            let Some(example) = examples.iter_mut().find(|e| e.id == *id) else {
                continue;
            };
            match example.state {
                ExampleState::Converged | ExampleState::Stalled | ExampleState::Finalized => {
                    continue;
                }
                _ => {}
            }

            if example.is_converged(self.adequacy_threshold) {
                info!(example = %example.id, "example converged");
                example.state = ExampleState::Converged;
                continue;
            }

            let below = example.scores.below(self.adequacy_threshold);
            let mut steps = Vec::new();
            if !below.is_empty() {
                steps.push(CapabilityTag::StarWriting);
                steps.extend(below.iter().map(|c| CapabilityTag::for_criterion(*c)));
            } else {
                // Scores are adequate; only coverage is missing.
                steps.push(CapabilityTag::for_area(example.area));
            }

            example.state = ExampleState::NeedsRevision;
            if let Some(progress) = self.progress.get_mut(&example.id) {
                progress.pending_baseline = Some(example.scores);
            }
            debug!(
                example = %example.id,
                steps = ?steps,
                "issuing revision plan"
            );
            return RevisionVerdict::Revise(RevisionPlan {
                example_id: example.id,
                steps,
            });
        }
        RevisionVerdict::AllSettled
    }

    /// Close out a completed revision pass for an example.
    ///
    /// A pass that does not strictly improve at least one score that was
    /// below threshold when the plan was issued counts as stagnant; after
    /// the configured maximum of consecutive stagnant passes the example
    /// is stalled.
    pub fn finish_pass(&mut self, example: &mut StarExample) {
        let Some(progress) = self.progress.get_mut(&example.id) else {
            return;
        };
        let Some(baseline) = progress.pending_baseline.take() else {
            return;
        };
        example.revision_count += 1;

        let improved = baseline
            .below(self.adequacy_threshold)
            .into_iter()
            .any(|criterion| {
                match (baseline.get(criterion), example.scores.get(criterion)) {
                    (Some(before), Some(after)) => after > before,
                    (None, Some(_)) => true,
                    _ => false,
                }
            });

        if improved {
            progress.stagnant_passes = 0;
        } else {
            progress.stagnant_passes += 1;
            debug!(
                example = %example.id,
                stagnant = progress.stagnant_passes,
                "stagnant revision pass"
            );
        }

        if progress.stagnant_passes >= self.max_stagnant_passes {
            info!(example = %example.id, "example stalled after stagnant passes");
            example.state = ExampleState::Stalled;
        }
    }

    /// Whether every observed example has reached a settled state.
    pub fn all_settled(&self, examples: &[StarExample]) -> bool {
        examples.iter().all(|e| {
            matches!(
                e.state,
                ExampleState::Converged | ExampleState::Stalled | ExampleState::Finalized
            )
        })
    }
}
