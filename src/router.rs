//! Router — decides which collaborator runs next.
//!
//! The decision is a deterministic function of the current workflow
//! stage, the context store contents, and the revision cycle manager's
//! verdicts. A stage whose mandatory output keys are still absent after a
//! turn attempt gets the same capability re-routed up to a bounded retry
//! count, then escalates to `StageBlocked`. After scoring and competency
//! checks the router consults the revision cycle manager and honors any
//! backward-routing plan it returns, forcing the stage back to
//! `star-writing` or `scoring` for the targeted example.

use std::collections::HashMap;

use tracing::debug;
use uuid::Uuid;

use crate::capability::{CapabilityTag, CompetencyArea, ScoringCriterion};
use crate::context::{keys, ContextStore};
use crate::error::OrchestratorError;
use crate::example::StarExample;
use crate::revision::{RevisionCycleManager, RevisionPlan, RevisionVerdict};
use crate::stage::WorkflowStage;

/// What the session loop should do next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    /// Invoke a collaborator. `stage` is the stage the session is in
    /// while the turn runs (backward transitions surface here).
    Run {
        capability: CapabilityTag,
        stage: WorkflowStage,
        target: Option<Uuid>,
    },
    /// Move to a new stage without spending a turn.
    Advance(WorkflowStage),
    /// The workflow is finalized.
    Finished,
}

#[derive(Debug)]
struct ActivePlan {
    plan: RevisionPlan,
    step: usize,
}

/// Deterministic next-collaborator selector.
#[derive(Debug)]
pub struct Router {
    stage_retry_limit: u32,
    /// Attempts issued per capability since its last success.
    attempts: HashMap<CapabilityTag, u32>,
    plan: Option<ActivePlan>,
    /// Set when a revision plan's last step succeeds; drained by the session.
    completed_plan: Option<Uuid>,
}

impl Router {
    pub fn new(stage_retry_limit: u32) -> Self {
        Self {
            stage_retry_limit,
            attempts: HashMap::new(),
            plan: None,
            completed_plan: None,
        }
    }

    /// Decide the next move.
    pub fn decide(
        &mut self,
        stage: WorkflowStage,
        store: &ContextStore,
        examples: &mut [StarExample],
        revision: &mut RevisionCycleManager,
    ) -> Result<RouteDecision, OrchestratorError> {
        // An in-flight revision plan takes precedence over forward flow.
        if let Some(active) = &self.plan {
            let capability = active.plan.steps[active.step];
            let target = active.plan.example_id;
            let step_stage = plan_step_stage(capability);
            return self.issue(capability, step_stage, Some(target), vec![]);
        }

        match stage {
            WorkflowStage::Intake => Ok(RouteDecision::Advance(WorkflowStage::Readiness)),
            WorkflowStage::Readiness => self.forward_step(
                stage,
                CapabilityTag::Readiness,
                &[keys::READINESS_ASSESSMENT],
                WorkflowStage::PositionAnalysis,
                store,
            ),
            WorkflowStage::PositionAnalysis => self.forward_step(
                stage,
                CapabilityTag::PositionAnalysis,
                &[keys::POSITION_ANALYSIS],
                WorkflowStage::ExampleSelection,
                store,
            ),
            WorkflowStage::ExampleSelection => self.forward_step(
                stage,
                CapabilityTag::ExampleSelection,
                &[keys::EXAMPLE_SELECTION],
                WorkflowStage::StarWriting,
                store,
            ),
            WorkflowStage::StarWriting => self.forward_step(
                stage,
                CapabilityTag::StarWriting,
                &[keys::EXAMPLE_DRAFTS],
                WorkflowStage::Scoring,
                store,
            ),
            WorkflowStage::Scoring => {
                for criterion in ScoringCriterion::ALL {
                    let key = keys::score_key(criterion);
                    if !store.contains(key) {
                        return self.issue(
                            CapabilityTag::for_criterion(criterion),
                            stage,
                            None,
                            vec![key.to_string()],
                        );
                    }
                }
                Ok(RouteDecision::Advance(WorkflowStage::CompetencyCheck))
            }
            WorkflowStage::CompetencyCheck => {
                for area in areas_present(examples) {
                    let key = keys::competency_key(area);
                    if !store.contains(key) {
                        return self.issue(
                            CapabilityTag::for_area(area),
                            stage,
                            None,
                            vec![key.to_string()],
                        );
                    }
                }
                self.consult_revision(examples, revision)
            }
            WorkflowStage::Revision => self.consult_revision(examples, revision),
            WorkflowStage::SkillsArticulation => self.forward_step(
                stage,
                CapabilityTag::TransferableSkills,
                &[keys::TRANSFERABLE_SKILLS],
                WorkflowStage::QualityAssurance,
                store,
            ),
            // Quality-assurance success is the only path to `finalized`.
            WorkflowStage::QualityAssurance => self.forward_step(
                stage,
                CapabilityTag::QualityAssurance,
                &[keys::QA_REVIEW],
                WorkflowStage::Finalized,
                store,
            ),
            WorkflowStage::Finalized => Ok(RouteDecision::Finished),
        }
    }

    /// Report the outcome of the last issued turn.
    ///
    /// Successful turns clear the capability's retry counter and advance
    /// an in-flight revision plan; failed turns leave both in place so the
    /// next `decide` re-routes (bounded by the retry limit).
    pub fn note_turn(&mut self, capability: CapabilityTag, success: bool) {
        if !success {
            return;
        }
        self.attempts.remove(&capability);
        if let Some(active) = &mut self.plan {
            if active.plan.steps[active.step] == capability {
                active.step += 1;
                if active.step == active.plan.steps.len() {
                    debug!(example = %active.plan.example_id, "revision plan complete");
                    self.completed_plan = Some(active.plan.example_id);
                    self.plan = None;
                }
            }
        }
    }

    /// The example whose revision plan just completed, if any. Draining
    /// this is the session's cue to close the pass with the revision
    /// cycle manager.
    pub fn take_completed_plan(&mut self) -> Option<Uuid> {
        self.completed_plan.take()
    }

    fn consult_revision(
        &mut self,
        examples: &mut [StarExample],
        revision: &mut RevisionCycleManager,
    ) -> Result<RouteDecision, OrchestratorError> {
        match revision.evaluate(examples) {
            RevisionVerdict::AllSettled => {
                Ok(RouteDecision::Advance(WorkflowStage::SkillsArticulation))
            }
            RevisionVerdict::Revise(plan) => {
                debug!(example = %plan.example_id, steps = ?plan.steps, "honoring backward route");
                self.plan = Some(ActivePlan { plan, step: 0 });
                Ok(RouteDecision::Advance(WorkflowStage::Revision))
            }
        }
    }

    /// Forward flow for stages with a single driving capability: advance
    /// when every mandatory key is present, otherwise re-route with
    /// bounded retries.
    fn forward_step(
        &mut self,
        stage: WorkflowStage,
        capability: CapabilityTag,
        mandatory_keys: &[&str],
        next: WorkflowStage,
        store: &ContextStore,
    ) -> Result<RouteDecision, OrchestratorError> {
        let missing: Vec<String> = mandatory_keys
            .iter()
            .filter(|k| !store.contains(k))
            .map(|k| k.to_string())
            .collect();
        if missing.is_empty() {
            return Ok(RouteDecision::Advance(next));
        }
        self.issue(capability, stage, None, missing)
    }

    fn issue(
        &mut self,
        capability: CapabilityTag,
        stage: WorkflowStage,
        target: Option<Uuid>,
        missing_keys: Vec<String>,
    ) -> Result<RouteDecision, OrchestratorError> {
        let attempts = self.attempts.entry(capability).or_insert(0);
        if *attempts >= self.stage_retry_limit {
            return Err(OrchestratorError::StageBlocked {
                stage,
                missing_keys,
                attempts: *attempts,
            });
        }
        *attempts += 1;
        debug!(
            capability = %capability,
            stage = %stage,
            attempt = *attempts,
            "routing to collaborator"
        );
        Ok(RouteDecision::Run {
            capability,
            stage,
            target,
        })
    }
}

/// Stage the session sits in while a revision-plan step runs. Backward
/// transitions only ever target `star-writing` or `scoring`; competency
/// re-checks keep the session at `competency-check`.
fn plan_step_stage(capability: CapabilityTag) -> WorkflowStage {
    if capability == CapabilityTag::StarWriting {
        WorkflowStage::StarWriting
    } else if capability.scoring_criterion().is_some() {
        WorkflowStage::Scoring
    } else {
        WorkflowStage::CompetencyCheck
    }
}

/// LC4Q areas with at least one example, in fixed area order.
fn areas_present(examples: &[StarExample]) -> Vec<CompetencyArea> {
    CompetencyArea::ALL
        .into_iter()
        .filter(|area| examples.iter().any(|e| e.area == *area))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::example::ExampleState;
    use crate::registry::CollaboratorRegistry;
    use serde_json::json;

    fn store() -> ContextStore {
        ContextStore::for_registry(&CollaboratorRegistry::default_roster().unwrap())
    }

    fn seeded_example(context: u8) -> StarExample {
        let mut example = StarExample::new("ka-1", CompetencyArea::Results);
        example.scores.set(ScoringCriterion::Context, context);
        example.scores.set(ScoringCriterion::Complexity, 5);
        example.scores.set(ScoringCriterion::Initiative, 6);
        example.state = ExampleState::Scored;
        example
    }

    #[test]
    fn test_intake_advances_without_a_turn() {
        let mut router = Router::new(3);
        let mut revision = RevisionCycleManager::new(4, 3);
        let decision = router
            .decide(WorkflowStage::Intake, &store(), &mut [], &mut revision)
            .unwrap();
        assert_eq!(decision, RouteDecision::Advance(WorkflowStage::Readiness));
    }

    #[test]
    fn test_missing_mandatory_key_routes_to_stage_capability() {
        let mut router = Router::new(3);
        let mut revision = RevisionCycleManager::new(4, 3);
        let decision = router
            .decide(WorkflowStage::Readiness, &store(), &mut [], &mut revision)
            .unwrap();
        assert_eq!(
            decision,
            RouteDecision::Run {
                capability: CapabilityTag::Readiness,
                stage: WorkflowStage::Readiness,
                target: None,
            }
        );
    }

    #[test]
    fn test_repeated_failures_escalate_to_stage_blocked() {
        let mut router = Router::new(3);
        let mut revision = RevisionCycleManager::new(4, 3);
        let store = store();

        for _ in 0..3 {
            let decision = router
                .decide(WorkflowStage::PositionAnalysis, &store, &mut [], &mut revision)
                .unwrap();
            assert!(matches!(decision, RouteDecision::Run { .. }));
            router.note_turn(CapabilityTag::PositionAnalysis, false);
        }

        let err = router
            .decide(WorkflowStage::PositionAnalysis, &store, &mut [], &mut revision)
            .unwrap_err();
        match err {
            OrchestratorError::StageBlocked {
                stage,
                missing_keys,
                attempts,
            } => {
                assert_eq!(stage, WorkflowStage::PositionAnalysis);
                assert_eq!(missing_keys, vec![keys::POSITION_ANALYSIS.to_string()]);
                assert_eq!(attempts, 3);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_success_resets_retry_counter() {
        let mut router = Router::new(1);
        let mut revision = RevisionCycleManager::new(4, 3);
        let store = store();

        let _ = router
            .decide(WorkflowStage::Readiness, &store, &mut [], &mut revision)
            .unwrap();
        router.note_turn(CapabilityTag::Readiness, true);
        // Counter cleared: another Run can be issued.
        let decision = router
            .decide(WorkflowStage::Readiness, &store, &mut [], &mut revision)
            .unwrap();
        assert!(matches!(decision, RouteDecision::Run { .. }));
    }

    #[test]
    fn test_scoring_routes_criteria_in_fixed_order() {
        let mut router = Router::new(3);
        let mut revision = RevisionCycleManager::new(4, 3);
        let mut store = store();

        let decision = router
            .decide(WorkflowStage::Scoring, &store, &mut [], &mut revision)
            .unwrap();
        assert!(matches!(
            decision,
            RouteDecision::Run {
                capability: CapabilityTag::ContextScoring,
                ..
            }
        ));

        store
            .put("ContextScoring", keys::SCORES_CONTEXT, json!({}), 1)
            .unwrap();
        let decision = router
            .decide(WorkflowStage::Scoring, &store, &mut [], &mut revision)
            .unwrap();
        assert!(matches!(
            decision,
            RouteDecision::Run {
                capability: CapabilityTag::ComplexityScoring,
                ..
            }
        ));
    }

    #[test]
    fn test_backward_route_forces_star_writing_stage() {
        let mut router = Router::new(3);
        let mut revision = RevisionCycleManager::new(4, 3);
        let mut store = store();
        for (name, key) in [
            ("ContextScoring", keys::SCORES_CONTEXT),
            ("ComplexityScoring", keys::SCORES_COMPLEXITY),
            ("InitiativeScoring", keys::SCORES_INITIATIVE),
            ("ResultsCompetency", keys::COMPETENCY_RESULTS),
        ] {
            store.put(name, key, json!({}), 1).unwrap();
        }
        let mut examples = vec![seeded_example(3)];
        revision.observe(&examples[0]);

        let decision = router
            .decide(
                WorkflowStage::CompetencyCheck,
                &store,
                &mut examples,
                &mut revision,
            )
            .unwrap();
        assert_eq!(decision, RouteDecision::Advance(WorkflowStage::Revision));

        // First plan step: backward to star-writing for the target example.
        let decision = router
            .decide(WorkflowStage::Revision, &store, &mut examples, &mut revision)
            .unwrap();
        assert_eq!(
            decision,
            RouteDecision::Run {
                capability: CapabilityTag::StarWriting,
                stage: WorkflowStage::StarWriting,
                target: Some(examples[0].id),
            }
        );
        router.note_turn(CapabilityTag::StarWriting, true);

        // Second step: narrow context re-score.
        let decision = router
            .decide(WorkflowStage::StarWriting, &store, &mut examples, &mut revision)
            .unwrap();
        assert_eq!(
            decision,
            RouteDecision::Run {
                capability: CapabilityTag::ContextScoring,
                stage: WorkflowStage::Scoring,
                target: Some(examples[0].id),
            }
        );
        router.note_turn(CapabilityTag::ContextScoring, true);
        assert_eq!(router.take_completed_plan(), Some(examples[0].id));
    }

    #[test]
    fn test_all_settled_advances_to_skills() {
        let mut router = Router::new(3);
        let mut revision = RevisionCycleManager::new(4, 3);
        let mut examples = vec![seeded_example(5)];
        revision.observe(&examples[0]);

        let decision = router
            .decide(
                WorkflowStage::Revision,
                &store(),
                &mut examples,
                &mut revision,
            )
            .unwrap();
        assert_eq!(
            decision,
            RouteDecision::Advance(WorkflowStage::SkillsArticulation)
        );
    }

    #[test]
    fn test_finalized_is_terminal() {
        let mut router = Router::new(3);
        let mut revision = RevisionCycleManager::new(4, 3);
        let decision = router
            .decide(WorkflowStage::Finalized, &store(), &mut [], &mut revision)
            .unwrap();
        assert_eq!(decision, RouteDecision::Finished);
    }
}
