//! Session controller — owns the top-level workflow loop.
//!
//! One controller runs one logical session at a time: strict turn
//! serialization means no locks are needed within a session, but a
//! reentrancy guard rejects a second concurrent `start()` on the same
//! session id with `SessionBusy` instead of corrupting the turn record
//! sequence. Two independent budgets bound every run — a maximum turn
//! count and a wall-clock deadline — and exhausting either produces a
//! `timed_out` report assembled from whatever examples already converged.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::time::Instant;
use tracing::{info, warn};
use uuid::Uuid;

use crate::backend::GenerationBackend;
use crate::capability::CapabilityTag;
use crate::config::OrchestratorConfig;
use crate::context::{keys, ContextStore};
use crate::error::OrchestratorError;
use crate::example::{ExampleState, StarExample};
use crate::executor::TurnExecutor;
use crate::profile::SessionInput;
use crate::registry::CollaboratorRegistry;
use crate::report::{coverage_matrix, ExampleReport, SessionReport};
use crate::revision::RevisionCycleManager;
use crate::router::{RouteDecision, Router};
use crate::stage::WorkflowStage;
use crate::turn::TurnRecord;

/// Terminal status of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Running,
    Completed,
    Failed,
    TimedOut,
}

/// Root aggregate for one run: working state plus the turn history.
#[derive(Debug)]
pub struct Session {
    pub id: Uuid,
    pub stage: WorkflowStage,
    pub turn_count: u32,
    pub started_at: DateTime<Utc>,
    pub status: SessionStatus,
    pub store: ContextStore,
    pub records: Vec<TurnRecord>,
    pub examples: Vec<StarExample>,
}

impl Session {
    fn new(id: Uuid, store: ContextStore) -> Self {
        Self {
            id,
            stage: WorkflowStage::Intake,
            turn_count: 0,
            started_at: Utc::now(),
            status: SessionStatus::Running,
            store,
            records: Vec::new(),
            examples: Vec::new(),
        }
    }
}

/// Cooperative cancellation handle for a running session.
///
/// Checked at the top of each loop iteration; a cancel never interrupts a
/// turn already in flight.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Drops the busy flag even when `start` exits early.
struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Owns the overall run: start, budget enforcement, terminal states, and
/// final report assembly.
#[derive(Debug)]
pub struct SessionController {
    id: Uuid,
    config: OrchestratorConfig,
    registry: CollaboratorRegistry,
    backend: Arc<dyn GenerationBackend>,
    busy: AtomicBool,
    cancel: CancelToken,
}

impl SessionController {
    pub fn new(
        config: OrchestratorConfig,
        registry: CollaboratorRegistry,
        backend: Arc<dyn GenerationBackend>,
    ) -> Result<Self, OrchestratorError> {
        config.validate()?;
        Ok(Self {
            id: Uuid::new_v4(),
            config,
            registry,
            backend,
            busy: AtomicBool::new(false),
            cancel: CancelToken::new(),
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Handle for cooperative early termination.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Run the workflow to a terminal state and assemble the report.
    ///
    /// Fails fast with `SessionBusy` when a run is already in flight.
    /// Configuration and programming errors (ownership violations,
    /// unresolvable capabilities) propagate as `Err`; every other outcome
    /// — including `failed` and `timed_out` — is reported through the
    /// returned [`SessionReport`].
    pub async fn start(
        &self,
        input: SessionInput,
    ) -> Result<SessionReport, OrchestratorError> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(OrchestratorError::SessionBusy(self.id));
        }
        let _guard = BusyGuard(&self.busy);

        let deadline = Instant::now() + self.config.session_timeout();
        let mut session = Session::new(self.id, ContextStore::for_registry(&self.registry));
        info!(session = %session.id, "session started");

        // Seed the intake payloads on behalf of the orchestrator, which
        // owns both keys.
        let orchestrator = self.registry.resolve(CapabilityTag::Orchestrator)?;
        session.store.put(
            &orchestrator.name,
            keys::INTAKE_PROFILE,
            serde_json::to_value(&input.profile)?,
            0,
        )?;
        session.store.put(
            &orchestrator.name,
            keys::INTAKE_POSITION,
            serde_json::to_value(&input.position)?,
            0,
        )?;

        let executor = TurnExecutor::new(self.backend.clone(), self.config.clone());
        let mut router = Router::new(self.config.stage_retry_limit);
        let mut revision = RevisionCycleManager::new(
            self.config.adequacy_threshold,
            self.config.max_stagnant_passes,
        );
        let mut failure: Option<String> = None;

        let status = loop {
            if self.cancel.is_cancelled() {
                info!(session = %session.id, "session cancelled");
                failure = Some("cancelled by caller".into());
                break SessionStatus::Failed;
            }
            if session.turn_count >= self.config.max_turns || Instant::now() >= deadline {
                warn!(session = %session.id, turns = session.turn_count, "budget exhausted");
                break SessionStatus::TimedOut;
            }

            let decision = match router.decide(
                session.stage,
                &session.store,
                &mut session.examples,
                &mut revision,
            ) {
                Ok(decision) => decision,
                Err(err @ OrchestratorError::StageBlocked { .. }) => {
                    warn!(session = %session.id, error = %err, "stage blocked");
                    failure = Some(err.to_string());
                    break SessionStatus::Failed;
                }
                Err(err) => return Err(err),
            };

            match decision {
                RouteDecision::Finished => break SessionStatus::Completed,
                RouteDecision::Advance(next) => {
                    session.stage = next;
                }
                RouteDecision::Run {
                    capability,
                    stage,
                    target,
                } => {
                    session.stage = stage;
                    let descriptor = self.registry.resolve(capability)?;
                    let outcome = executor
                        .run_turn(
                            descriptor,
                            &mut session.store,
                            &mut session.records,
                            target,
                        )
                        .await;
                    session.turn_count += 1;

                    match outcome {
                        Ok(_) => {
                            router.note_turn(capability, true);
                            self.apply_outputs(capability, &mut session, &mut revision, &input);
                            if let Some(example_id) = router.take_completed_plan() {
                                if let Some(example) = session
                                    .examples
                                    .iter_mut()
                                    .find(|e| e.id == example_id)
                                {
                                    revision.finish_pass(example);
                                }
                            }
                        }
                        Err(err) if err.is_retryable_turn_failure() => {
                            router.note_turn(capability, false);
                        }
                        Err(err) => return Err(err),
                    }
                }
            }
        };

        session.status = status;
        Ok(self.assemble_report(session, &input, failure))
    }

    /// Fold a successful turn's context writes back into the domain state.
    ///
    /// Across the backend boundary examples are identified by their Key
    /// Accountability id; the internal uuid never leaves the core.
    fn apply_outputs(
        &self,
        capability: CapabilityTag,
        session: &mut Session,
        revision: &mut RevisionCycleManager,
        input: &SessionInput,
    ) {
        if capability == CapabilityTag::StarWriting {
            let Some(drafts) = session
                .store
                .get(keys::EXAMPLE_DRAFTS)
                .and_then(Value::as_array)
                .cloned()
            else {
                return;
            };
            for draft in &drafts {
                let Some(accountability_id) =
                    draft.get("accountability_id").and_then(Value::as_str)
                else {
                    warn!("draft without accountability_id dropped");
                    continue;
                };
                if let Some(example) = session
                    .examples
                    .iter_mut()
                    .find(|e| e.accountability_id == accountability_id)
                {
                    example.apply_draft(draft);
                    continue;
                }
                let Some(ka) = input.position.accountability(accountability_id) else {
                    warn!(
                        accountability = accountability_id,
                        "draft references unknown accountability, dropped"
                    );
                    continue;
                };
                let mut example = StarExample::new(&ka.id, ka.area);
                example.required_competencies = ka.competency_items.clone();
                example.apply_draft(draft);
                revision.observe(&example);
                session.examples.push(example);
            }
        } else if let Some(criterion) = capability.scoring_criterion() {
            let Some(scores) = session
                .store
                .get(keys::score_key(criterion))
                .and_then(Value::as_object)
                .cloned()
            else {
                return;
            };
            for (accountability_id, entry) in &scores {
                // Accept either a bare integer or an object with a
                // `score` field alongside feedback text.
                let score = entry
                    .as_u64()
                    .or_else(|| entry.get("score").and_then(Value::as_u64));
                let Some(score @ 1..=7) = score else {
                    warn!(
                        accountability = %accountability_id,
                        criterion = %criterion,
                        "score missing or out of 1-7 range, ignored"
                    );
                    continue;
                };
                if let Some(example) = session
                    .examples
                    .iter_mut()
                    .find(|e| &e.accountability_id == accountability_id)
                {
                    example.scores.set(criterion, score as u8);
                    if example.state == ExampleState::Drafted {
                        example.state = ExampleState::Scored;
                    }
                }
            }
        } else if let Some(area) = capability.competency_area() {
            let Some(coverage) = session
                .store
                .get(keys::competency_key(area))
                .and_then(Value::as_object)
                .cloned()
            else {
                return;
            };
            for (accountability_id, items) in &coverage {
                let Some(items) = items.as_array() else {
                    continue;
                };
                if let Some(example) = session
                    .examples
                    .iter_mut()
                    .find(|e| &e.accountability_id == accountability_id)
                {
                    example.covered_competencies = items
                        .iter()
                        .filter_map(Value::as_str)
                        .map(str::to_owned)
                        .collect();
                }
            }
        }
    }

    fn assemble_report(
        &self,
        mut session: Session,
        input: &SessionInput,
        failure: Option<String>,
    ) -> SessionReport {
        // Freeze converged examples; everything else is an unresolved gap.
        for example in &mut session.examples {
            if example.state == ExampleState::Converged {
                example.state = ExampleState::Finalized;
            }
        }
        let unresolved: Vec<Uuid> = session
            .examples
            .iter()
            .filter(|e| e.state != ExampleState::Finalized)
            .map(|e| e.id)
            .collect();

        info!(
            session = %session.id,
            status = ?session.status,
            turns = session.turn_count,
            unresolved = unresolved.len(),
            "session finished"
        );

        SessionReport {
            session_id: session.id,
            status: session.status,
            turns_taken: session.turn_count,
            started_at: session.started_at,
            finished_at: Utc::now(),
            readiness: session.store.get(keys::READINESS_ASSESSMENT).cloned(),
            examples: session.examples.iter().map(ExampleReport::from).collect(),
            coverage: coverage_matrix(&input.position, &session.examples),
            unresolved,
            transferable_skills: session.store.get(keys::TRANSFERABLE_SKILLS).cloned(),
            quality_assurance: session.store.get(keys::QA_REVIEW).cloned(),
            failure,
            records: session.records,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{BackendError, PromptContext, ScriptedBackend};
    use crate::capability::CompetencyArea;
    use crate::profile::{KeyAccountability, PositionRequirements, UserProfile};
    use crate::registry::OutputSchema;
    use async_trait::async_trait;
    use futures::FutureExt;
    use serde_json::json;
    use std::collections::BTreeMap;
    use std::time::Duration;

    fn input_with_kas(kas: Vec<KeyAccountability>) -> SessionInput {
        SessionInput {
            profile: UserProfile {
                name: "A. Officer".into(),
                current_rank: "Senior Constable".into(),
                years_of_service: 9,
                experience: vec![],
            },
            position: PositionRequirements {
                position_title: "Sergeant".into(),
                rank_level: "SGT".into(),
                key_accountabilities: kas,
                location_factors: BTreeMap::new(),
                operational_priorities: vec![],
            },
        }
    }

    fn single_ka_input() -> SessionInput {
        input_with_kas(vec![KeyAccountability {
            id: "ka-1".into(),
            area: CompetencyArea::Results,
            statement: "Lead frontline teams".into(),
            competency_items: vec!["Inspires others".into()],
        }])
    }

    fn draft(accountability_id: &str) -> Value {
        json!({
            "accountability_id": accountability_id,
            "year_rank_location": "2023 - Senior Constable - Brisbane",
            "situation": "s",
            "task": "t",
            "action": "a",
            "result": "r",
            "word_count": 240
        })
    }

    /// Queue a full run where the first scoring pass gives (3, 5, 6) and
    /// the revision pass lifts context to 4.
    fn push_revision_scenario(backend: &ScriptedBackend) {
        backend.push(json!({ keys::READINESS_ASSESSMENT: {"readiness_score": 8} }));
        backend.push(json!({ keys::POSITION_ANALYSIS: {"rank_level": "SGT"} }));
        backend.push(json!({ keys::EXAMPLE_SELECTION: {"recommended": {"ka-1": "op"}} }));
        backend.push(json!({ keys::EXAMPLE_DRAFTS: [draft("ka-1")] }));
        backend.push(json!({ keys::SCORES_CONTEXT: {"ka-1": 3} }));
        backend.push(json!({ keys::SCORES_COMPLEXITY: {"ka-1": 5} }));
        backend.push(json!({ keys::SCORES_INITIATIVE: {"ka-1": 6} }));
        backend.push(json!({ keys::COMPETENCY_RESULTS: {"ka-1": ["Inspires others"]} }));
        // Revision pass: rewritten draft, then the narrow context re-score.
        backend.push(json!({ keys::EXAMPLE_DRAFTS: [draft("ka-1")] }));
        backend.push(json!({ keys::SCORES_CONTEXT: {"ka-1": 4} }));
        backend.push(json!({ keys::TRANSFERABLE_SKILLS: {"skills": ["leadership"]} }));
        backend.push(json!({ keys::QA_REVIEW: {"overall_quality": 9} }));
    }

    fn init_tracing() {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    }

    fn controller(backend: Arc<dyn GenerationBackend>) -> SessionController {
        init_tracing();
        SessionController::new(
            OrchestratorConfig::default(),
            CollaboratorRegistry::default_roster().unwrap(),
            backend,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_revision_scenario_converges_after_one_backward_route() {
        let backend = Arc::new(ScriptedBackend::new());
        push_revision_scenario(&backend);
        let controller = controller(backend.clone());

        let report = controller.start(single_ka_input()).await.unwrap();

        assert_eq!(report.status, SessionStatus::Completed);
        assert_eq!(report.turns_taken, 12);
        assert_eq!(backend.remaining(), 0);

        let example = &report.examples[0];
        assert_eq!(example.state, ExampleState::Finalized);
        assert_eq!(example.scores.context, Some(4));
        assert_eq!(example.scores.complexity, Some(5));
        assert_eq!(example.scores.initiative, Some(6));
        assert_eq!(example.revision_count, 1);
        assert!(report.unresolved.is_empty());

        // Exactly one backward-routing event: star-writing and the
        // context scorer each ran twice.
        let star_turns = report
            .records
            .iter()
            .filter(|r| r.capability == CapabilityTag::StarWriting)
            .count();
        let context_turns = report
            .records
            .iter()
            .filter(|r| r.capability == CapabilityTag::ContextScoring)
            .count();
        assert_eq!(star_turns, 2);
        assert_eq!(context_turns, 2);

        // Coverage matrix has the single converged accountability.
        assert_eq!(report.coverage.len(), 1);
        assert!(report.coverage[0].converged);
    }

    #[tokio::test]
    async fn test_turn_records_are_strictly_increasing_and_gap_free() {
        let backend = Arc::new(ScriptedBackend::new());
        push_revision_scenario(&backend);
        let controller = controller(backend);

        let report = controller.start(single_ka_input()).await.unwrap();
        for (i, record) in report.records.iter().enumerate() {
            assert_eq!(record.sequence, i as u64 + 1);
        }
    }

    #[tokio::test]
    async fn test_replaying_the_same_script_is_deterministic() {
        let run = || async {
            let backend = Arc::new(ScriptedBackend::new());
            push_revision_scenario(&backend);
            controller(backend).start(single_ka_input()).await.unwrap()
        };
        let first = run().await;
        let second = run().await;

        let project = |report: &SessionReport| {
            (
                report.status,
                report.turns_taken,
                report
                    .records
                    .iter()
                    .map(|r| (r.sequence, r.collaborator.clone(), r.capability, r.success))
                    .collect::<Vec<_>>(),
                report
                    .examples
                    .iter()
                    .map(|e| {
                        (
                            e.accountability_id.clone(),
                            e.scores,
                            e.revision_count,
                            e.state,
                        )
                    })
                    .collect::<Vec<_>>(),
            )
        };
        assert_eq!(project(&first), project(&second));
    }

    #[tokio::test]
    async fn test_blocked_stage_fails_session_with_diagnostics() {
        let backend = Arc::new(ScriptedBackend::with_fallback(|_prompt| {
            Err(BackendError::Unavailable("provider down".into()))
        }));
        backend.push(json!({ keys::READINESS_ASSESSMENT: {"readiness_score": 8} }));
        let controller = controller(backend);

        let report = controller.start(single_ka_input()).await.unwrap();

        assert_eq!(report.status, SessionStatus::Failed);
        let failure = report.failure.unwrap();
        assert!(failure.contains("position-analysis"), "failure: {failure}");
        assert!(failure.contains(keys::POSITION_ANALYSIS), "failure: {failure}");
        // One readiness turn plus three failed position-analysis attempts.
        assert_eq!(report.turns_taken, 4);
        assert!(report.records[1..].iter().all(|r| !r.success));
    }

    #[tokio::test]
    async fn test_never_improving_example_stalls_and_is_reported_unresolved() {
        let backend = Arc::new(ScriptedBackend::with_fallback(|prompt: &PromptContext| {
            Ok(match prompt.capability {
                CapabilityTag::Readiness => {
                    json!({ keys::READINESS_ASSESSMENT: {"readiness_score": 6} })
                }
                CapabilityTag::PositionAnalysis => {
                    json!({ keys::POSITION_ANALYSIS: {"rank_level": "SGT"} })
                }
                CapabilityTag::ExampleSelection => {
                    json!({ keys::EXAMPLE_SELECTION: {"recommended": {}} })
                }
                CapabilityTag::StarWriting => json!({ keys::EXAMPLE_DRAFTS: [draft("ka-1")] }),
                // Context never improves.
                CapabilityTag::ContextScoring => json!({ keys::SCORES_CONTEXT: {"ka-1": 3} }),
                CapabilityTag::ComplexityScoring => {
                    json!({ keys::SCORES_COMPLEXITY: {"ka-1": 5} })
                }
                CapabilityTag::InitiativeScoring => {
                    json!({ keys::SCORES_INITIATIVE: {"ka-1": 6} })
                }
                CapabilityTag::ResultsCompetency => {
                    json!({ keys::COMPETENCY_RESULTS: {"ka-1": ["Inspires others"]} })
                }
                CapabilityTag::TransferableSkills => {
                    json!({ keys::TRANSFERABLE_SKILLS: {"skills": []} })
                }
                CapabilityTag::QualityAssurance => json!({ keys::QA_REVIEW: {"overall_quality": 7} }),
                other => panic!("unexpected capability {other}"),
            })
        }));
        let controller = controller(backend);

        let report = controller.start(single_ka_input()).await.unwrap();

        assert_eq!(report.status, SessionStatus::Completed);
        let example = &report.examples[0];
        assert_eq!(example.state, ExampleState::Stalled);
        assert_eq!(example.revision_count, 3);
        assert_eq!(report.unresolved, vec![example.id]);
        assert!(!report.coverage[0].converged);
    }

    #[tokio::test]
    async fn test_session_timeout_reports_partial_convergence() {
        /// Answers instantly until the backward-routed star-writing
        /// revision, which burns the whole session budget.
        #[derive(Debug)]
        struct SlowReviser;

        #[async_trait]
        impl GenerationBackend for SlowReviser {
            async fn generate(
                &self,
                prompt: &PromptContext,
                _schema: &OutputSchema,
            ) -> Result<Value, BackendError> {
                Ok(match prompt.capability {
                    CapabilityTag::Readiness => {
                        json!({ keys::READINESS_ASSESSMENT: {"readiness_score": 6} })
                    }
                    CapabilityTag::PositionAnalysis => {
                        json!({ keys::POSITION_ANALYSIS: {"rank_level": "SGT"} })
                    }
                    CapabilityTag::ExampleSelection => {
                        json!({ keys::EXAMPLE_SELECTION: {"recommended": {}} })
                    }
                    CapabilityTag::StarWriting => {
                        if prompt.target_example.is_some() {
                            tokio::time::sleep(Duration::from_secs(600)).await;
                        }
                        json!({ keys::EXAMPLE_DRAFTS: [
                            draft("ka-1"), draft("ka-2"), draft("ka-3"),
                        ]})
                    }
                    CapabilityTag::ContextScoring => {
                        json!({ keys::SCORES_CONTEXT: {"ka-1": 5, "ka-2": 5, "ka-3": 3} })
                    }
                    CapabilityTag::ComplexityScoring => {
                        json!({ keys::SCORES_COMPLEXITY: {"ka-1": 5, "ka-2": 5, "ka-3": 5} })
                    }
                    CapabilityTag::InitiativeScoring => {
                        json!({ keys::SCORES_INITIATIVE: {"ka-1": 6, "ka-2": 6, "ka-3": 6} })
                    }
                    CapabilityTag::ResultsCompetency => {
                        json!({ keys::COMPETENCY_RESULTS: {"ka-1": [], "ka-2": [], "ka-3": []} })
                    }
                    other => panic!("unexpected capability {other}"),
                })
            }
        }

        tokio::time::pause();

        let kas = ["ka-1", "ka-2", "ka-3"]
            .iter()
            .map(|id| KeyAccountability {
                id: (*id).into(),
                area: CompetencyArea::Results,
                statement: "s".into(),
                competency_items: vec![],
            })
            .collect();
        let mut config = OrchestratorConfig::default();
        config.session_timeout_secs = 300;
        config.turn_timeout_secs = 10_000;

        let controller = SessionController::new(
            config,
            CollaboratorRegistry::default_roster().unwrap(),
            Arc::new(SlowReviser),
        )
        .unwrap();

        let report = controller.start(input_with_kas(kas)).await.unwrap();

        assert_eq!(report.status, SessionStatus::TimedOut);
        let finalized = report
            .examples
            .iter()
            .filter(|e| e.state == ExampleState::Finalized)
            .count();
        assert_eq!(finalized, 2);
        assert_eq!(report.unresolved.len(), 1);
    }

    #[tokio::test]
    async fn test_second_start_on_busy_session_is_rejected() {
        /// Never answers, keeping the first run in flight.
        #[derive(Debug)]
        struct HangingBackend;

        #[async_trait]
        impl GenerationBackend for HangingBackend {
            async fn generate(
                &self,
                _prompt: &PromptContext,
                _schema: &OutputSchema,
            ) -> Result<Value, BackendError> {
                futures::future::pending().await
            }
        }

        let controller = controller(Arc::new(HangingBackend));

        let mut in_flight = tokio_test::task::spawn(controller.start(single_ka_input()));
        assert!(in_flight.poll().is_pending());

        let second = controller
            .start(single_ka_input())
            .now_or_never()
            .expect("busy rejection is immediate");
        assert!(matches!(second, Err(OrchestratorError::SessionBusy(id)) if id == controller.id()));

        // Dropping the in-flight run releases the guard.
        drop(in_flight);
        let mut third = tokio_test::task::spawn(controller.start(single_ka_input()));
        assert!(third.poll().is_pending());
    }

    #[tokio::test]
    async fn test_cancel_before_first_turn() {
        let backend = Arc::new(ScriptedBackend::new());
        let controller = controller(backend);
        controller.cancel_token().cancel();

        let report = controller.start(single_ka_input()).await.unwrap();
        assert_eq!(report.status, SessionStatus::Failed);
        assert_eq!(report.turns_taken, 0);
        assert!(report.records.is_empty());
        assert!(report.failure.unwrap().contains("cancelled"));
    }
}

